//! Canonical Movie Record
//!
//! The display-ready snapshot of a movie produced by the normalizer and persisted by the
//! local record store. Every field except `id` may be absent; absence is how an incomplete
//! fetch shows up downstream.
//!
//! Stored collections carry no schema version, so deserialization is lenient: missing
//! fields fall back to defaults, unknown fields are ignored, and the field names written by
//! earlier normalization logic are accepted as aliases. A field of the wrong type reads as
//! absent; only a missing or non-scalar `id` makes a record undecodable.

use crate::lenient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score value paired with the provider's icon for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBadge {
    #[serde(
        default,
        alias = "tomatoRating",
        alias = "userRating",
        deserialize_with = "lenient::number"
    )]
    pub score: Option<f64>,

    #[serde(
        default,
        alias = "tomatoRatingImg",
        alias = "userRatingImg",
        deserialize_with = "lenient::text"
    )]
    pub icon_url: Option<String>,
}

impl ScoreBadge {
    /// Icon to show next to the score. An icon without a score is not displayed.
    pub fn visible_icon(&self) -> Option<&str> {
        self.score.and(self.icon_url.as_deref())
    }
}

/// Cast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    /// Presentation-only identity, regenerated on every normalization
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::entry_id")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub character_name: Option<String>,
    #[serde(default, alias = "headShot", deserialize_with = "lenient::text")]
    pub headshot_url: Option<String>,
}

/// Crew entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    /// Presentation-only identity, regenerated on every normalization
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::entry_id")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(default, alias = "headShot", deserialize_with = "lenient::text")]
    pub headshot_url: Option<String>,
}

/// Normalized movie detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,

    #[serde(default, alias = "trailer", deserialize_with = "lenient::text")]
    pub trailer_url: Option<String>,

    #[serde(default, alias = "rating", deserialize_with = "lenient::text")]
    pub rating_code: Option<String>,

    #[serde(default, alias = "duration", deserialize_with = "lenient::minutes_u32")]
    pub duration_minutes: Option<u32>,

    #[serde(default, alias = "tomatoRatingObj", deserialize_with = "lenient::or_default")]
    pub critic_score: ScoreBadge,

    #[serde(default, alias = "userRatingObj", deserialize_with = "lenient::or_default")]
    pub audience_score: ScoreBadge,

    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient::text_list")]
    pub genres: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub release_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub cast: Vec<CastMember>,

    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub crew: Vec<CrewMember>,
}

impl MovieRecord {
    /// Record with only an identity; what a failed fetch normalizes to.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            trailer_url: None,
            rating_code: None,
            duration_minutes: None,
            critic_score: ScoreBadge::default(),
            audience_score: ScoreBadge::default(),
            summary: None,
            genres: Vec::new(),
            release_date: None,
            cast: Vec::new(),
            crew: Vec::new(),
        }
    }

    /// A record is valid for storage only once it has a title.
    pub fn is_complete(&self) -> bool {
        self.title.is_some()
    }

    /// Copy of this record with cast and crew identities cleared to the nil UUID.
    ///
    /// Two normalizations of the same payload differ only in those identities, so comparing
    /// the results of this method is how callers check content equality.
    pub fn without_entry_ids(&self) -> Self {
        let mut record = self.clone();
        for member in &mut record.cast {
            member.id = Uuid::nil();
        }
        for member in &mut record.crew {
            member.id = Uuid::nil();
        }
        record
    }
}
