//! Provider Payload Normalization
//!
//! Raw provider payloads are modelled as a fully optional tree: every level may be missing,
//! null, mistyped, or carry fields we do not know about; a mistyped leaf reads as absent.
//! Normalization projects that tree into a [`MovieRecord`] without ever failing on absent data.

use crate::lenient;
use crate::record::{CastMember, CrewMember, MovieRecord, ScoreBadge};
use serde::Deserialize;
use uuid::Uuid;

/// Top-level provider response: `{ "data": { "movie": { ... } } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieEnvelope {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub data: Option<RawMovieData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieData {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub movie: Option<RawMovie>,
}

/// Provider-specific movie detail
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovie {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub trailer: Option<RawLink>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub motion_picture_rating: Option<RawRating>,
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub duration_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub tomato_rating: Option<RawTomatoRating>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub user_rating: Option<RawUserRating>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub genres: Option<Vec<RawGenre>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub cast: Option<Vec<RawCastMember>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub crew: Option<Vec<RawCrewMember>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRating {
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTomatoRating {
    #[serde(default, deserialize_with = "lenient::number")]
    pub tomatometer: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub icon_image: Option<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserRating {
    #[serde(default, deserialize_with = "lenient::number")]
    pub dtl_liked_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub icon_image: Option<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenre {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCastMember {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub character_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub head_shot_image: Option<RawLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCrewMember {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub head_shot_image: Option<RawLink>,
}

impl RawMovieEnvelope {
    /// The nested movie, if every level of the envelope is present.
    pub fn movie(&self) -> Option<&RawMovie> {
        self.data.as_ref()?.movie.as_ref()
    }
}

fn link_url(link: &Option<RawLink>) -> Option<String> {
    link.as_ref()?.url.clone()
}

/// Normalize a raw provider movie into the canonical record for `id`.
pub fn normalize(raw: &RawMovie, id: &str) -> MovieRecord {
    MovieRecord {
        id: id.to_string(),
        title: raw.name.clone(),
        trailer_url: link_url(&raw.trailer),
        rating_code: raw
            .motion_picture_rating
            .as_ref()
            .and_then(|rating| rating.code.clone()),
        duration_minutes: raw
            .duration_minutes
            .and_then(|minutes| u32::try_from(minutes).ok()),
        critic_score: raw
            .tomato_rating
            .as_ref()
            .map(|rating| ScoreBadge {
                score: rating.tomatometer,
                icon_url: link_url(&rating.icon_image),
            })
            .unwrap_or_default(),
        audience_score: raw
            .user_rating
            .as_ref()
            .map(|rating| ScoreBadge {
                score: rating.dtl_liked_score,
                icon_url: link_url(&rating.icon_image),
            })
            .unwrap_or_default(),
        summary: raw.synopsis.clone(),
        genres: raw
            .genres
            .iter()
            .flatten()
            .filter_map(|genre| genre.name.clone())
            .collect(),
        release_date: raw.release_date.clone(),
        cast: raw
            .cast
            .iter()
            .flatten()
            .map(|actor| CastMember {
                id: Uuid::new_v4(),
                name: actor.name.clone(),
                character_name: actor.character_name.clone(),
                headshot_url: link_url(&actor.head_shot_image),
            })
            .collect(),
        crew: raw
            .crew
            .iter()
            .flatten()
            .map(|member| CrewMember {
                id: Uuid::new_v4(),
                name: member.name.clone(),
                role: member.role.clone(),
                headshot_url: link_url(&member.head_shot_image),
            })
            .collect(),
    }
}

/// Normalize a full provider envelope; a missing `data.movie` yields an incomplete record.
pub fn normalize_response(envelope: &RawMovieEnvelope, id: &str) -> MovieRecord {
    match envelope.movie() {
        Some(raw) => normalize(raw, id),
        None => MovieRecord::empty(id),
    }
}
