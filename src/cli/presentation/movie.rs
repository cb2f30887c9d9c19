//! Movie presentation: detail view and record list, text/json.

use super::heading;
use crate::error::{ApiError, StorageError};
use crate::record::{MovieRecord, ScoreBadge};
use comfy_table::Table;

/// `"2h 35min"` for 155 minutes; empty when the duration is unknown.
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(minutes) => format!("{}h {}min", minutes / 60, minutes % 60),
        None => String::new(),
    }
}

/// `"<rating>, <runtime>"`, skipping whichever part is absent.
pub fn format_rating_line(record: &MovieRecord) -> String {
    let runtime = format_runtime(record.duration_minutes);
    [record.rating_code.clone().unwrap_or_default(), runtime]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_score(label: &str, badge: &ScoreBadge) -> String {
    match (badge.score, badge.visible_icon()) {
        (Some(score), Some(icon)) => format!("{}: {} ({})", label, score, icon),
        (Some(score), None) => format!("{}: {}", label, score),
        (None, _) => format!("{}:", label),
    }
}

fn people_table<'a>(header: [&str; 3], rows: impl Iterator<Item = [&'a str; 3]>) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row.to_vec());
    }
    table
}

fn format_movie_text(record: &MovieRecord, color: bool) -> String {
    let title = record.title.as_deref().unwrap_or(&record.id);
    let mut out = format!("{}\n", heading(title, color));
    out.push_str(&format!("{}\n", format_rating_line(record)));
    out.push_str(&format!("{}\n", format_score("Critics", &record.critic_score)));
    out.push_str(&format!("{}\n\n", format_score("Audience", &record.audience_score)));
    out.push_str(&format!("Genre: {}\n", record.genres.join(", ")));
    out.push_str(&format!(
        "Release Date: {}\n",
        record.release_date.as_deref().unwrap_or("")
    ));
    if let Some(trailer) = &record.trailer_url {
        out.push_str(&format!("Trailer: {}\n", trailer));
    }
    if let Some(summary) = &record.summary {
        out.push_str(&format!("\n{}\n", summary));
    }

    out.push_str(&format!("\n{}\n", heading("Cast", color)));
    if record.cast.is_empty() {
        out.push_str("(none)\n");
    } else {
        let rows = record.cast.iter().map(|member| {
            [
                member.name.as_deref().unwrap_or(""),
                member.character_name.as_deref().unwrap_or(""),
                member.headshot_url.as_deref().unwrap_or(""),
            ]
        });
        out.push_str(&format!(
            "{}\n",
            people_table(["Name", "Character", "Headshot"], rows)
        ));
    }

    out.push_str(&format!("\n{}\n", heading("Crew", color)));
    if record.crew.is_empty() {
        out.push_str("(none)");
    } else {
        let rows = record.crew.iter().map(|member| {
            [
                member.name.as_deref().unwrap_or(""),
                member.role.as_deref().unwrap_or(""),
                member.headshot_url.as_deref().unwrap_or(""),
            ]
        });
        out.push_str(&people_table(["Name", "Role", "Headshot"], rows).to_string());
    }
    out
}

/// Detail view for each record, separated by a blank line.
pub fn format_movies_text(records: &[MovieRecord], color: bool) -> String {
    records
        .iter()
        .map(|record| format_movie_text(record, color))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_movies_json(records: &[MovieRecord]) -> Result<String, ApiError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e)))
}

pub fn format_movie_list_text(records: &[MovieRecord]) -> String {
    if records.is_empty() {
        return "No movies stored.\n\nUse 'reel show <ID>' to fetch one.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Rating", "Runtime", "Genres"]);
    for record in records {
        table.add_row(vec![
            record.id.clone(),
            record.title.clone().unwrap_or_default(),
            record.rating_code.clone().unwrap_or_default(),
            format_runtime(record.duration_minutes),
            record.genres.join(", "),
        ]);
    }
    format!("{}\n\nTotal: {} record(s)", table, records.len())
}

pub fn format_movie_list_json(records: &[MovieRecord]) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "id": record.id,
                "title": record.title,
                "ratingCode": record.rating_code,
                "durationMinutes": record.duration_minutes,
                "genres": record.genres,
            })
        })
        .collect();
    let out = serde_json::json!({ "movies": rows, "total": records.len() });
    serde_json::to_string_pretty(&out)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e)))
}
