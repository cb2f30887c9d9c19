//! CLI presentation: format command results for text/json output.

mod movie;
mod status;

pub use movie::{
    format_movie_list_json, format_movie_list_text, format_movies_json, format_movies_text,
    format_rating_line, format_runtime,
};
pub use status::{format_store_status_json, format_store_status_text, StoreStatus};

use owo_colors::OwoColorize;

/// Section heading, bold and underlined when color is enabled.
pub(crate) fn heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}
