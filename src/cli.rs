//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the resolver and record store.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_movie_list_json, format_movie_list_text, format_movies_json, format_movies_text,
    format_rating_line, format_runtime, format_store_status_json, format_store_status_text,
    StoreStatus,
};
pub use route::RunContext;
