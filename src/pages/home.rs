//! Home page: the date-ordered listing

use super::{layout, FAILED_TEXT, LOADING_TEXT};
use crate::config::FrontConfig;
use crate::content::SummaryRecord;
use crate::fetch::FetchState;
use crate::helpers::{html_escape, post_url, time_tag};

const HOME_LOGO_SIZE: u32 = 200;

/// Render the whole home page for the current listing state
pub fn render(config: &FrontConfig, state: &FetchState<Vec<SummaryRecord>>) -> String {
    layout::render(config, &entries(config, state), HOME_LOGO_SIZE)
}

/// The `entries` block alone
pub fn entries(config: &FrontConfig, state: &FetchState<Vec<SummaryRecord>>) -> String {
    let inner = match state {
        FetchState::Idle | FetchState::Loading => entries_text(LOADING_TEXT),
        FetchState::Loaded(posts) if !posts.is_empty() => {
            let items = posts
                .iter()
                .map(|post| summary(config, post))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{}\n<div class=\"summaries\">\n{}\n</div>",
                entries_text("Found something for you"),
                items
            )
        }
        FetchState::Loaded(_) | FetchState::NotFound => entries_text("Nothing to see here"),
        FetchState::Failed(_) => entries_text(FAILED_TEXT),
    };

    format!("<div class=\"entries\">\n{}\n</div>", inner)
}

fn entries_text(text: &str) -> String {
    format!(r#"<p class="entries-txt">{}</p>"#, text)
}

fn summary(config: &FrontConfig, post: &SummaryRecord) -> String {
    format!(
        "<div class=\"summary\">\n<h1><a href=\"{}\">{}</a></h1>\n<p>{}</p>\n</div>",
        html_escape(&post_url(config, &post.id, &post.title)),
        html_escape(&post.title),
        time_tag(&post.created_at)
    )
}
