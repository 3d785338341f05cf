//! Post detail page

use super::{layout, FAILED_TEXT, LOADING_TEXT};
use crate::config::FrontConfig;
use crate::content::DetailRecord;
use crate::fetch::FetchState;
use crate::helpers::{html_escape, time_tag};

const POST_LOGO_SIZE: u32 = 75;

/// Render the whole post page for the current detail state
pub fn render(config: &FrontConfig, state: &FetchState<DetailRecord>) -> String {
    layout::render(config, &detail(state), POST_LOGO_SIZE)
}

/// Render the page shown when the request carries no post id
pub fn render_missing_id(config: &FrontConfig) -> String {
    layout::render(
        config,
        r#"<p class="wrongtag">Something wrong happened :/</p>"#,
        POST_LOGO_SIZE,
    )
}

/// The `post` block alone
///
/// The body is emitted as-is: the API serves post content as HTML.
pub fn detail(state: &FetchState<DetailRecord>) -> String {
    let inner = match state {
        FetchState::Idle | FetchState::Loading => format!("<p>{}</p>", LOADING_TEXT),
        FetchState::Loaded(post) => format!(
            "<div>\n<h1>{}</h1>\n<div class=\"content\">{}</div>\n<p>{}</p>\n</div>",
            html_escape(&post.title),
            post.content,
            time_tag(&post.created_at)
        ),
        FetchState::NotFound => "<p>Not found :/</p>".to_string(),
        FetchState::Failed(_) => format!("<p>{}</p>", FAILED_TEXT),
    };

    format!("<div class=\"post\">\n{}\n</div>", inner)
}
