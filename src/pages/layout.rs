//! Shared page chrome: head, header and footer

use crate::config::FrontConfig;
use crate::helpers::{css, html_escape, image_tag, links_list, link_to, open_graph};

/// Wrap a page body in the full document
pub fn render(config: &FrontConfig, body: &str, logo_size: u32) -> String {
    let lang = html_escape(&config.language);
    let head = head(config);
    let header = header(config, logo_size);
    let footer = footer(config);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
{head}
<body>
<main>
<div class="page">
{header}
{body}
{footer}
</div>
</main>
</body>
</html>
"#
    )
}

fn head(config: &FrontConfig) -> String {
    format!(
        "<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n{}\n</head>",
        html_escape(&config.title),
        open_graph(
            &config.title,
            &config.description,
            &config.url,
            config.image.as_deref(),
        ),
        css(config, &config.stylesheet)
    )
}

fn header(config: &FrontConfig, logo_size: u32) -> String {
    let mut parts = Vec::new();

    if let Some(image) = &config.image {
        parts.push(format!(
            r#"<div class="logo">{}</div>"#,
            image_tag(config, image, Some(&config.author), logo_size)
        ));
    }

    parts.push(format!("<h1>{}</h1>", html_escape(&config.title)));

    if !config.subtitle.is_empty() {
        parts.push(format!("<h2>{}</h2>", html_escape(&config.subtitle)));
    }

    if !config.links.is_empty() {
        parts.push(format!(
            "<p class=\"links\">\n{}\n</p>",
            links_list(config, &config.links)
        ));
    }

    parts.join("\n")
}

fn footer(config: &FrontConfig) -> String {
    format!(
        "<p class=\"goback\">{}</p>\n<p class=\"copyinfo\">All stuff in here was said by {}</p>",
        link_to(config, "/", "Go back"),
        html_escape(&config.author)
    )
}
