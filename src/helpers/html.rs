//! HTML helper functions

use super::url::url_for;
use crate::config::{FrontConfig, LinkConfig};

/// Generate a CSS link tag
///
/// # Examples
/// ```ignore
/// css(&config, "style/index") // -> <link rel="stylesheet" href="/style/index.css">
/// ```
pub fn css(config: &FrontConfig, path: &str) -> String {
    let path = if is_absolute(path) {
        path.to_string()
    } else if path.ends_with(".css") {
        url_for(config, path)
    } else {
        url_for(config, &format!("{}.css", path))
    };

    format!(r#"<link rel="stylesheet" href="{}">"#, html_escape(&path))
}

/// Generate an anchor tag; absolute links open in a new tab
pub fn link_to(config: &FrontConfig, path: &str, text: &str) -> String {
    if is_absolute(path) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(path),
            html_escape(text)
        )
    } else {
        format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(&url_for(config, path)),
            html_escape(text)
        )
    }
}

/// Render the configured profile links, separated by an empty span
pub fn links_list(config: &FrontConfig, links: &[LinkConfig]) -> String {
    links
        .iter()
        .map(|link| link_to(config, &link.url, &link.name))
        .collect::<Vec<_>>()
        .join("\n<span></span>\n")
}

/// Generate an image tag
pub fn image_tag(config: &FrontConfig, path: &str, title: Option<&str>, height: u32) -> String {
    let src = if is_absolute(path) {
        path.to_string()
    } else {
        url_for(config, path)
    };

    let title_attr = title
        .map(|t| format!(r#" title="{}""#, html_escape(t)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" height="{}"{}>"#,
        html_escape(&src),
        height,
        title_attr
    )
}

/// Generate Open Graph meta tags
pub fn open_graph(title: &str, description: &str, url: &str, image: Option<&str>) -> String {
    let mut tags = vec![
        r#"<meta name="viewport" content="width=device-width">"#.to_string(),
        format!(
            r#"<meta name="title" property="og:title" content="{}">"#,
            html_escape(title)
        ),
        r#"<meta name="type" property="og:type" content="website">"#.to_string(),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta name="description" property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    if let Some(img) = image {
        tags.push(format!(
            r#"<meta name="image" property="og:image" content="{}">"#,
            html_escape(img)
        ));
    }

    if !url.is_empty() {
        tags.push(format!(
            r#"<meta name="url" property="og:url" content="{}">"#,
            html_escape(url)
        ));
    }

    tags.join("\n")
}

/// Generate a <time> element for an already formatted display date
pub fn time_tag(display_date: &str) -> String {
    format!(
        r#"<time datetime="{0}">{0}</time>"#,
        html_escape(display_date)
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}
