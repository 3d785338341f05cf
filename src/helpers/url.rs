//! URL helper functions

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::config::FrontConfig;

lazy_static! {
    /// Runs of characters that may not appear in a slug
    static ref NON_SLUG_RUN: Regex = Regex::new(r"[^A-Za-z0-9_]+").unwrap();
}

/// Characters escaped inside a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Turn a post title into a URL-safe slug
///
/// # Examples
/// ```ignore
/// slugify("Hello, World!") // -> "hello-world"
/// ```
pub fn slugify(title: &str) -> String {
    let replaced = NON_SLUG_RUN.replace_all(title, "-");
    let replaced: &str = &replaced;
    let trimmed = replaced.strip_prefix('-').unwrap_or(replaced);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

/// Percent-encode a value for use as one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/style/index.css") // -> "/blog/style/index.css"
/// ```
pub fn url_for(config: &FrontConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Link target for a post detail page
///
/// The slug is cosmetic; the id is what the detail route resolves.
pub fn post_url(config: &FrontConfig, id: &str, title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        url_for(config, &format!("post/{}", encode_segment(id)))
    } else {
        url_for(config, &format!("post/{}/{}", encode_segment(id), slug))
    }
}
