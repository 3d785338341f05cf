//! Helper functions for pages
//!
//! Pure text transforms shared by the fetch layer and the page renderers:
//! date formatting, slugs, URL building and small HTML snippets.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
