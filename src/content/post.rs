//! Display records consumed by the pages

use serde::{Deserialize, Serialize};

/// One entry of the home page listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    /// Post id, unique per post
    pub id: String,

    /// Post title
    pub title: String,

    /// Creation date as `YYYY-MM-DD`
    pub created_at: String,
}

/// A single post as shown on its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    /// Post title
    pub title: String,

    /// Raw HTML or plain text body
    pub content: String,

    /// Creation date as `YYYY-MM-DD`
    pub created_at: String,
}
