//! Wire shapes returned by the posts API and their mapping to records

use serde::{Deserialize, Serialize};

use super::post::{DetailRecord, SummaryRecord};
use crate::helpers::{format_display_date, DisplayZone, FormatError};

/// List entry as returned by `posts-by-date`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDto {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

/// Full post as returned by `posts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDto {
    pub id: String,
    #[serde(default)]
    pub creator: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl SummaryDto {
    pub fn into_record(self, zone: DisplayZone) -> Result<SummaryRecord, FormatError> {
        Ok(SummaryRecord {
            created_at: format_display_date(&self.created_at, zone)?,
            id: self.id,
            title: self.title,
        })
    }
}

impl DetailDto {
    /// Project the fields shown on the detail page; `creator` and `tags` are dropped
    pub fn into_record(self, zone: DisplayZone) -> Result<DetailRecord, FormatError> {
        Ok(DetailRecord {
            created_at: format_display_date(&self.created_at, zone)?,
            title: self.title,
            content: self.content,
        })
    }
}

/// Map a whole listing; the first bad date fails the batch
pub fn summaries_into_records(
    dtos: Vec<SummaryDto>,
    zone: DisplayZone,
) -> Result<Vec<SummaryRecord>, FormatError> {
    dtos.into_iter().map(|dto| dto.into_record(zone)).collect()
}
