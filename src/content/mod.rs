//! Content module - wire DTOs and the display records built from them

mod dto;
mod post;

pub use dto::{summaries_into_records, DetailDto, SummaryDto};
pub use post::{DetailRecord, SummaryRecord};
