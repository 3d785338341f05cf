//! The two things a page can ask the posts API for

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::FetchError;
use crate::content::{summaries_into_records, DetailDto, DetailRecord, SummaryDto, SummaryRecord};
use crate::helpers::{encode_segment, DisplayZone, FormatError};

/// A remote read: how to request it and how to turn the body into a record
pub trait Resource: Send + Sync + 'static {
    /// Body shape on the wire
    type Dto: DeserializeOwned + Send;
    /// Display-ready result
    type Record: Clone + Send + Sync + 'static;

    /// Build the outbound GET
    fn request(&self, client: &ApiClient) -> RequestBuilder;

    /// Short label used in log lines
    fn describe(&self) -> String;

    fn into_record(dto: Self::Dto, zone: DisplayZone) -> Result<Self::Record, FormatError>;
}

/// Query parameters for the date-filtered listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub from: String,
    pub to: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            from: "2000-01-01".to_string(),
            to: "2030-10-01".to_string(),
            page: 0,
            page_size: 2000,
        }
    }
}

/// Listing of post summaries
#[derive(Debug, Clone, Default)]
pub struct PostList {
    pub query: ListQuery,
}

impl PostList {
    pub fn new(query: ListQuery) -> Self {
        Self { query }
    }
}

impl Resource for PostList {
    type Dto = Vec<SummaryDto>;
    type Record = Vec<SummaryRecord>;

    fn request(&self, client: &ApiClient) -> RequestBuilder {
        client
            .http()
            .get(client.posts_by_date_url())
            .query(&self.query)
    }

    fn describe(&self) -> String {
        format!(
            "posts from {} to {} (page {}, size {})",
            self.query.from, self.query.to, self.query.page, self.query.page_size
        )
    }

    fn into_record(dto: Self::Dto, zone: DisplayZone) -> Result<Self::Record, FormatError> {
        summaries_into_records(dto, zone)
    }
}

/// A single post by id
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub id: String,
}

impl PostDetail {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Resource for PostDetail {
    type Dto = DetailDto;
    type Record = DetailRecord;

    fn request(&self, client: &ApiClient) -> RequestBuilder {
        let url = format!("{}/{}", client.posts_url(), encode_segment(&self.id));
        client.http().get(url)
    }

    fn describe(&self) -> String {
        format!("post {:?}", self.id)
    }

    fn into_record(dto: Self::Dto, zone: DisplayZone) -> Result<Self::Record, FormatError> {
        dto.into_record(zone)
    }
}

/// Issue the request and map the response
///
/// `Ok(None)` means the API answered 404.
pub(crate) async fn execute<R: Resource>(
    client: &ApiClient,
    resource: &R,
) -> Result<Option<R::Record>, FetchError> {
    let response = resource.request(client).send().await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(FetchError::Http {
            status: status.as_u16(),
        });
    }

    let dto = response.json::<R::Dto>().await?;
    Ok(Some(R::into_record(dto, client.zone())?))
}
