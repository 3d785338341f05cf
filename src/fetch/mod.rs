//! Fetch module - one outbound read per page component
//!
//! Pages create a [`Fetch`] for the [`PostList`] or [`PostDetail`] resource,
//! start it once and read `(data, is_loading)` until it settles.

mod client;
mod error;
mod machine;
mod resource;

pub use client::ApiClient;
pub use error::{FetchError, FetchErrorKind};
pub use machine::{Fetch, FetchState};
pub use resource::{ListQuery, PostDetail, PostList, Resource};
