//! Configuration module

mod site;

pub use site::ApiConfig;
pub use site::FrontConfig;
pub use site::LinkConfig;
pub use site::{ENV_API_HOST, ENV_API_PORT, ENV_API_SCHEME};
