//! Page renderers
//!
//! Pure functions from a fetch state to HTML. They never start a fetch; the
//! caller decides when the state is worth rendering.

pub mod home;
mod layout;
pub mod post;

/// Placeholder shown while a fetch is in flight
pub const LOADING_TEXT: &str = "...";

/// Generic message for failed fetches, kept apart from "not found"
pub const FAILED_TEXT: &str = "Something went wrong, try again later";
