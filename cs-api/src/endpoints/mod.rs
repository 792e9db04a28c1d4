//! API endpoint modules organized by backend area.
//!
//! Each module adds typed methods to [`ApiClient`](crate::ApiClient) and
//! unwraps its route's response shape explicitly.

pub mod ads;
pub mod auth;
pub mod cards;
pub mod credits;
pub mod groups;
pub mod messages;
pub mod notifications;
pub mod vouchers;

use std::borrow::Cow;

/// Percent-encode an id for use as one path segment.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
