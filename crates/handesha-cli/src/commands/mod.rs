//! Command handlers grouped by concern.

pub(crate) mod active;
pub(crate) mod content;
pub(crate) mod membership;
pub(crate) mod translations;
