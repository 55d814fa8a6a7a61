//! DMS Adapter (§4.1, component C1): REST client, tag-ID/name cache and
//! atomic workflow-tag transitions. Every other crate talks to the
//! document store exclusively through this one.

pub mod client;
pub mod errors;
pub mod retry;
pub mod tag_cache;

pub use client::DmsClient;
pub use errors::{DmsError, DmsResult};
pub use retry::retry_with_backoff;
pub use tag_cache::TagCache;
