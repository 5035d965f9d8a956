//! HTTP client for the Yotpo product-review REST API.
//!
//! Wraps `reqwest` with Yotpo-specific credential handling (secret-derived
//! access token, memoized per client instance), request option merging,
//! response caching with TTLs, and the create-or-update reconciliation for
//! products. One request is in flight at a time; all memoized state lives
//! behind `&mut self`.

mod cache;
mod client;
mod error;
mod options;
mod products;
mod reviews;
mod types;

pub use cache::{CacheEntry, CacheStore, Clock, FixedClock, MemoryCache, SystemClock};
pub use client::{YotpoClient, YotpoConfig};
pub use error::{ErrorMapper, YotpoError};
pub use options::RequestOptions;
pub use types::{BottomLine, Product, ProductInput};
