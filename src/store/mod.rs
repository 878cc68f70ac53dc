//! Base store: single source of truth with a middleware pipeline.
//!
//! A [`BaseStore`] owns one state value, arbitrates update acceptance through
//! an ordered [`Middleware`] stack, and fans committed changes out to its
//! listeners. Deep-partial updates are shallow-merged onto the current state
//! through the same pipeline.

mod merge;
mod middleware;
mod store;

pub use middleware::Middleware;
pub use store::{BaseStore, Subscription};
