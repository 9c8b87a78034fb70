//! Filtered, paginated listings and status tallies shared by every admin
//! resource.
//!
//! Everything here is generic over the sqlx backend and borrows an injected
//! `&Pool<DB>`. The server wires Postgres; tests wire in-memory SQLite.

pub mod failure;
pub mod page;
pub mod predicate;
pub mod tally;

pub use failure::{Failure, classify};
pub use page::{CONDITIONS, DEFAULT_LIMIT, Listing, Page, PageRequest, Pagination};
pub use predicate::{Filter, Match, Predicate};
pub use tally::{Counts, Tally};
