//! Storage collaborator abstractions for the list pipeline
//!
//! - [`RecordSource`]: async count/fetch over filterable, orderable records
//! - [`FilterChain`]: caller-supplied predicates, composed as a conjunction
//! - [`Pagination`]: skip/take window
//! - [`InMemorySource`]: a lock-guarded vector implementing [`RecordSource`]
//! - [`RepositoryError`]: operation + kind + message failure type
//!
//! # Example
//!
//! ```rust
//! use habit_api::repository::{
//!     FilterChain, InMemorySource, OrderDirection, Pagination, RecordSource,
//! };
//! use habit_api::sorting::{OrderBy, SortKey};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let source = InMemorySource::from_records(vec![5_i64, 1, 4, 2]);
//!     let even = FilterChain::new().and(|n: &i64| n % 2 == 0);
//!     let order = OrderBy::new()
//!         .then(SortKey::new("n", |n: &i64| (*n).into()), OrderDirection::Ascending);
//!
//!     assert_eq!(source.count(&even).await.unwrap(), 2);
//!     let page = source.fetch(&even, &order, Some(Pagination::first(1))).await.unwrap();
//!     assert_eq!(page, vec![2]);
//! });
//! ```

mod error;
mod memory;
mod pagination;
mod traits;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemorySource;
pub use pagination::{OrderDirection, Pagination};
pub use traits::{FilterChain, RecordSource, RepositoryResult};
