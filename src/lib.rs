//! `mock-result` is an in-memory query result for testing code written
//! against a database driver's result contract.
//!
//! Build a [`MockResult`] with [`MockResult::builder`] or
//! [`MockResult::from_json`], then consume it through [`spi::QueryResult`]:
//! - [`spi::QueryResult::update_counts`]
//! - [`spi::QueryResult::map`]

mod error;
mod fixture;
mod result;
mod types;
mod value;

pub mod spi;

pub use error::MockResultError;
pub use result::{Builder, MockResult};
pub use types::{ColumnMetadata, MockRow, MockRowMetadata};
pub use value::Value;

pub type Result<T> = std::result::Result<T, MockResultError>;
