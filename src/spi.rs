//! Result contract that driver results, and the mock, implement.

use std::fmt;

use futures::stream::{BoxStream, Stream};

use crate::{ColumnMetadata, Value};

/// Column value access for one record.
pub trait Row: fmt::Debug + Send + Sync {
    /// Returns the value at a zero-based column position.
    fn get(&self, index: usize) -> Option<&Value>;

    /// Returns a value by case-insensitive column name.
    fn get_by_name(&self, name: &str) -> Option<&Value>;
}

/// Descriptor of a result's column shape.
pub trait RowMetadata: fmt::Debug + Send + Sync {
    fn column_metadata(&self, index: usize) -> Option<&ColumnMetadata>;

    /// Looks up a column by case-insensitive name.
    fn column_metadata_by_name(&self, name: &str) -> Option<&ColumnMetadata>;

    /// Column names in declaration order.
    fn column_names(&self) -> Vec<&str>;
}

/// A unit of a result as seen by segment operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment<R> {
    Row(R),
    UpdateCount(u64),
    Message(String),
}

/// Outcome of a database operation exposed as asynchronous sequences.
pub trait QueryResult: Sized {
    type Row: Row;
    type Metadata: RowMetadata;

    /// Streams the affected-row counts in the order they were produced.
    fn update_counts(&self) -> BoxStream<'static, u64>;

    /// Streams one mapped value per row, pairing each row with the
    /// result's row metadata.
    fn map<T, F>(&self, mapping: F) -> BoxStream<'static, T>
    where
        F: FnMut(&Self::Row, &Self::Metadata) -> T + Send + 'static,
        T: Send + 'static;

    /// Returns a result restricted to segments accepted by `predicate`.
    fn filter<P>(&self, predicate: P) -> crate::Result<Self>
    where
        P: FnMut(&Segment<Self::Row>) -> bool;

    /// Streams the concatenation of the streams `mapping` returns per segment.
    fn flat_map<T, F, S>(&self, mapping: F) -> crate::Result<BoxStream<'static, T>>
    where
        F: FnMut(Segment<Self::Row>) -> S + Send + 'static,
        S: Stream<Item = T> + Send + 'static,
        T: Send + 'static;
}
