use std::fmt;
use std::sync::Arc;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::{
    spi::{self, Segment},
    MockResultError, MockRow, MockRowMetadata, Result,
};

/// Immutable, replayable query result assembled from test fixtures.
///
/// Every stream returned by [`spi::QueryResult::update_counts`] and
/// [`spi::QueryResult::map`] replays the same data from the start, so a result can
/// be consumed any number of times.
pub struct MockResult<R = MockRow, M = MockRowMetadata> {
    row_metadata: Option<Arc<M>>,
    rows: Arc<[R]>,
    rows_updated: Arc<[u64]>,
}

impl<R, M> Clone for MockResult<R, M> {
    fn clone(&self) -> Self {
        Self {
            row_metadata: self.row_metadata.clone(),
            rows: Arc::clone(&self.rows),
            rows_updated: Arc::clone(&self.rows_updated),
        }
    }
}

impl<R: fmt::Debug, M: fmt::Debug> fmt::Debug for MockResult<R, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockResult")
            .field("row_metadata", &self.row_metadata)
            .field("rows", &self.rows)
            .field("rows_updated", &self.rows_updated)
            .finish()
    }
}

impl<R, M> MockResult<R, M> {
    /// Creates a result from all three parts.
    ///
    /// Rows cannot be mapped without metadata, so a non-empty `rows` with no
    /// `row_metadata` is rejected.
    pub fn new(row_metadata: Option<M>, rows: Vec<R>, rows_updated: Vec<u64>) -> Result<Self> {
        if row_metadata.is_none() && !rows.is_empty() {
            return Err(MockResultError::MissingRowMetadata { rows: rows.len() });
        }

        Ok(Self {
            row_metadata: row_metadata.map(Arc::new),
            rows: rows.into(),
            rows_updated: rows_updated.into(),
        })
    }

    pub fn builder() -> Builder<R, M> {
        Builder::default()
    }

    /// A result with no metadata, no rows and no update counts.
    pub fn empty() -> Self {
        Self {
            row_metadata: None,
            rows: Arc::from(Vec::new()),
            rows_updated: Arc::from(Vec::new()),
        }
    }

    pub fn row_metadata(&self) -> Option<&M> {
        self.row_metadata.as_deref()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn rows_updated(&self) -> &[u64] {
        &self.rows_updated
    }
}

impl<R, M> spi::QueryResult for MockResult<R, M>
where
    R: spi::Row + 'static,
    M: spi::RowMetadata + 'static,
{
    type Row = R;
    type Metadata = M;

    fn update_counts(&self) -> BoxStream<'static, u64> {
        let counts = Arc::clone(&self.rows_updated);
        stream::iter(0..counts.len())
            .map(move |index| counts[index])
            .boxed()
    }

    fn map<T, F>(&self, mut mapping: F) -> BoxStream<'static, T>
    where
        F: FnMut(&R, &M) -> T + Send + 'static,
        T: Send + 'static,
    {
        // Rows zipped with the repeated metadata: no metadata, no items.
        let Some(metadata) = self.row_metadata.clone() else {
            return stream::empty().boxed();
        };
        let rows = Arc::clone(&self.rows);
        stream::iter(0..rows.len())
            .map(move |index| mapping(&rows[index], &*metadata))
            .boxed()
    }

    fn filter<P>(&self, _predicate: P) -> Result<Self>
    where
        P: FnMut(&Segment<R>) -> bool,
    {
        Err(unsupported("filter"))
    }

    fn flat_map<T, F, S>(&self, _mapping: F) -> Result<BoxStream<'static, T>>
    where
        F: FnMut(Segment<R>) -> S + Send + 'static,
        S: Stream<Item = T> + Send + 'static,
        T: Send + 'static,
    {
        Err(unsupported("flat_map"))
    }
}

// TODO: replace with real segment filtering once Segment carries
// row metadata alongside each row.
fn unsupported(operation: &'static str) -> MockResultError {
    #[cfg(feature = "tracing")]
    tracing::warn!(operation, "segment operation called on MockResult");

    MockResultError::Unsupported { operation }
}

/// Accumulates fixture data for a [`MockResult`].
///
/// `build` snapshots the current state and leaves the builder untouched, so
/// later calls to `row` or `rows_updated` show up only in later builds.
pub struct Builder<R = MockRow, M = MockRowMetadata> {
    row_metadata: Option<M>,
    rows: Vec<R>,
    rows_updated: Vec<u64>,
}

impl<R, M> Default for Builder<R, M> {
    fn default() -> Self {
        Self {
            row_metadata: None,
            rows: Vec::new(),
            rows_updated: Vec::new(),
        }
    }
}

impl<R: fmt::Debug, M: fmt::Debug> fmt::Debug for Builder<R, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("row_metadata", &self.row_metadata)
            .field("rows", &self.rows)
            .field("rows_updated", &self.rows_updated)
            .finish()
    }
}

impl<R, M> Builder<R, M> {
    pub fn row(&mut self, row: R) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Appends rows in iteration order.
    pub fn rows<I>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
    {
        self.rows.extend(rows);
        self
    }

    pub fn try_row(&mut self, row: Option<R>) -> Result<&mut Self> {
        let row = row.ok_or_else(|| MockResultError::null("row"))?;
        Ok(self.row(row))
    }

    /// Appends rows only if every element is present.
    pub fn try_rows<I>(&mut self, rows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Option<R>>,
    {
        let rows = rows
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MockResultError::null("rows"))?;
        Ok(self.rows(rows))
    }

    /// Sets the row metadata, replacing any earlier value.
    pub fn row_metadata(&mut self, row_metadata: M) -> &mut Self {
        self.row_metadata = Some(row_metadata);
        self
    }

    pub fn try_row_metadata(&mut self, row_metadata: Option<M>) -> Result<&mut Self> {
        let row_metadata = row_metadata.ok_or_else(|| MockResultError::null("row_metadata"))?;
        Ok(self.row_metadata(row_metadata))
    }

    pub fn rows_updated(&mut self, rows_updated: u64) -> &mut Self {
        self.rows_updated.push(rows_updated);
        self
    }

    pub fn try_rows_updated(&mut self, rows_updated: Option<u64>) -> Result<&mut Self> {
        let rows_updated = rows_updated.ok_or_else(|| MockResultError::null("rows_updated"))?;
        Ok(self.rows_updated(rows_updated))
    }
}

impl<R: Clone, M: Clone> Builder<R, M> {
    pub fn build(&self) -> Result<MockResult<R, M>> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = self.rows.len(),
            rows_updated = self.rows_updated.len(),
            has_row_metadata = self.row_metadata.is_some(),
            "building mock result"
        );

        MockResult::new(
            self.row_metadata.clone(),
            self.rows.clone(),
            self.rows_updated.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, StreamExt};

    use crate::spi::QueryResult;
    use crate::{MockResult, MockResultError, MockRow, MockRowMetadata, Value};

    fn row(id: i64) -> MockRow {
        MockRow::new([("id", Value::integer(id))])
    }

    fn ids(result: &MockResult) -> Vec<i64> {
        block_on(
            result
                .map(|row, _| row.get_i64("id").unwrap_or_default())
                .collect(),
        )
    }

    #[test]
    fn map_pairs_every_row_with_metadata() {
        let metadata = MockRowMetadata::from_names(["id"]);
        let result = MockResult::builder()
            .row_metadata(metadata.clone())
            .row(row(1))
            .rows([row(2), row(3)])
            .build()
            .expect("must build");

        let mapped: Vec<(i64, MockRowMetadata)> = block_on(
            result
                .map(|row, md| (row.get_i64("id").unwrap_or_default(), md.clone()))
                .collect(),
        );

        assert_eq!(
            mapped,
            vec![(1, metadata.clone()), (2, metadata.clone()), (3, metadata)]
        );
    }

    #[test]
    fn update_counts_keep_insertion_order() {
        let result: MockResult = MockResult::builder()
            .rows_updated(3)
            .rows_updated(1)
            .rows_updated(2)
            .build()
            .expect("must build");

        let counts: Vec<u64> = block_on(result.update_counts().collect());
        assert_eq!(counts, vec![3, 1, 2]);
    }

    #[test]
    fn last_row_metadata_wins() {
        let result = MockResult::builder()
            .row_metadata(MockRowMetadata::from_names(["first"]))
            .row_metadata(MockRowMetadata::from_names(["second"]))
            .row(row(1))
            .build()
            .expect("must build");

        let names: Vec<String> = block_on(
            result
                .map(|_, md| md.columns()[0].name.clone())
                .collect(),
        );
        assert_eq!(names, vec!["second".to_owned()]);
    }

    #[test]
    fn rows_without_metadata_are_rejected() {
        let err = MockResult::<MockRow, MockRowMetadata>::builder()
            .row(row(1))
            .row(row(2))
            .build()
            .expect_err("must fail");

        assert_eq!(err, MockResultError::MissingRowMetadata { rows: 2 });
    }

    #[test]
    fn no_metadata_and_no_rows_maps_to_nothing() {
        let result: MockResult = MockResult::builder().build().expect("must build");
        assert!(result.row_metadata().is_none());
        assert!(ids(&result).is_empty());
    }

    #[test]
    fn absent_values_leave_builder_unchanged() {
        let mut builder = MockResult::builder();
        builder.row_metadata(MockRowMetadata::from_names(["id"]));
        builder.row(row(1)).rows_updated(5);

        assert_eq!(
            builder.try_row(None).expect_err("must fail"),
            MockResultError::InvariantViolation { parameter: "row" }
        );
        assert_eq!(
            builder
                .try_rows([Some(row(2)), None, Some(row(3))])
                .expect_err("must fail"),
            MockResultError::InvariantViolation { parameter: "rows" }
        );
        assert_eq!(
            builder.try_row_metadata(None).expect_err("must fail"),
            MockResultError::InvariantViolation {
                parameter: "row_metadata"
            }
        );
        assert_eq!(
            builder.try_rows_updated(None).expect_err("must fail"),
            MockResultError::InvariantViolation {
                parameter: "rows_updated"
            }
        );

        let result = builder.build().expect("must build");
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(result.rows_updated(), &[5]);
        assert_eq!(
            result.row_metadata(),
            Some(&MockRowMetadata::from_names(["id"]))
        );
    }

    #[test]
    fn present_values_through_try_methods_are_appended() {
        let mut builder = MockResult::builder();
        builder
            .try_row_metadata(Some(MockRowMetadata::from_names(["id"])))
            .expect("must accept")
            .try_rows([Some(row(1)), Some(row(2))])
            .expect("must accept")
            .try_row(Some(row(3)))
            .expect("must accept")
            .try_rows_updated(Some(9))
            .expect("must accept");

        let result = builder.build().expect("must build");
        assert_eq!(ids(&result), vec![1, 2, 3]);
        assert_eq!(result.rows_updated(), &[9]);
    }

    #[test]
    fn build_snapshots_current_state() {
        let mut builder = MockResult::builder();
        builder.row_metadata(MockRowMetadata::from_names(["id"]));
        builder.row(row(1));

        let first = builder.build().expect("must build");
        let second = builder.build().expect("must build");
        builder.row(row(2));
        let third = builder.build().expect("must build");

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec![1]);
        assert_eq!(ids(&third), vec![1, 2]);
    }

    #[test]
    fn segment_operations_are_unsupported() {
        let result: MockResult = MockResult::empty();

        assert_eq!(
            result.filter(|_| true).expect_err("must fail"),
            MockResultError::Unsupported { operation: "filter" }
        );
        let err = result
            .flat_map(|_| futures::stream::empty::<u64>())
            .err()
            .expect("must fail");
        assert_eq!(
            err,
            MockResultError::Unsupported {
                operation: "flat_map"
            }
        );
    }

    #[test]
    fn debug_names_all_parts() {
        let result = MockResult::builder()
            .row_metadata(MockRowMetadata::from_names(["id"]))
            .row(row(1))
            .rows_updated(1)
            .build()
            .expect("must build");

        let debug = format!("{result:?}");
        assert!(debug.starts_with("MockResult {"));
        assert!(debug.contains("row_metadata"));
        assert!(debug.contains("rows_updated: [1]"));

        let builder = MockResult::<MockRow, MockRowMetadata>::builder();
        assert!(format!("{builder:?}").starts_with("Builder {"));
    }
}
