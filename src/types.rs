use crate::{spi, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub decltype: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decltype: None,
        }
    }

    /// Sets the declared SQL type, e.g. `INTEGER`.
    pub fn with_decltype(mut self, decltype: impl Into<String>) -> Self {
        self.decltype = Some(decltype.into());
        self
    }
}

/// In-memory row metadata made of ordered column descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockRowMetadata {
    columns: Vec<ColumnMetadata>,
}

impl MockRowMetadata {
    pub fn new(columns: impl Into<Vec<ColumnMetadata>>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    /// Builds metadata from bare column names without declared types.
    pub fn from_names<I, K>(names: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            columns: names.into_iter().map(ColumnMetadata::new).collect(),
        }
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl spi::RowMetadata for MockRowMetadata {
    fn column_metadata(&self, index: usize) -> Option<&ColumnMetadata> {
        self.columns.get(index)
    }

    fn column_metadata_by_name(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|col| col.name.eq_ignore_ascii_case(name))
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }
}

/// In-memory row of named cells.
///
/// Cells keep insertion order, so positional and name-based access agree
/// with the column order of the metadata the row was built for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockRow {
    cells: Vec<(String, Value)>,
}

impl MockRow {
    /// Builds a row from `(name, value)` pairs.
    pub fn new<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Appends a named cell.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.push((name.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, value)| value)
    }

    /// Returns an integer value by column name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        spi::Row::get_by_name(self, name)?.as_i64()
    }

    /// Returns a float value by column name.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        spi::Row::get_by_name(self, name)?.as_f64()
    }

    /// Returns a text value by column name.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        spi::Row::get_by_name(self, name)?.as_str()
    }
}

impl spi::Row for MockRow {
    fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).map(|(_, value)| value)
    }

    fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(cell, _)| cell.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}
