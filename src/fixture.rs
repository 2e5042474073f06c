//! JSON fixtures for [`MockResult`].
//!
//! A fixture document looks like:
//!
//! ```json
//! {
//!   "cols": [{ "name": "id", "decltype": "INTEGER" }],
//!   "rows": [[{ "type": "integer", "value": "1" }]],
//!   "rows_updated": [1]
//! }
//! ```
//!
//! A missing `cols` key means the result has no row metadata.

use serde::Deserialize;

use crate::{ColumnMetadata, MockResult, MockResultError, MockRow, MockRowMetadata, Result, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResultFixture {
    #[serde(default)]
    cols: Option<Vec<ColFixture>>,
    #[serde(default)]
    rows: Vec<Vec<ValueFixture>>,
    #[serde(default)]
    rows_updated: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct ColFixture {
    name: String,
    #[serde(default)]
    decltype: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ValueFixture {
    Null {},
    Integer { value: String },
    Float { value: String },
    Text { value: String },
    Blob { base64: String },
}

impl MockResult<MockRow, MockRowMetadata> {
    /// Builds a result from a JSON fixture document.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture = serde_json::from_str::<ResultFixture>(json)
            .map_err(|err| MockResultError::Decode(format!("invalid result fixture JSON: {err}")))?;
        decode_fixture(fixture)
    }
}

fn decode_fixture(fixture: ResultFixture) -> Result<MockResult> {
    let row_metadata = fixture.cols.map(|cols| {
        MockRowMetadata::new(
            cols.into_iter()
                .map(|col| ColumnMetadata {
                    name: col.name,
                    decltype: col.decltype,
                })
                .collect::<Vec<_>>(),
        )
    });

    let names: Vec<&str> = row_metadata
        .as_ref()
        .map(|metadata| metadata.columns().iter().map(|col| col.name.as_str()).collect())
        .unwrap_or_default();

    let rows = fixture
        .rows
        .into_iter()
        .enumerate()
        .map(|(index, values)| {
            if values.len() != names.len() {
                return Err(MockResultError::Decode(format!(
                    "row {index} has {} value(s), expected {}",
                    values.len(),
                    names.len()
                )));
            }
            let cells = names
                .iter()
                .zip(values)
                .map(|(name, value)| decode_value(value).map(|value| (*name, value)))
                .collect::<Result<Vec<_>>>()?;
            Ok(MockRow::new(cells))
        })
        .collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = rows.len(),
        rows_updated = fixture.rows_updated.len(),
        "decoded result fixture"
    );

    MockResult::new(row_metadata, rows, fixture.rows_updated)
}

fn decode_value(value: ValueFixture) -> Result<Value> {
    match value {
        ValueFixture::Null {} => Ok(Value::Null),
        ValueFixture::Integer { value } => value.parse::<i64>().map(Value::Integer).map_err(|err| {
            MockResultError::Decode(format!("invalid integer value '{value}': {err}"))
        }),
        ValueFixture::Float { value } => value
            .parse::<f64>()
            .map_err(|err| MockResultError::Decode(format!("invalid float value '{value}': {err}")))
            .and_then(|parsed| {
                if parsed.is_finite() {
                    Ok(Value::Float(parsed))
                } else {
                    Err(MockResultError::Decode(format!(
                        "non-finite float value '{value}' is unsupported"
                    )))
                }
            }),
        ValueFixture::Text { value } => Ok(Value::Text(value)),
        ValueFixture::Blob { base64 } => Ok(Value::BlobBase64(base64)),
    }
}
