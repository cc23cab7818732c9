//! # Tabular formats and object naming
//!
//! Tables are Arrow [`RecordBatch`]es. They are encoded entirely in memory,
//! and the object they are uploaded to is named after the optional base name
//! and the second they were written.

use std::fmt;
use std::str::FromStr;

use arrow_array::RecordBatch;
use arrow_json::writer::JsonArray;
use chrono::NaiveDateTime;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::{Error, Result};

/// `YYYYMMDDHHMMSS`, always 14 digits.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
    Json,
}

impl FileFormat {
    pub const ALL: [FileFormat; 3] = [FileFormat::Csv, FileFormat::Parquet, FileFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Parquet => "parquet",
            FileFormat::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Parquet => "application/octet-stream",
            FileFormat::Json => "application/json",
        }
    }

    /// Guesses the format from a path or key by its extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Serializes `table` into an in-memory payload.
    pub fn encode(self, table: &RecordBatch) -> anyhow::Result<Vec<u8>> {
        match self {
            FileFormat::Csv => encode_csv(table),
            FileFormat::Parquet => encode_parquet(table),
            FileFormat::Json => encode_json(table),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(FileFormat::Csv),
            "parquet" => Ok(FileFormat::Parquet),
            "json" => Ok(FileFormat::Json),
            _ => Err(Error::invalid_argument(format!(
                "unsupported file format '{s}'; supported formats are: csv, parquet, json"
            ))),
        }
    }
}

// Header row, comma separated, no index column.
fn encode_csv(table: &RecordBatch) -> anyhow::Result<Vec<u8>> {
    let mut writer = arrow_csv::WriterBuilder::new()
        .with_header(true)
        .with_delimiter(b',')
        .build(Vec::new());
    writer.write(table)?;
    Ok(writer.into_inner())
}

// The whole table goes into a single row group.
fn encode_parquet(table: &RecordBatch) -> anyhow::Result<Vec<u8>> {
    let props = WriterProperties::builder()
        .set_max_row_group_size(table.num_rows().max(1))
        .build();
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, table.schema(), Some(props))?;
    writer.write(table)?;
    writer.close()?;
    Ok(buf)
}

// An array of row objects keyed by column name; null cells are written as
// `null` so every object carries every column.
fn encode_json(table: &RecordBatch) -> anyhow::Result<Vec<u8>> {
    let mut writer = arrow_json::WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(Vec::new());
    writer.write(table)?;
    writer.finish()?;
    Ok(writer.into_inner())
}

/// `<base>_<timestamp>.<ext>`, or `<timestamp>.<ext>` without a base name.
pub fn generated_file_name(base_name: Option<&str>, at: NaiveDateTime, format: FileFormat) -> String {
    let ts = at.format(TIMESTAMP_FORMAT);
    match base_name.filter(|b| !b.is_empty()) {
        Some(base) => format!("{base}_{ts}.{format}"),
        None => format!("{ts}.{format}"),
    }
}

pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!("{prefix}/{file_name}")
}

/// Last `/`-separated segment of an object key.
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow_array::{ArrayRef, Int64Array, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use chrono::NaiveDate;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn people() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            (
                "name",
                Arc::new(StringArray::from(vec!["Canh", "Bob", "Charlie"])) as ArrayRef,
            ),
            ("age", Arc::new(Int64Array::from(vec![25, 30, 35])) as ArrayRef),
        ])
        .unwrap()
    }

    fn with_gaps() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("age", DataType::Int64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some("Canh"), None, Some("Charlie")])) as ArrayRef,
                Arc::new(Int64Array::from(vec![Some(25), None, None])) as ArrayRef,
            ],
        )
        .unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parse_supported_formats() {
        for f in FileFormat::ALL {
            assert_eq!(f.extension().parse::<FileFormat>().unwrap(), f);
        }
        for bad in ["xlsx", "CSV", "", "avro"] {
            let err = bad.parse::<FileFormat>().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn content_types() {
        assert_eq!(FileFormat::Csv.content_type(), "text/csv");
        assert_eq!(FileFormat::Parquet.content_type(), "application/octet-stream");
        assert_eq!(FileFormat::Json.content_type(), "application/json");
    }

    #[test]
    fn from_path_uses_extension() {
        assert_eq!(FileFormat::from_path("dir/a.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path("a.PARQUET"), Some(FileFormat::Parquet));
        assert_eq!(FileFormat::from_path("a.txt"), None);
        assert_eq!(FileFormat::from_path("noext"), None);
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let bytes = FileFormat::Csv.encode(&people()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,age\nCanh,25\nBob,30\nCharlie,35\n"
        );
    }

    #[test]
    fn csv_reads_back() {
        for table in [people(), with_gaps()] {
            let bytes = FileFormat::Csv.encode(&table).unwrap();
            let reader = arrow_csv::ReaderBuilder::new(table.schema())
                .with_header(true)
                .build(std::io::Cursor::new(bytes))
                .unwrap();
            let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().unwrap();
            assert_eq!(batches.len(), 1);
            assert_eq!(batches[0], table);
        }
    }

    #[test]
    fn csv_writes_nulls_as_empty_fields() {
        let bytes = FileFormat::Csv.encode(&with_gaps()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,age\nCanh,25\n,\nCharlie,\n"
        );
    }

    #[test]
    fn json_is_array_of_records() {
        let bytes = FileFormat::Json.encode(&people()).unwrap();
        let rows: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            rows,
            serde_json::json!([
                {"name": "Canh", "age": 25},
                {"name": "Bob", "age": 30},
                {"name": "Charlie", "age": 35},
            ])
        );
    }

    #[test]
    fn json_rows_keep_every_column_when_null() {
        let bytes = FileFormat::Json.encode(&with_gaps()).unwrap();
        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 2, "{row:?}");
            assert!(row.contains_key("name") && row.contains_key("age"));
        }
        assert_eq!(
            serde_json::Value::Array(rows.into_iter().map(serde_json::Value::Object).collect()),
            serde_json::json!([
                {"name": "Canh", "age": 25},
                {"name": null, "age": null},
                {"name": "Charlie", "age": null},
            ])
        );
    }

    #[test]
    fn parquet_reads_back_as_one_row_group() {
        let table = people();
        let bytes = FileFormat::Parquet.encode(&table).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(bytes)).unwrap();
        assert_eq!(builder.metadata().num_row_groups(), 1);
        let batches: Vec<RecordBatch> = builder
            .build()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 3);
        assert_eq!(batches[0].column(0), table.column(0));
        assert_eq!(batches[0].column(1), table.column(1));
    }

    #[test]
    fn parquet_keeps_nulls() {
        let table = with_gaps();
        let bytes = FileFormat::Parquet.encode(&table).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(bytes)).unwrap();
        assert_eq!(builder.metadata().num_row_groups(), 1);
        let batches: Vec<RecordBatch> = builder
            .build()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].num_rows(), 3);
        assert_eq!(batches[0].column(0), table.column(0));
        assert_eq!(batches[0].column(1), table.column(1));
        assert_eq!(batches[0].column(1).null_count(), 2);
    }

    #[test]
    fn file_name_with_and_without_base() {
        let t = at(12, 0, 0);
        assert_eq!(
            generated_file_name(Some("canhld"), t, FileFormat::Csv),
            "canhld_20250101120000.csv"
        );
        assert_eq!(generated_file_name(None, t, FileFormat::Json), "20250101120000.json");
        assert_eq!(
            generated_file_name(Some(""), at(9, 5, 7), FileFormat::Parquet),
            "20250101090507.parquet"
        );
    }

    #[test]
    fn key_and_base_name() {
        let key = object_key("data_test_check", "canhld_20250101120000.csv");
        assert_eq!(key, "data_test_check/canhld_20250101120000.csv");
        assert_eq!(base_name(&key), "canhld_20250101120000.csv");
        assert_eq!(base_name("plain.csv"), "plain.csv");
    }
}
