use std::sync::Arc;

use anyhow::Result;
use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use gcs_helper::config::Environment;
use gcs_helper::gcp::gcs::GcsClient;
use gcs_helper::{Diagnostics, StorageClient};
use log::LevelFilter;

pub type Client = StorageClient<GcsClient>;

pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

/// Builds a client from GOOGLE_SERVICE_ACCOUNT / GOOGLE_CLOUD_PROJECT.
pub fn connect(level: LevelFilter) -> Result<Client> {
    Ok(StorageClient::connect(&Environment, Diagnostics::new(level))?)
}

pub fn sample_table() -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
    ]);
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["Canh", "Bob", "Charlie"])),
        Arc::new(Int64Array::from(vec![25, 30, 35])),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
