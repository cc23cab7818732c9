use std::path::Path;

use anyhow::{Result, bail};
use gcs_helper::gcp::gcs::parse_gs_url;

use crate::common::Client;

pub fn run(client: &Client, path: &Path, url: &str) -> Result<()> {
    let (bucket, key) = parse_gs_url(url)?;
    if key.is_empty() || key.ends_with('/') {
        bail!("upload requires a full object path, not a bucket or prefix: {}", url);
    }
    client.upload_file(path, &bucket, &key)?;
    Ok(())
}
