use std::path::Path;

use anyhow::Result;
use gcs_helper::gcp::gcs::parse_gs_url;

use crate::common::Client;

pub fn run(client: &Client, url: &str, mode: &str, format: &str, dest: Option<&Path>) -> Result<()> {
    let (bucket, path) = parse_gs_url(url)?;
    // The URL path is the object key in single mode and the prefix in full mode.
    let source_key = Some(path.as_str()).filter(|p| !p.is_empty());
    let written = client.download(&bucket, &path, format, mode, source_key, dest)?;
    for p in written {
        println!("{}", p.display());
    }
    Ok(())
}
