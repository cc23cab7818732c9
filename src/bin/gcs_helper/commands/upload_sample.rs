use anyhow::Result;

use crate::common::{Client, sample_table};

pub fn run(client: &Client, bucket: &str, prefix: &str, name: &str, format: &str) -> Result<()> {
    let table = sample_table()?;
    let base_name = Some(name).filter(|n| !n.is_empty());
    let key = client.upload_table(bucket, prefix, &table, base_name, format)?;
    println!("gs://{bucket}/{key}");
    Ok(())
}
