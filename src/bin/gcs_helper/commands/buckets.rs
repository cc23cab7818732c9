use anyhow::Result;

use crate::common::Client;

pub fn run(client: &Client) -> Result<()> {
    for name in client.list_buckets()? {
        println!("{name}");
    }
    Ok(())
}
