//! The seam between [`crate::client::StorageClient`] and whatever actually
//! talks to the object store. Backends report failures with `anyhow`; the
//! client decides how they surface.

use std::path::Path;

use anyhow::Result;

pub trait ObjectStore {
    /// What this store talks to, for log lines and error messages.
    fn target(&self) -> String;

    /// Names of every bucket visible to the credential.
    fn list_buckets(&self) -> Result<Vec<String>>;

    /// Keys of every object whose name starts with `prefix`, at any depth.
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Writes `data` to `bucket/key`, replacing any existing object.
    fn put_bytes(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Streams the file at `path` to `bucket/key`, replacing any existing object.
    fn put_file(&self, bucket: &str, key: &str, path: &Path, content_type: &str) -> Result<()>;

    /// Writes the object's bytes to `dest` and returns how many were written.
    fn get_to_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;
}
