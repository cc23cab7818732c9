//! # Storage client
//!
//! [`StorageClient`] is the convenience surface of this crate: list buckets,
//! upload a file, download one or many objects, and upload a table directly
//! in CSV, Parquet or JSON. Every operation logs its outcome through the
//! injected [`Diagnostics`] sink and hands failures straight back to the
//! caller; nothing is retried.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use arrow_array::RecordBatch;
use chrono::{Local, NaiveDateTime};

use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::format::{FileFormat, base_name, generated_file_name, object_key};
use crate::store::ObjectStore;

/// Where downloads land when the caller gives no destination.
pub const DEFAULT_DOWNLOAD_DIR: &str = "data_downloaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Exactly one object, named by its key.
    Single,
    /// Every object under a prefix with a given extension.
    Full,
}

impl FromStr for DownloadMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(DownloadMode::Single),
            "full" => Ok(DownloadMode::Full),
            _ => Err(Error::invalid_argument(format!(
                "unsupported mode '{s}'; supported modes are: 'single', 'full'"
            ))),
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DownloadMode::Single => "single",
            DownloadMode::Full => "full",
        })
    }
}

pub struct StorageClient<S> {
    store: S,
    diag: Diagnostics,
    download_dir: PathBuf,
}

#[cfg(feature = "reqwest")]
impl StorageClient<crate::gcp::gcs::GcsClient> {
    /// Builds a client from resolved [`crate::config::GOOGLE_AUTHENTICATION`]
    /// values. The service-account key is parsed and exchanged for an access
    /// token before this returns.
    pub fn from_config(config: &crate::config::Config, diag: Diagnostics) -> Result<Self> {
        use crate::config::{GOOGLE_CLOUD_PROJECT, GOOGLE_SERVICE_ACCOUNT};
        use crate::gcp::TokenProvider;
        use crate::gcp::gcs::GcsClient;

        diag.info(format_args!("Initializing storage client..."));
        diag.info(format_args!(
            "Configuration {} loaded: {}",
            config.schema(),
            config.names().collect::<Vec<_>>().join(", ")
        ));
        let service_account = config.require(GOOGLE_SERVICE_ACCOUNT)?;
        let project = config.require(GOOGLE_CLOUD_PROJECT)?;

        let http = GcsClient::http_client().map_err(|e| Error::backend("connect", e))?;
        let auth = TokenProvider::from_json(service_account, http.clone()).map_err(|e| {
            diag.error(format_args!("Failed to parse service account: {e:#}"));
            Error::Authentication(format!("{e:#}"))
        })?;
        let email = auth.client_email().to_string();
        let gcs = GcsClient::new(auth, http, project);
        gcs.authenticate().map_err(|e| {
            diag.error(format_args!(
                "Failed to authenticate as '{email}' for project '{project}': {e:#}"
            ));
            Error::Authentication(format!("{e:#}"))
        })?;

        diag.info(format_args!(
            "Google Cloud Storage client initialized for project '{project}' as '{email}'."
        ));
        Ok(Self::with_store(gcs, diag))
    }

    /// Loads the credential variables from `source` and connects.
    pub fn connect(source: &dyn crate::config::VariableSource, diag: Diagnostics) -> Result<Self> {
        diag.info(format_args!("Loading Google Cloud configuration..."));
        let config = crate::config::load(&crate::config::GOOGLE_AUTHENTICATION, source)
            .inspect_err(|e| diag.error(format_args!("{e}")))?;
        Self::from_config(&config, diag)
    }
}

impl<S: ObjectStore> StorageClient<S> {
    pub fn with_store(store: S, diag: Diagnostics) -> Self {
        StorageClient {
            store,
            diag,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        }
    }

    /// Changes the directory used when a download has no destination.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // The target ends up both in the log line and in the error's cause chain.
    fn backend_failure(&self, op: &'static str, target: fmt::Arguments<'_>, cause: anyhow::Error) -> Error {
        let err = Error::backend(op, cause.context(target.to_string()));
        self.diag.error(format_args!("[{}] {err}", err.kind()));
        err
    }

    fn rejected(&self, op: &'static str, err: Error) -> Error {
        self.diag
            .error(format_args!("[{}] {op} rejected: {err}", err.kind()));
        err
    }

    pub fn list_buckets(&self) -> Result<Vec<String>> {
        self.diag.info(format_args!("Listing all buckets..."));
        let buckets = self
            .store
            .list_buckets()
            .map_err(|e| {
                self.backend_failure("list_buckets", format_args!("{}", self.store.target()), e)
            })?;
        self.diag
            .info(format_args!("Buckets retrieved: {}", buckets.join(", ")));
        Ok(buckets)
    }

    /// Streams `local_path` to `bucket/object_key`, replacing any existing
    /// object.
    pub fn upload_file(&self, local_path: &Path, bucket: &str, object_key: &str) -> Result<()> {
        self.diag.info(format_args!(
            "Uploading file '{}' to bucket '{bucket}' as '{object_key}'...",
            local_path.display()
        ));
        let content_type = local_path
            .to_str()
            .and_then(FileFormat::from_path)
            .map_or("application/octet-stream", FileFormat::content_type);
        self.store
            .put_file(bucket, object_key, local_path, content_type)
            .map_err(|e| {
                self.backend_failure(
                    "upload_file",
                    format_args!("'{}' -> gs://{bucket}/{object_key}", local_path.display()),
                    e,
                )
            })?;
        self.diag.info(format_args!(
            "File '{}' uploaded to 'gs://{bucket}/{object_key}'.",
            local_path.display()
        ));
        Ok(())
    }

    /// Downloads objects to the local filesystem and returns the paths written.
    ///
    /// In `single` mode `source_key` names the object; `dest_path` is the file
    /// to write. In `full` mode every object under `prefix` whose key ends with
    /// `.<format>` is written into the directory `dest_path`, keeping its base
    /// name. Without `dest_path` the client's download directory is used and
    /// created if needed.
    ///
    /// A `full` download that fails part-way leaves the files already written.
    pub fn download(
        &self,
        bucket: &str,
        prefix: &str,
        format: &str,
        mode: &str,
        source_key: Option<&str>,
        dest_path: Option<&Path>,
    ) -> Result<Vec<PathBuf>> {
        self.diag.info(format_args!(
            "Downloading files from bucket '{bucket}' with prefix '{prefix}' in mode '{mode}'..."
        ));
        let mode: DownloadMode = mode.parse().map_err(|e| self.rejected("download", e))?;
        match mode {
            DownloadMode::Single => {
                let key = source_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                    self.rejected(
                        "download",
                        Error::invalid_argument("'source_key' is required for 'single' mode"),
                    )
                })?;
                let dest = match dest_path {
                    Some(p) => p.to_path_buf(),
                    None => self.ensure_download_dir()?.join(base_name(key)),
                };
                self.fetch(bucket, key, &dest)?;
                Ok(vec![dest])
            }
            DownloadMode::Full => {
                let dir = match dest_path {
                    Some(p) => p.to_path_buf(),
                    None => self.ensure_download_dir()?,
                };
                let suffix = format!(".{format}");
                let keys = self.store.list_objects(bucket, prefix).map_err(|e| {
                    self.backend_failure("download", format_args!("gs://{bucket}/{prefix}"), e)
                })?;
                let mut written = Vec::new();
                if !keys.iter().any(|k| k.ends_with(&suffix)) {
                    self.diag.warn(format_args!(
                        "No '{suffix}' objects under 'gs://{bucket}/{prefix}'."
                    ));
                }
                for key in keys.iter().filter(|k| k.ends_with(&suffix)) {
                    let dest = dir.join(base_name(key));
                    self.fetch(bucket, key, &dest)?;
                    written.push(dest);
                }
                self.diag.info(format_args!(
                    "Downloaded {} of {} objects under 'gs://{bucket}/{prefix}'.",
                    written.len(),
                    keys.len()
                ));
                Ok(written)
            }
        }
    }

    fn ensure_download_dir(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.download_dir).map_err(|e| {
            self.backend_failure(
                "download",
                format_args!("'{}'", self.download_dir.display()),
                anyhow::Error::new(e).context("Failed to create download directory"),
            )
        })?;
        Ok(self.download_dir.clone())
    }

    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        let n = self.store.get_to_file(bucket, key, dest).map_err(|e| {
            self.backend_failure(
                "download",
                format_args!("gs://{bucket}/{key} -> '{}'", dest.display()),
                e,
            )
        })?;
        self.diag.info(format_args!(
            "Blob '{key}' downloaded to '{}' ({n} bytes).",
            dest.display()
        ));
        Ok(())
    }

    /// Encodes `table` in memory and uploads it to
    /// `<prefix>/[<base_name>_]<YYYYMMDDHHMMSS>.<format>`, stamped with the
    /// current local time. Returns the object key.
    pub fn upload_table(
        &self,
        bucket: &str,
        prefix: &str,
        table: &RecordBatch,
        base_name: Option<&str>,
        format: &str,
    ) -> Result<String> {
        self.upload_table_at(bucket, prefix, table, base_name, format, Local::now().naive_local())
    }

    /// [`StorageClient::upload_table`] with an explicit timestamp.
    pub fn upload_table_at(
        &self,
        bucket: &str,
        prefix: &str,
        table: &RecordBatch,
        base_name: Option<&str>,
        format: &str,
        at: NaiveDateTime,
    ) -> Result<String> {
        self.diag.info(format_args!(
            "Uploading table to bucket '{bucket}' with prefix '{prefix}' in format '{format}'..."
        ));
        let format: FileFormat = format.parse().map_err(|e| self.rejected("upload_table", e))?;
        let key = object_key(prefix, &generated_file_name(base_name, at, format));

        let data = format.encode(table).map_err(|e| {
            self.rejected(
                "upload_table",
                Error::invalid_argument(format!("table cannot be encoded as {format}: {e:#}")),
            )
        })?;
        let size = data.len();
        self.store
            .put_bytes(bucket, &key, data, format.content_type())
            .map_err(|e| self.backend_failure("upload_table", format_args!("gs://{bucket}/{key}"), e))?;

        self.diag.info(format_args!(
            "Table with {} rows uploaded to 'gs://{bucket}/{key}' ({size} bytes).",
            table.num_rows()
        ));
        Ok(key)
    }
}
