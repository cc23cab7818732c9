//! # GCS API Client Logic
//!
//! Blocking client for the Cloud Storage JSON API: bucket and object listing,
//! one-shot media uploads and media downloads.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Url;
use reqwest::blocking::{Body, Client, RequestBuilder, Response};

use crate::gcp::auth::TokenProvider;
use crate::gcp::gcs::types::{BucketListResponse, ListResponse};
use crate::store::ObjectStore;

const API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Parses a GCS URL string (`gs://bucket/object/path`) into a bucket and object prefix.
pub fn parse_gs_url(s: &str) -> Result<(String, String)> {
    let rest = s
        .strip_prefix("gs://")
        .context("URL must start with gs://")?;
    let (bucket, prefix) = match rest.split_once('/') {
        Some((b, p)) => (b.to_string(), p.to_string()),
        None => (rest.to_string(), String::new()),
    };
    if bucket.is_empty() {
        bail!("Bucket is empty in URL: {}", s);
    }
    Ok((bucket, prefix))
}

/// GCS API requires object paths to be percent-encoded as a single path segment,
/// so '/' inside an object name must become %2F.
pub fn encode_object_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.as_bytes() {
        let c = *b as char;
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
            out.push(c);
        } else {
            out.push('%');
            out.push_str(&format!("{:02X}", b));
        }
    }
    out
}

/// An authenticated handle on the Cloud Storage JSON API.
pub struct GcsClient {
    http: Client,
    auth: TokenProvider,
    project_id: String,
}

impl GcsClient {
    pub fn new(auth: TokenProvider, http: Client, project_id: &str) -> Self {
        GcsClient {
            http,
            auth,
            project_id: project_id.to_string(),
        }
    }

    /// The HTTP client used for both token exchange and storage calls.
    pub fn http_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")
    }

    /// Obtains an access token now, so credential problems show up before the
    /// first real request.
    pub fn authenticate(&self) -> Result<()> {
        self.auth.token().map(|_| ())
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.auth.token().context("Failed to get access token")?;
        Ok(req.header("Authorization", format!("Bearer {}", token)))
    }

    fn check(res: Response, what: &str) -> Result<Response> {
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            bail!("GCS {} failed ({}): {}", what, status, body);
        }
        Ok(res)
    }

    fn upload_url(bucket: &str, name: &str) -> Result<Url> {
        // Use the "media" upload type for simple, one-shot uploads.
        let mut url = Url::parse(&format!("{}/b/{}/o", UPLOAD_BASE, bucket))?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", name);
        Ok(url)
    }

    fn upload(&self, bucket: &str, name: &str, body: Body, content_type: &str) -> Result<()> {
        let req = self
            .http
            .post(Self::upload_url(bucket, name)?)
            .header("Content-Type", content_type)
            .body(body);
        let res = self
            .authorized(req)?
            .send()
            .context("Failed to call GCS upload API")?;
        Self::check(res, "upload")?;
        Ok(())
    }
}

impl ObjectStore for GcsClient {
    fn target(&self) -> String {
        format!("project '{}'", self.project_id)
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        let mut page_token: Option<String> = None;
        let mut names = Vec::new();
        loop {
            let mut url = Url::parse(&format!("{}/b", API_BASE))?;
            {
                let mut qp = url.query_pairs_mut();
                qp.append_pair("project", &self.project_id);
                qp.append_pair("fields", "items(name),nextPageToken");
                if let Some(ref t) = page_token {
                    qp.append_pair("pageToken", t);
                }
            }
            let res = self
                .authorized(self.http.get(url))?
                .send()
                .context("Failed to call GCS bucket list API")?;
            let body: BucketListResponse = Self::check(res, "bucket list")?
                .json()
                .context("Invalid GCS response")?;
            names.extend(body.items.into_iter().map(|b| b.name));

            page_token = body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }
        Ok(names)
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut page_token: Option<String> = None;
        let mut keys = Vec::new();
        // No delimiter: objects at every depth below the prefix are returned.
        loop {
            let mut url = Url::parse(&format!("{}/b/{}/o", API_BASE, bucket))?;
            {
                let mut qp = url.query_pairs_mut();
                if !prefix.is_empty() {
                    qp.append_pair("prefix", prefix);
                }
                qp.append_pair("fields", "items(name),nextPageToken");
                if let Some(ref t) = page_token {
                    qp.append_pair("pageToken", t);
                }
            }
            let res = self
                .authorized(self.http.get(url))?
                .send()
                .context("Failed to call GCS list API")?;
            let body: ListResponse = Self::check(res, "list")?
                .json()
                .context("Invalid GCS response")?;
            keys.extend(body.items.into_iter().map(|it| it.name));

            page_token = body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }
        Ok(keys)
    }

    fn put_bytes(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.upload(bucket, key, Body::from(data), content_type)
    }

    fn put_file(&self, bucket: &str, key: &str, path: &Path, content_type: &str) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        self.upload(bucket, key, Body::sized(file, len), content_type)
    }

    fn get_to_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let url = Url::parse(&format!(
            "{}/b/{}/o/{}?alt=media",
            API_BASE,
            bucket,
            encode_object_name(key)
        ))?;
        let res = self
            .authorized(self.http.get(url))?
            .send()
            .context("Failed to download GCS object")?;
        let mut res = Self::check(res, "download")?;

        // The destination is only touched once the server has answered.
        let file =
            File::create(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut out = BufWriter::new(file);
        let n = res
            .copy_to(&mut out)
            .context("Failed to read GCS body")?;
        out.flush()
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        Ok(n)
    }
}
