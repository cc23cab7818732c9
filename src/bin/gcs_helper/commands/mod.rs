pub mod buckets;
pub mod download;
pub mod upload;
pub mod upload_sample;
