use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<ObjectItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ObjectItem {
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct BucketListResponse {
    #[serde(default)]
    pub items: Vec<BucketItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BucketItem {
    pub name: String,
}
