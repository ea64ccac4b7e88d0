use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A response as received from the Graph API, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// The `{"error": {...}}` envelope the Graph API reports failures in
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

/// Error details inside the envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    /// Usually "OAuthException", even for errors unrelated to OAuth
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    pub code: Option<i64>,
    /// Subcode as written in older payloads
    pub subcode: Option<i64>,
    /// Subcode as written by the live API
    pub error_subcode: Option<i64>,
}

impl ErrorDetail {
    /// Subcode from whichever key the payload used
    pub fn subcode(&self) -> Option<i64> {
        self.error_subcode.or(self.subcode)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response wrapper for Graph API connection endpoints
#[derive(Debug, Deserialize)]
pub struct GraphListResponse<T> {
    pub data: Vec<T>,
    pub paging: Option<GraphPaging>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphPaging {
    pub previous: Option<String>,
    pub next: Option<String>,
}

/// Response from publishing a new object
#[derive(Debug, Deserialize)]
pub struct PublishResponse {
    pub id: String,
}

/// A user profile from `/me` or `/{user-id}`
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub link: Option<String>,
    pub locale: Option<String>,
    pub gender: Option<String>,
}

/// Picture sizes accepted by `/{id}/picture?type=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Square,
    Small,
    Normal,
    Large,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Square => "square",
            ImageType::Small => "small",
            ImageType::Normal => "normal",
            ImageType::Large => "large",
        }
    }
}
