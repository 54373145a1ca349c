//! Data types for Flickr API responses
//!
//! `FeedRecord` keeps every field Flickr returns: the ones the cache needs are
//! typed, the rest ride along in `extra` so a record can be written back out
//! verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extra attributes requested for every Explore record
pub const FEED_EXTRAS: &[&str] = &[
    "description",
    "license",
    "date_taken",
    "owner_name",
    "original_format",
    "url_o",
];

/// One photo from the Explore feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub server: String,
    pub secret: String,
    #[serde(rename = "ownername", default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(rename = "datetaken", default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    /// Only present when the uploader allows access to the original file
    #[serde(
        rename = "originalsecret",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_secret: Option<String>,
    #[serde(
        rename = "originalformat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_format: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single page of `flickr.interestingness.getList`
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub photo: Vec<FeedRecord>,
}

/// REST envelope; `photos` is set when `stat` is `ok`
#[derive(Debug, Deserialize)]
pub(crate) struct RestResponse {
    pub(crate) stat: String,
    pub(crate) photos: Option<FeedPage>,
    pub(crate) code: Option<i64>,
    pub(crate) message: Option<String>,
}

/// Size variants served by the static image host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 500px on the longest side, no size suffix
    Medium,
    /// 1024px on the longest side
    #[default]
    Biggest,
    /// The uploaded file, in its own format
    Original,
}

impl ImageSize {
    /// Suffix used in static image URLs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Medium => "",
            Self::Biggest => "b",
            Self::Original => "o",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Medium => "medium",
            Self::Biggest => "biggest",
            Self::Original => "original",
        };
        f.write_str(name)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    /// Accepts either the URL size code or the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "medium" => Ok(Self::Medium),
            "b" | "biggest" => Ok(Self::Biggest),
            "o" | "original" => Ok(Self::Original),
            other => Err(format!(
                "unknown image size '{}'; expected one of '', 'b', 'o'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "53712345678",
            "owner": "12345678@N00",
            "secret": "abc123",
            "server": "65535",
            "farm": 66,
            "title": "Morning fog",
            "ispublic": 1,
            "license": "4",
            "datetaken": "2024-05-01 06:12:44",
            "datetakengranularity": 0,
            "ownername": "Jane Doe",
            "originalsecret": "def456",
            "originalformat": "png",
            "description": { "_content": "Over the valley" }
        }"#
    }

    #[test]
    fn test_feed_record_deserialization() {
        let record: FeedRecord = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(record.id, "53712345678");
        assert_eq!(record.title, "Morning fog");
        assert_eq!(record.server, "65535");
        assert_eq!(record.owner_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.license.as_deref(), Some("4"));
        assert_eq!(record.original_secret.as_deref(), Some("def456"));
        assert_eq!(record.original_format.as_deref(), Some("png"));
        assert_eq!(record.extra["farm"], 66);
        assert_eq!(record.extra["description"]["_content"], "Over the valley");
    }

    #[test]
    fn test_feed_record_preserves_unknown_fields() {
        let record: FeedRecord = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["owner"], "12345678@N00");
        assert_eq!(value["ispublic"], 1);
        assert_eq!(value["datetakengranularity"], 0);
        assert_eq!(value["originalsecret"], "def456");
        assert!(value.get("original_secret").is_none());
    }

    #[test]
    fn test_feed_record_without_original_access() {
        let json = r#"{"id": "1", "secret": "s", "server": "7", "title": "No original"}"#;
        let record: FeedRecord = serde_json::from_str(json).unwrap();
        assert!(record.original_secret.is_none());
        assert!(record.original_format.is_none());

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("originalsecret").is_none());
        assert!(value.get("ownername").is_none());
    }

    #[test]
    fn test_rest_response_ok() {
        let json = r#"{
            "photos": {"page": 1, "pages": 3, "perpage": 2, "total": 5, "photo": [
                {"id": "1", "secret": "a", "server": "1", "title": "one"},
                {"id": "2", "secret": "b", "server": "1", "title": "two"}
            ]},
            "stat": "ok"
        }"#;
        let response: RestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.stat, "ok");
        let photos = response.photos.unwrap();
        assert_eq!(photos.pages, 3);
        assert_eq!(photos.photo.len(), 2);
        assert_eq!(photos.photo[1].title, "two");
    }

    #[test]
    fn test_rest_response_fail() {
        let json = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key (Key has invalid format)"}"#;
        let response: RestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.stat, "fail");
        assert!(response.photos.is_none());
        assert_eq!(response.code, Some(100));
    }

    #[test]
    fn test_image_size_codes() {
        assert_eq!(ImageSize::Medium.code(), "");
        assert_eq!(ImageSize::Biggest.code(), "b");
        assert_eq!(ImageSize::Original.code(), "o");
        assert_eq!(ImageSize::default(), ImageSize::Biggest);
    }

    #[test]
    fn test_image_size_from_str() {
        assert_eq!("".parse::<ImageSize>().unwrap(), ImageSize::Medium);
        assert_eq!("b".parse::<ImageSize>().unwrap(), ImageSize::Biggest);
        assert_eq!("O".parse::<ImageSize>().unwrap(), ImageSize::Original);
        assert_eq!("original".parse::<ImageSize>().unwrap(), ImageSize::Original);
        assert!("z".parse::<ImageSize>().unwrap_err().contains("unknown image size"));
    }
}
