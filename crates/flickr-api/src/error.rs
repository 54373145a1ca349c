//! Error types for the Flickr client

use std::fmt;

/// Errors that can occur when talking to Flickr
#[derive(Debug)]
pub enum FlickrError {
    /// HTTP request failed before a response was received
    Http(Box<reqwest::Error>),
    /// REST API answered with `stat: fail`
    Api { code: i64, message: String },
    /// Image host answered with something other than 200
    ImageStatus {
        url: String,
        title: String,
        status: reqwest::StatusCode,
    },
    /// Image request failed at the transport level
    ImageTransport {
        url: String,
        title: String,
        source: Box<reqwest::Error>,
    },
    /// Response body was not the JSON we expected
    Json(serde_json::Error),
}

impl fmt::Display for FlickrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "Flickr HTTP error: {}", err),
            Self::Api { code, message } => {
                write!(f, "Flickr API error {}: {}", code, message)
            }
            Self::ImageStatus { url, title, status } => write!(
                f,
                "failed to fetch image from {} for {}. code={} forbidden={} server_error={}",
                url,
                title,
                status.as_u16(),
                *status == reqwest::StatusCode::FORBIDDEN,
                status.is_server_error()
            ),
            Self::ImageTransport { url, title, source } => write!(
                f,
                "failed to fetch image from {} for {}. {}",
                url, title, source
            ),
            Self::Json(err) => write!(f, "Flickr JSON parse error: {}", err),
        }
    }
}

impl std::error::Error for FlickrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err.as_ref()),
            Self::ImageTransport { source, .. } => Some(source.as_ref()),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FlickrError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for FlickrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Result type for Flickr client operations
pub type Result<T> = std::result::Result<T, FlickrError>;
