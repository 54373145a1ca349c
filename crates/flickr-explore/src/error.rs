//! Error types for the featured-image refresh

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExploreError {
    /// One or more feed pages could not be fetched
    FeedLoad {
        date: NaiveDate,
        failures: Vec<(u32, flickr_api::FlickrError)>,
    },
    /// The day's snapshot exists but could not be read, or could not be written
    Snapshot {
        path: PathBuf,
        source: Box<std::io::Error>,
    },
    Flickr(flickr_api::FlickrError),
    Store(explore_store::StoreError),
    Json(serde_json::Error),
    Config(String),
}

impl fmt::Display for ExploreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExploreError::FeedLoad { date, failures } => {
                write!(f, "failed to load feed for {}:", date)?;
                for (page, err) in failures {
                    write!(f, " [page {}: {}]", page, err)?;
                }
                Ok(())
            }
            ExploreError::Snapshot { path, source } => {
                write!(f, "Snapshot error at {}: {}", path.display(), source)
            }
            ExploreError::Flickr(err) => write!(f, "Flickr error: {}", err),
            ExploreError::Store(err) => write!(f, "Store error: {}", err),
            ExploreError::Json(err) => write!(f, "JSON error: {}", err),
            ExploreError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ExploreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExploreError::Snapshot { source, .. } => Some(source.as_ref()),
            ExploreError::Flickr(err) => Some(err),
            ExploreError::Store(err) => Some(err),
            ExploreError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<flickr_api::FlickrError> for ExploreError {
    fn from(err: flickr_api::FlickrError) -> Self {
        ExploreError::Flickr(err)
    }
}

impl From<explore_store::StoreError> for ExploreError {
    fn from(err: explore_store::StoreError) -> Self {
        ExploreError::Store(err)
    }
}

impl From<serde_json::Error> for ExploreError {
    fn from(err: serde_json::Error) -> Self {
        ExploreError::Json(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for ExploreError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ExploreError::Config(err.to_string())
    }
}

impl From<dotenvy::Error> for ExploreError {
    fn from(err: dotenvy::Error) -> Self {
        ExploreError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExploreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_load_lists_every_failed_page() {
        let err = ExploreError::FeedLoad {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            failures: vec![
                (
                    2,
                    flickr_api::FlickrError::Api {
                        code: 105,
                        message: "Service currently unavailable".to_string(),
                    },
                ),
                (
                    4,
                    flickr_api::FlickrError::Api {
                        code: 0,
                        message: "boom".to_string(),
                    },
                ),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to load feed for 2024-05-01:"));
        assert!(msg.contains("[page 2: Flickr API error 105: Service currently unavailable]"));
        assert!(msg.contains("[page 4: Flickr API error 0: boom]"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ExploreError::Config("missing FLICKR_API_KEY".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing FLICKR_API_KEY"
        );
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = ExploreError::Snapshot {
            path: PathBuf::from("data/2024-05-01/features_res_photos.json"),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )),
        };
        assert_eq!(
            err.to_string(),
            "Snapshot error at data/2024-05-01/features_res_photos.json: denied"
        );
    }
}
