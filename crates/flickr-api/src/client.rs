//! Flickr HTTP client

use crate::error::{FlickrError, Result};
use crate::image::{photo_url, resolve_size};
use crate::types::{FeedPage, FeedRecord, ImageSize, RestResponse, FEED_EXTRAS};
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the Flickr REST API and the static image host
#[derive(Clone)]
pub struct FlickrClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    image_base_url: String,
}

impl FlickrClient {
    /// Base URL for the REST API
    pub const API_BASE_URL: &'static str = "https://api.flickr.com";
    /// Base URL for static images
    pub const IMAGE_BASE_URL: &'static str = "https://live.staticflickr.com";

    /// Create a client against the public Flickr hosts (30 second timeout)
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_urls(api_key, Self::API_BASE_URL, Self::IMAGE_BASE_URL)
    }

    /// Create a client against custom REST and image hosts
    pub fn with_base_urls(api_key: &str, api_base_url: &str, image_base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of `flickr.interestingness.getList` for `date`
    ///
    /// Pages are 1-based. The returned page carries the total page count, so
    /// callers fetch page 1 first and fan out from there.
    pub async fn interestingness_page(
        &self,
        date: NaiveDate,
        per_page: u32,
        page: u32,
    ) -> Result<FeedPage> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!(
            "{}/services/rest/?method=flickr.interestingness.getList&api_key={}&date={}&extras={}&per_page={}&page={}&format=json&nojsoncallback=1",
            self.api_base_url,
            urlencoding::encode(&self.api_key),
            date_str,
            urlencoding::encode(&FEED_EXTRAS.join(",")),
            per_page,
            page
        );

        debug!(date = %date_str, page, per_page, "Fetching interestingness page");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let envelope: RestResponse = serde_json::from_str(&body)?;

        match envelope.photos {
            Some(photos) if envelope.stat == "ok" => {
                info!(
                    date = %date_str,
                    page,
                    count = photos.photo.len(),
                    pages = photos.pages,
                    "Fetched interestingness page"
                );
                Ok(photos)
            }
            _ => Err(FlickrError::Api {
                code: envelope.code.unwrap_or_default(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("unexpected stat '{}'", envelope.stat)),
            }),
        }
    }

    /// Download the image bytes for `record`
    ///
    /// `Original` silently falls back to `Biggest` when the record carries no
    /// original secret. Anything but a 200 is an error.
    pub async fn fetch_image(&self, record: &FeedRecord, size: ImageSize) -> Result<Vec<u8>> {
        let size = resolve_size(record, size);
        let url = photo_url(&self.image_base_url, record, size);

        debug!(url = %url, "Fetching image");

        let response = self.http.get(&url).send().await.map_err(|e| {
            FlickrError::ImageTransport {
                url: url.clone(),
                title: record.title.clone(),
                source: Box::new(e),
            }
        })?;

        if response.status() != StatusCode::OK {
            return Err(FlickrError::ImageStatus {
                url,
                title: record.title.clone(),
                status: response.status(),
            });
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string()
        };
        let width = header("imagewidth");
        let height = header("imageheight");
        let content_type = header("content-type");

        let data = response
            .bytes()
            .await
            .map_err(|e| FlickrError::ImageTransport {
                url: url.clone(),
                title: record.title.clone(),
                source: Box::new(e),
            })?
            .to_vec();

        info!(
            url = %url,
            size = %format!("{}x{}", width, height),
            content_type = %content_type,
            bytes = data.len(),
            "Fetched image"
        );

        Ok(data)
    }
}
