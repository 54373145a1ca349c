//! Minimal Flickr client for the Explore ("interestingness") feed
//!
//! Covers the two remote surfaces the featured-image cache depends on:
//!
//! - `flickr.interestingness.getList` on the REST API, one page at a time
//! - static image downloads from `live.staticflickr.com`
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use flickr_api::{FlickrClient, ImageSize};
//!
//! # async fn example() -> Result<(), flickr_api::FlickrError> {
//! let client = FlickrClient::new("api-key")?;
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//!
//! let page = client.interestingness_page(date, 100, 1).await?;
//! if let Some(record) = page.photo.first() {
//!     let bytes = client.fetch_image(record, ImageSize::Biggest).await?;
//!     println!("{} bytes for {}", bytes.len(), record.title);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod image;
mod types;

pub use client::FlickrClient;
pub use error::{FlickrError, Result};
pub use image::{photo_url, resolve_size, GENERATED_IMAGE_EXT};
pub use types::{FeedPage, FeedRecord, ImageSize, FEED_EXTRAS};
