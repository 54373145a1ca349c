//! Static image URL construction

use crate::types::{FeedRecord, ImageSize};
use tracing::warn;

/// Extension of every size Flickr generates itself
pub const GENERATED_IMAGE_EXT: &str = "jpg";

/// Downgrade `Original` to `Biggest` when the record has no original secret
pub fn resolve_size(record: &FeedRecord, requested: ImageSize) -> ImageSize {
    if requested == ImageSize::Original && record.original_secret.is_none() {
        warn!(
            id = %record.id,
            title = %record.title,
            "access to original image denied; revert to biggest preview"
        );
        return ImageSize::Biggest;
    }
    requested
}

/// Build the download URL for an already-resolved size
///
/// The original size uses its own secret and format; every other size is a
/// generated JPEG addressed by the public secret.
pub fn photo_url(base_url: &str, record: &FeedRecord, size: ImageSize) -> String {
    let (secret, ext) = match (size, &record.original_secret) {
        (ImageSize::Original, Some(original_secret)) => (
            original_secret.as_str(),
            record
                .original_format
                .as_deref()
                .unwrap_or(GENERATED_IMAGE_EXT),
        ),
        _ => (record.secret.as_str(), GENERATED_IMAGE_EXT),
    };

    let base = base_url.trim_end_matches('/');
    match size.code() {
        "" => format!("{}/{}/{}_{}.{}", base, record.server, record.id, secret, ext),
        code => format!(
            "{}/{}/{}_{}_{}.{}",
            base, record.server, record.id, secret, code, ext
        ),
    }
}
