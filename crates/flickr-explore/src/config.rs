//! Command line and environment configuration

use crate::pipeline::RefreshConfig;
use chrono::NaiveDate;
use clap::Parser;
use flickr_api::ImageSize;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "flickr-explore")]
#[command(about = "Keeps a bounded folder of Flickr Explore featured images fresh")]
pub struct Config {
    /// Flickr API key
    #[arg(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Parent of the per-day feed snapshots
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Folder holding the cached images
    #[arg(long, env = "OUT_DIR", default_value = "data/out")]
    pub out_dir: PathBuf,

    /// Most new images added per run
    #[arg(long, env = "NEW_IMAGE_COUNT", default_value_t = 5)]
    pub new_image_count: usize,

    /// Most old images kept per run
    #[arg(long, env = "OLD_IMAGE_COUNT", default_value_t = 5)]
    pub old_image_count: usize,

    /// Image size: a URL size code ("", b, o) or medium, biggest, original
    #[arg(long, env = "IMAGE_SIZE_CODE", default_value = "b")]
    pub image_size: ImageSize,

    /// Feed page size (Flickr allows at most 500)
    #[arg(
        long,
        env = "PER_PAGE",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..=500)
    )]
    pub per_page: u32,

    /// Explore day to load, YYYY-MM-DD (defaults to yesterday in UTC)
    #[arg(long, env = "EXPLORE_DATE")]
    pub date: Option<NaiveDate>,
}

impl Config {
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            data_dir: self.data_dir.clone(),
            out_dir: self.out_dir.clone(),
            new_image_limit: self.new_image_count,
            old_image_limit: self.old_image_count,
            image_size: self.image_size,
            per_page: self.per_page,
        }
    }
}
