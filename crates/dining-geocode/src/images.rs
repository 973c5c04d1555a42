/// Downloads restaurant photos and points `image_url` at the local copy.
///
/// Images are stored as `<images_dir>/<id>.jpg`. A file that already exists
/// is never fetched again, so a rerun only downloads photos for new
/// restaurants. A failed download keeps the remote URL. Only `image_url` is
/// ever rewritten.
use std::path::Path;

use dining_core::model::CanonicalRecord;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::Pacer;

/// Fetches the raw bytes behind an image URL.
pub trait ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

pub struct HttpImageFetcher {
    http: reqwest::Client,
    pacer: Pacer,
}

impl HttpImageFetcher {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            pacer: Pacer::new(config.image_min_interval),
        })
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.pacer.wait().await;
        debug!(url, "downloading image");

        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        if bytes.is_empty() {
            return Err(AppError::ImageDownload {
                url: url.to_string(),
                message: "empty response body".to_string(),
            });
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageReport {
    pub downloaded: usize,
    /// Records whose image file was already on disk
    pub already_present: usize,
    pub failed: usize,
    /// Records with neither a remote image nor a local file
    pub no_image: usize,
    /// Records whose `image_url` now points at a local file
    pub localized: usize,
}

pub async fn localize_images(
    records: &mut [CanonicalRecord],
    images_dir: &Path,
    url_prefix: &str,
    fetcher: &impl ImageFetcher,
) -> Result<ImageReport, AppError> {
    std::fs::create_dir_all(images_dir).map_err(|e| AppError::ImageWrite {
        path: images_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut report = ImageReport::default();
    let pending = records
        .iter()
        .filter(|r| remote_url(r).is_some() && !image_path(images_dir, r).exists())
        .count();
    info!(pending, total = records.len(), dir = %images_dir.display(), "downloading images");

    for record in records.iter_mut() {
        let path = image_path(images_dir, record);
        if path.exists() {
            report.already_present += 1;
        } else if let Some(url) = remote_url(record) {
            let stored = fetcher
                .fetch(url)
                .await
                .and_then(|bytes| store(&path, &bytes));
            match stored {
                Ok(()) => {
                    debug!(id = %record.id, url, "image stored");
                    report.downloaded += 1;
                }
                Err(e) => {
                    warn!(id = %record.id, name = %record.name, error = %e, "image download failed");
                    report.failed += 1;
                }
            }
        } else {
            report.no_image += 1;
        }

        if path.exists() {
            record.image_url = Some(format!("{url_prefix}/{}.jpg", record.id));
            report.localized += 1;
        }
    }

    info!(
        downloaded = report.downloaded,
        failed = report.failed,
        localized = report.localized,
        "image pass complete"
    );
    Ok(report)
}

fn image_path(images_dir: &Path, record: &CanonicalRecord) -> std::path::PathBuf {
    images_dir.join(format!("{}.jpg", record.id))
}

fn remote_url(record: &CanonicalRecord) -> Option<&str> {
    record
        .image_url
        .as_deref()
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
}

/// `<id>.jpg` only ever appears complete; bytes land in `<id>.jpg.part` first.
fn store(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let write_err = |e: std::io::Error| AppError::ImageWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let partial = path.with_extension("jpg.part");
    std::fs::write(&partial, bytes).map_err(write_err)?;
    std::fs::rename(&partial, path).map_err(write_err)
}
