use dining_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoder returned an unusable result for {address}: {message}")]
    InvalidResponse { address: String, message: String },

    #[error("failed to persist geocode cache at {path}: {message}")]
    Cache { path: String, message: String },

    #[error("image download from {url} unusable: {message}")]
    ImageDownload { url: String, message: String },

    #[error("failed to store image at {path}: {message}")]
    ImageWrite { path: String, message: String },
}
