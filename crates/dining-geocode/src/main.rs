mod cache;
mod client;
mod config;
mod enrich;
mod error;
mod images;
mod rate_limit;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::GeocodeCache;
use client::NominatimClient;
use config::Config;
use images::HttpImageFetcher;
use dining_core::writer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting restaurant enrichment");

    let config = Config::from_env()?;
    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        cache = %config.cache_path.display(),
        images = %config.images_dir.display(),
        skip = config.skip,
        skip_images = config.skip_images,
        "configuration loaded"
    );

    let mut records = writer::read_canonical_file(&config.input_path)?;
    info!(restaurants = records.len(), "loaded normalized restaurants");

    if config.skip {
        info!("geocoding disabled, copying records through");
    } else {
        let mut cache = GeocodeCache::load(&config.cache_path);
        let client = NominatimClient::new(&config)?;
        let report = enrich::geocode_records(&mut records, &mut cache, &client).await;
        info!(
            cache_hits = report.cache_hits,
            looked_up = report.looked_up,
            failed = report.failed,
            no_address = report.no_address,
            already_located = report.already_located,
            cached_addresses = cache.len(),
            "geocoding pass finished"
        );
    }

    if config.skip_images {
        info!("image download disabled, keeping remote image urls");
    } else {
        let fetcher = HttpImageFetcher::new(&config)?;
        let report = images::localize_images(
            &mut records,
            &config.images_dir,
            &config.image_url_prefix,
            &fetcher,
        )
        .await?;
        info!(
            downloaded = report.downloaded,
            already_present = report.already_present,
            failed = report.failed,
            no_image = report.no_image,
            "image pass finished"
        );
    }

    writer::write_canonical_file(&config.output_path, &records)?;

    let located = records.iter().filter(|r| r.has_coordinates()).count();
    let with_images = records.iter().filter(|r| r.image_url.is_some()).count();
    info!(
        total = records.len(),
        located,
        with_images,
        output = %config.output_path.display(),
        "pipeline output written"
    );
    Ok(())
}
