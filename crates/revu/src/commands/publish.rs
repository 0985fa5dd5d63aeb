//! The `publish` subcommand.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use revu_publish::{
    BackendRegistry, Publisher, parse_destination, resolve, resolve_with_signer,
};
use revu_report::{RenderOptions, ReportData, ReportMetadata};
use revu_storage::UrlSigner;
use revu_storage_gcs::GcsClientFactory;
use revu_storage_s3::S3ClientFactory;

use crate::config::Config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for `revu publish`.
#[derive(Args)]
pub struct PublishArgs {
    /// Destination URI (gs://bucket/path or s3://bucket/path).
    #[arg(long, env = "REVU_DESTINATION")]
    destination: String,

    /// Repository the review ran against.
    #[arg(long)]
    repo_url: String,

    /// Base branch of the diff.
    #[arg(long, default_value = "main")]
    base_branch: String,

    /// Branch under review.
    #[arg(long)]
    feature_branch: String,

    /// Markdown review body: path to a file, or `-` for stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Config file path (defaults to ./revu.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Include the review timestamp in the report (overrides config).
    #[arg(long, conflicts_with = "no_timestamp")]
    timestamp: bool,

    /// Omit the review timestamp from the report (overrides config).
    #[arg(long)]
    no_timestamp: bool,

    /// Print a pre-signed read URL for the published report.
    #[arg(long)]
    sign: bool,

    /// AWS region for s3:// destinations (overrides config).
    #[arg(long)]
    s3_region: Option<String>,

    /// Custom S3 endpoint, e.g. MinIO or LocalStack (overrides config).
    #[arg(long)]
    s3_endpoint: Option<String>,
}

impl PublishArgs {
    /// Execute the publish subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input reading, resolution,
    /// publishing, or signing fails.
    pub async fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load_or_default(self.config.as_deref())?;
        let options = RenderOptions {
            include_timestamp: self.include_timestamp(&config),
        };
        let registry = self.build_registry(&config);

        let review_markdown = read_input(&self.input)?;
        let data = ReportData::new(
            ReportMetadata::new(&self.repo_url, &self.base_branch, &self.feature_branch),
            review_markdown,
        );

        if self.sign {
            let (publisher, signer) =
                resolve_with_signer(&self.destination, &registry, options).await?;
            publisher.publish(&self.destination, &data).await?;
            output.success(&format!("Published to {}", self.destination));

            let dest = parse_destination(&self.destination)?;
            let url = signer
                .signed_get_url(
                    &dest.bucket,
                    &dest.object,
                    Duration::from_secs(config.sign.expiry_secs),
                )
                .await?;
            output.result(&url);
        } else {
            let publisher = resolve(&self.destination, &registry, options).await?;
            publisher.publish(&self.destination, &data).await?;
            output.success(&format!("Published to {}", self.destination));
        }

        Ok(())
    }

    /// Flags beat config; the two flags exclude each other via clap.
    fn include_timestamp(&self, config: &Config) -> bool {
        if self.timestamp {
            true
        } else if self.no_timestamp {
            false
        } else {
            config.render.include_timestamp
        }
    }

    fn build_registry(&self, config: &Config) -> BackendRegistry {
        let mut registry = BackendRegistry::new();

        if config.gcs.enabled {
            registry = registry.with_gcs(Arc::new(GcsClientFactory::new()));
        }
        if config.s3.enabled {
            let s3_config = revu_storage_s3::S3Config {
                region: self
                    .s3_region
                    .clone()
                    .unwrap_or_else(|| config.s3.region.clone()),
                endpoint: self.s3_endpoint.clone().or_else(|| config.s3.endpoint.clone()),
            };
            registry = registry.with_s3(Arc::new(S3ClientFactory::new(s3_config)));
        }

        registry
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}
