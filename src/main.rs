use anyhow::Context;
use cdf_file_uploader::UploaderError;
use cdf_file_uploader::cli::{self, FAILURE_EXIT_CODE, Invocation, Opts, write_placeholder};
use cdf_file_uploader::config::CdfConfig;
use cdf_file_uploader::infrastructure::storage;
use cdf_file_uploader::services::upload_service::{PipelineOutcome, UploadPipeline};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cdf_file_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = match cli::parse_from(std::env::args_os()) {
        Ok(Invocation::Run(opts)) => *opts,
        Ok(Invocation::Info(e)) => e.exit(),
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };
    info!("🚀 Starting CDF file upload...");

    match run(opts).await {
        Ok(outcome) => {
            info!(
                space = %outcome.space,
                file_id = outcome.file.id,
                nodes = outcome.nodes.len(),
                "🎉 Upload finished"
            );
        }
        Err(e) => {
            let category = e
                .downcast_ref::<UploaderError>()
                .map(UploaderError::category)
                .unwrap_or("Unexpected");
            error!("❌ {} error: {:#}", category, e);
            std::process::exit(FAILURE_EXIT_CODE);
        }
    }
}

async fn run(opts: Opts) -> anyhow::Result<PipelineOutcome> {
    let config = CdfConfig::from_env()?;
    let (target, fallback) = opts.spaces()?;
    let request = opts.upload_request()?;
    let options = opts.record_options()?;

    if opts.create_placeholder {
        write_placeholder(&request.local_path).await?;
    }

    // Fail on local problems before authenticating.
    let upload = UploadPipeline::prepare(&request)
        .await
        .with_context(|| format!("Preparing {}", request.local_path.display()))?;

    let client = storage::setup_storage(&config)
        .await
        .context("Connecting to CDF")?;
    let pipeline = UploadPipeline::new(client.clone(), client.clone(), client)
        .with_policy(opts.policy());

    let outcome = pipeline.run_prepared(&target, &fallback, upload, &options).await?;
    Ok(outcome)
}
