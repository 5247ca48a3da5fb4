//! `occmap capabilities`: print a dataset's capabilities as JSON.

use clap::Args;
use occmap::service::ServiceError;
use tokio_util::sync::CancellationToken;

use super::dataset::DatasetArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct CapabilitiesArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

/// Run the capabilities command.
pub async fn run(runner: &CliRunner, args: CapabilitiesArgs) -> Result<(), CliError> {
    runner.log_startup("capabilities");

    let key = args.dataset.storage_key()?;
    let service = runner.create_service()?;
    let capabilities = service
        .capabilities(&key, &CancellationToken::new())
        .await?;

    let json = serde_json::to_string_pretty(&capabilities)
        .map_err(|e| CliError::Service(ServiceError::Internal(e.to_string())))?;
    println!("{}", json);
    Ok(())
}
