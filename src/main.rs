use paper_digest::config::LOG_DIR_VAR;
use paper_digest::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let log_dir = std::env::var_os(LOG_DIR_VAR).map(PathBuf::from);
    let _guard = logging::init_tracing(log_dir.as_deref());

    match paper_digest::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Digest run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
