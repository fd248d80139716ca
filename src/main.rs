/*
 * Responsibility
 * - tokio runtime
 * - app::run() and exit code (no logic here)
 */
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match user_service::app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "user-service stopped with an error");
            eprintln!("user-service: {err:#}");
            ExitCode::FAILURE
        }
    }
}
