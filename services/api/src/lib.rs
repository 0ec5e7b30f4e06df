mod cli;
mod infra;
mod report;
mod routes;
mod server;

use prohibition_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
