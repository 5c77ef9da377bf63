mod cli;
mod commands;
mod infra;
mod render;
mod routes;
mod server;

use grader_core::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
