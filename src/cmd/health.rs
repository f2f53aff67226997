//! `signpost health`: check that a running instance answers its admin
//! healthcheck.

use hyper::{Method, StatusCode};

use super::client;
use crate::cli::AdminArgs;
use crate::error::SignpostError;

pub async fn execute(args: AdminArgs) -> Result<(), SignpostError> {
    client::send(Method::GET, &args.url, "/healthcheck")
        .await?
        .expect_status(StatusCode::OK)?;

    println!("\u{2713} signpost is healthy ({})", args.url);
    Ok(())
}
