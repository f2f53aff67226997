//! `signpost reload`: ask a running instance to reload its routes.

use hyper::{Method, StatusCode};

use super::client;
use crate::cli::AdminArgs;
use crate::error::SignpostError;

pub async fn execute(args: AdminArgs) -> Result<(), SignpostError> {
    let response = client::send(Method::POST, &args.url, "/reload").await?;

    if response.status != StatusCode::RESET_CONTENT {
        let body = response.text();
        if !body.trim().is_empty() {
            eprintln!("{}", body.trim_end());
        }
    }
    response.expect_status(StatusCode::RESET_CONTENT)?;

    println!("\u{2713} routes reloaded ({})", args.url);
    Ok(())
}
