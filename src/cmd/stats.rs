//! `signpost stats`: show route and reload statistics of a running
//! instance.
//!
//! Sends `GET /stats` to the admin API and displays the response as
//! formatted text or raw JSON.

use hyper::{Method, StatusCode};

use super::client;
use crate::admin::StatsResponse;
use crate::cli::StatsArgs;
use crate::error::SignpostError;

pub async fn execute(args: StatsArgs) -> Result<(), SignpostError> {
    let response = client::send(Method::GET, &args.url, "/stats")
        .await?
        .expect_status(StatusCode::OK)?;

    if args.json {
        println!("{}", response.text());
        return Ok(());
    }

    match serde_json::from_slice::<StatsResponse>(&response.body) {
        Ok(stats) => {
            println!("signpost stats ({})", args.url);
            println!("  uptime:    {}", format_uptime(stats.reloads.uptime_seconds));
            println!(
                "  routes:    {} (checksum {})",
                stats.routes.count, stats.routes.checksum
            );
            println!(
                "  source:    {} (loaded {}s ago)",
                stats.reloads.source, stats.reloads.loaded_ago_seconds
            );
            println!(
                "  reloads:   {} ok, {} failed, state {}",
                stats.reloads.succeeded, stats.reloads.failed, stats.reloads.state
            );
            println!(
                "  requests:  {} redirected, {} dispatched, {} not found",
                stats.requests.redirects, stats.requests.dispatched, stats.requests.not_found
            );
        }
        Err(e) => {
            eprintln!("Failed to parse stats response: {e}");
            println!("{}", response.text());
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
