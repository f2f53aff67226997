//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], [`reload`], [`stats`], or
//! [`health`]. The last three talk to a running instance's admin API
//! through the small client in [`client`].

pub mod client;
pub mod health;
pub mod reload;
pub mod run;
pub mod stats;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::SignpostError;

pub async fn dispatch(cli: Cli) -> Result<(), SignpostError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Reload(args)) => reload::execute(args).await,
        Some(Commands::Stats(args)) => stats::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  signpost v{version}: HTTP edge router with hot-reloadable redirects\n\n  \
         No command provided. To get started:\n\n    \
         signpost validate routes.yaml     Check a route file\n    \
         signpost run                      Start the router (auto-detects ./signpost.yaml)\n    \
         signpost run -c routes.yaml       Start with a specific route file\n    \
         signpost --help                   See all commands and options\n"
    );
}
