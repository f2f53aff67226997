//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, reload, stats, health), and their
//! associated argument structs. Every `run` flag has an environment
//! variable equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "signpost",
    version,
    about = "HTTP edge router with hot-reloadable redirect routes",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        signpost run                         Start with ./signpost.yaml\n  \
        signpost run -c routes.yaml          Start with a specific route file\n  \
        signpost reload                      Reload routes on a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the router
    Run(Box<RunArgs>),

    /// Validate a route file without starting
    Validate(ValidateArgs),

    /// Ask a running instance to reload its routes
    Reload(AdminArgs),

    /// Show the route count and checksum of a running instance
    Stats(StatsArgs),

    /// Check that a running instance is up
    Health(AdminArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        signpost run                                     Auto-detect route file\n  \
        signpost run -c routes.yaml                      Specific route file\n  \
        signpost run -c routes.yaml -p 8080 --pretty     Local dev mode\n  \
        signpost run --redis-url redis://cache:6379      Redis route store")]
pub struct RunArgs {
    /// Route file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Routing listener port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Admin API listener port
    #[arg(long, env = "ADMIN_PORT", default_value_t = 8081)]
    pub admin_port: u16,

    /// Listen address for both listeners
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Route namespace (for database stores)
    #[arg(short, long, env = "SIGNPOST_NAMESPACE", default_value = "default")]
    pub namespace: String,

    // -- Database Stores --
    /// Redis connection URL
    #[cfg(feature = "redis")]
    #[arg(long, env = "REDIS_URL", help_heading = "Database Stores")]
    pub redis_url: Option<String>,

    /// `PostgreSQL` connection URL
    #[cfg(feature = "postgres")]
    #[arg(long, env = "POSTGRES_URL", help_heading = "Database Stores")]
    pub postgres_url: Option<String>,

    /// `SQLite` database path
    #[cfg(feature = "sqlite")]
    #[arg(long, env = "SQLITE_PATH", help_heading = "Database Stores")]
    pub sqlite_path: Option<PathBuf>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Maximum time a reload may spend fetching routes, in milliseconds
    #[arg(
        long,
        env = "RELOAD_TIMEOUT_MS",
        default_value_t = 10_000,
        help_heading = "Tuning"
    )]
    pub reload_timeout: u64,

    /// Poll the route store for changes every N seconds (0 disables polling)
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 0,
        help_heading = "Tuning"
    )]
    pub poll_interval: u64,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Route file to validate
    #[arg(default_value = "signpost.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct AdminArgs {
    /// Admin URL of the running instance
    #[arg(default_value = "http://localhost:8081")]
    pub url: String,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Admin URL of the running instance
    #[arg(default_value = "http://localhost:8081")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
