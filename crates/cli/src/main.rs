mod config_commands;
mod host;
mod upload_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "server-temp", about = "Temporary file hosting through chat platform asset APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching ./ and ~/.config/server-temp/.
    #[arg(long, global = true, env = "SERVER_TEMP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, URL, or stdin (`-`) and print the hosted URL.
    Upload {
        /// Local path, `file:` URL, `http(s):` URL, or `-` for stdin.
        input: String,
        /// Print `{"url": ...}` instead of the bare URL.
        #[arg(long)]
        json: bool,
    },
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Initialise tracing. Logs go to stderr so stdout stays the upload result.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "server-temp starting");

    let config_path = config_commands::resolve_config_path(cli.config.clone());
    let mut config = server_temp_config::load_or_default(config_path.as_deref())?;
    server_temp_config::apply_env_overrides(&mut config, host::KNOWN_PLUGINS);

    match cli.command {
        Commands::Upload { input, json } => {
            let services = host::build_services(&config).context("failed to start plugins")?;
            if let Some(provider) = services.temp_provider() {
                info!(provider, "temp service ready");
            }
            upload_commands::handle_upload(&services, &input, json).await
        },
        Commands::Config { action } => {
            config_commands::handle_config(action, config_path.as_deref(), &config)
        },
    }
}
