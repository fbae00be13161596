//! MCP Server Entry Point
//!
//! Parses the command line, initializes logging and either serves one adapter
//! over stdio or runs one of the setup commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use mcp_dev_workflow::core::{Adapter, Config, McpServer, StdioTransport};
use mcp_dev_workflow::setup::config_gen::project_root;
use mcp_dev_workflow::setup::{DEFAULT_CALLBACK_PORT, OAuthSetup, SERVERS_CONFIG_FILE, ServersConfig};

#[derive(Parser, Debug)]
#[command(name = "mcp-dev-workflow")]
#[command(version, about = "MCP adapter servers for Figma, GitHub and Google Docs.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve one adapter over stdin/stdout.
    Serve {
        /// Upstream service to expose
        #[arg(value_enum)]
        adapter: Adapter,
    },
    /// Generate the editor launcher configuration.
    GenerateConfig {
        /// Restrict to a preset from the servers config
        #[arg(long)]
        preset: Option<String>,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// List presets and servers, then exit
        #[arg(long)]
        list: bool,
        /// Servers config file
        #[arg(long, default_value = SERVERS_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Authorize the Google Workspace adapter and store an OAuth2 token.
    GoogleAuth {
        /// Local port for the OAuth redirect
        #[arg(long, default_value_t = DEFAULT_CALLBACK_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_logging(&config.logging.level);

    match cli.command {
        Command::Serve { adapter } => serve(config, adapter).await,
        Command::GenerateConfig {
            preset,
            output,
            list,
            config: path,
        } => generate_config(&path, preset.as_deref(), output, list),
        Command::GoogleAuth { port } => google_auth(&config, port).await,
    }
}

async fn serve(config: Config, adapter: Adapter) -> Result<()> {
    info!("Starting {} adapter v{}", adapter, config.server.version);
    config.log_summary();

    let registry = adapter
        .build_registry(&config)
        .await
        .with_context(|| format!("failed to initialize the {adapter} adapter"))?;
    let server = McpServer::new(config, adapter, registry);

    StdioTransport::run(server).await?;

    info!("Server shutting down");
    Ok(())
}

fn generate_config(
    path: &Path,
    preset: Option<&str>,
    output: Option<PathBuf>,
    list: bool,
) -> Result<()> {
    let servers = ServersConfig::load(path)?;
    if list {
        print!("{}", servers.listing());
        return Ok(());
    }

    let launcher = servers.generate(preset, &project_root(path)?, |key| std::env::var(key).ok())?;
    let json = launcher.to_json()?;

    match output {
        Some(output) => {
            std::fs::write(&output, json)
                .with_context(|| format!("cannot write {}", output.display()))?;
            let names: Vec<&str> = launcher.mcp_servers.keys().map(String::as_str).collect();
            info!("Configuration written to {} ({})", output.display(), names.join(", "));
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn google_auth(config: &Config, port: u16) -> Result<()> {
    let setup = OAuthSetup::new(&config.google, &config.upstream, port)?;
    if let Some(path) = setup.existing_token() {
        println!(
            "Token file already exists at {}. Delete it to re-authenticate.",
            path.display()
        );
        return Ok(());
    }

    let listener = setup.listen(setup.callback_addr()).await?;
    println!("Open this URL to authorize read-only access:\n\n{}\n", setup.consent_url()?);
    println!("Waiting for the redirect to {} ...", setup.redirect_uri());

    let path = listener.finish(&setup).await?;
    println!("Token saved to {}", path.display());
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the MCP protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
