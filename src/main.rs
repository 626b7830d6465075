use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use jump::config::{self, Config};
use jump::{cache, inventory, selector};

#[derive(Parser)]
#[command(
    name = "jump",
    author,
    version,
    about = "Browse running EC2 instances and open nested SSH sessions through a jump host",
    long_about = r#"jump — cached EC2 inventory browser and jump-host SSH connector.

Running without a subcommand starts an interactive prompt with fuzzy
completion over commands (exit, quit, refresh, list) and instance labels.
Selecting an instance opens a nested SSH session: local machine to the jump
host with a local key, then jump host to the target with a key resident on
the jump host.

Configuration comes from environment variables (or an --env-file):
  JUMP_REGION, JUMP_CACHE_FILE, JUMP_HISTORY_FILE,
  JUMP_HOST, JUMP_USER, JUMP_LOCAL_KEY, JUMP_REMOTE_KEY_DIR
"#,
    after_help = "Use `jump <subcommand> --help` for subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// AWS region to query (overrides JUMP_REGION)
    #[arg(long, global = true)]
    region: Option<String>,
    /// Inventory cache file (overrides JUMP_CACHE_FILE)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the instance table (from cache, fetching if needed) and exit
    List,
    /// Force a live refetch of the inventory, then print the table
    Refresh,
    /// Validate configuration (jump host, key paths) and show settings
    #[command(
        about = "Validate configuration and show effective settings.",
        long_about = "Check that the jump host is configured and the local key exists, then print the effective settings. Exits non-zero when a connection attempt would be refused."
    )]
    CheckConfig,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    config::load_env_file(cli.env_file.as_deref());
    let mut config = Config::from_env();
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(cache_file) = cli.cache_file {
        config.cache_file = cache_file;
    }

    match cli.command {
        None => {
            let client = inventory::client_for_region(&config.region).await;
            let records = cache::load_or_refresh(&config.cache_file, false, || {
                inventory::fetch(&client, &config.region)
            })
            .await;
            if let Err(e) = selector::run_loop(&config, &client, records).await {
                tracing::error!(%e, "interactive session failed");
                eprintln!("{}: {}", Paint::new("Error").red(), e);
                process::exit(1);
            }
        }
        Some(Commands::List) => {
            let client = inventory::client_for_region(&config.region).await;
            let records = cache::load_or_refresh(&config.cache_file, false, || {
                inventory::fetch(&client, &config.region)
            })
            .await;
            selector::display_instances(&records);
        }
        Some(Commands::Refresh) => {
            let client = inventory::client_for_region(&config.region).await;
            let records = cache::load_or_refresh(&config.cache_file, true, || {
                inventory::fetch(&client, &config.region)
            })
            .await;
            selector::display_instances(&records);
        }
        Some(Commands::CheckConfig) => {
            if !check_config(&config) {
                process::exit(1);
            }
        }
    }
}

/// Report whether a connection attempt could proceed with these settings,
/// and print the effective configuration.
fn check_config(config: &Config) -> bool {
    let mut ok = true;

    if config.jump_host.trim().is_empty() {
        eprintln!("{}", Paint::new("JUMP_HOST is not configured").red());
        ok = false;
    }
    let local_key = shellexpand::tilde(&config.local_key).into_owned();
    if !Path::new(&local_key).exists() {
        eprintln!(
            "{} {}",
            Paint::new("Local jump key file not found:").red(),
            local_key
        );
        ok = false;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table.set_header(vec!["Setting", "Value"]);
    let rows = [
        ("Region", config.region.clone()),
        ("Cache file", config.cache_file.display().to_string()),
        ("History file", config.history_file.display().to_string()),
        ("Jump host", config.jump_host.clone()),
        ("Jump user", config.jump_user.clone()),
        ("Local key", local_key.clone()),
        ("Remote key dir", config.remote_key_dir.clone()),
    ];
    for (setting, value) in rows {
        table.add_row(vec![setting.to_string(), value]);
    }
    println!("\n{table}\n");

    if ok {
        println!("{}", Paint::new("Configuration looks valid").green());
    }
    ok
}
