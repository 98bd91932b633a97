use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use materials_master::config::{
    default_config_path, find_config_file, get_config, load_config, resolve_credential, Config,
    API_KEY_ENV,
};
use materials_master::lifecycle::{RequestState, SearchSession};
use materials_master::models::{Credential, QueryMode};
use materials_master::providers::{MaterialsProjectProvider, SearchProvider};
use materials_master::ui::{self, OutputFormat as UiFormat, Spinner, Status};
use materials_master::utils::HttpClient;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Materials Master - Search the Materials Project database
#[derive(Parser, Debug)]
#[command(name = "materials-master")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the Materials Project by formula, material ID, or chemical system", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Materials Project API key
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format (tab-separated)
    Plain,
}

/// Field the query is matched against
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Chemical formula (e.g. GaAs)
    #[value(name = "formula")]
    Formula,
    /// Material ID (e.g. mp-149)
    #[value(name = "material-id")]
    MaterialId,
    /// Chemical system (e.g. Li-O)
    #[value(name = "chemsys")]
    Chemsys,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for materials
    #[command(alias = "s")]
    Search {
        /// Formula, material ID, or chemical system
        query: String,

        /// How the query is interpreted
        #[arg(long, short, value_enum, default_value_t = Mode::Formula)]
        mode: Mode,
    },

    /// Interactive search session
    #[command(alias = "sh")]
    Shell {
        /// Initial search mode
        #[arg(long, short, value_enum, default_value_t = Mode::Formula)]
        mode: Mode,
    },

    /// List search modes with input examples
    Modes,

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Materials Master - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  {:<42} Materials Project API key", API_KEY_ENV);
    println!();
    println!("Provider Settings:");
    println!("  MATERIALS_MASTER_PROVIDER__BASE_URL        API root (default: https://api.materialsproject.org)");
    println!("  MATERIALS_MASTER_PROVIDER__TIMEOUT_SECS    Request timeout in seconds (default: 30)");
    println!("  MATERIALS_MASTER_PROVIDER__MAX_RESULTS     Maximum materials per search (default: 100)");
    println!();
    println!("Other Settings:");
    println!("  MATERIALS_MASTER_LOGGING__LEVEL            Default log level (default: info)");
    println!("  RUST_LOG                                   Rust logging filter (overrides everything)");
    println!();
    println!("Example:");
    println!("  export {}=\"your-key-here\"", API_KEY_ENV);
    println!("  materials-master search GaAs");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => get_config()?,
    };

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("materials_master={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    match cli.command {
        Some(Commands::Search { ref query, mode }) => {
            let provider = build_provider(&config, cli.timeout)?;
            let credential = resolve_credential(cli.api_key.clone(), &config);

            let mut session = SearchSession::new();
            session.set_mode(mode.into());
            session.set_input(query.as_str());

            let format = UiFormat::from(cli.output).resolve();
            let interactive = !cli.quiet && format == UiFormat::Table && ui::is_terminal();
            if interactive {
                eprintln!("API key: {}", ui::credential_badge(&credential));
            }

            let spinner = if interactive {
                Spinner::new("Searching materials...")
            } else {
                Spinner::hidden()
            };
            let state = session.search(&provider, &credential).await;
            spinner.finish();

            if let Some(error) = state.validation_error {
                anyhow::bail!(error);
            }
            match &state.request {
                RequestState::Success { results } => ui::print_results(results, format)?,
                RequestState::Failed { message } => anyhow::bail!("{}", message),
                RequestState::Idle | RequestState::Pending { .. } => {}
            }
        }

        Some(Commands::Shell { mode }) => {
            let provider = build_provider(&config, cli.timeout)?;
            let credential = resolve_credential(cli.api_key.clone(), &config);
            run_shell(&provider, credential, mode.into(), cli.output.into()).await?;
        }

        Some(Commands::Modes) => ui::print_modes(),

        Some(Commands::InitConfig { path, force }) => {
            let path = path
                .or_else(default_config_path)
                .ok_or_else(|| anyhow::anyhow!("Could not determine a config directory"))?;
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            if !cli.quiet {
                ui::print_status(
                    Status::Success,
                    &format!("Wrote default configuration to {}", path.display()),
                );
            }
        }

        None => {
            // No command provided - show help
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  search <query>              - Search by formula");
            println!("  search <id> -m material-id  - Look up a material ID");
            println!("  shell                       - Interactive search session");
            println!("  modes                       - List search modes");
        }
    }

    Ok(())
}

fn build_provider(config: &Config, timeout: Option<u64>) -> Result<MaterialsProjectProvider> {
    let timeout = timeout
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.provider.timeout());
    let client = HttpClient::with_timeout(timeout)?;

    Ok(
        MaterialsProjectProvider::with_base_url(client, &config.provider.base_url)?
            .max_results(config.provider.max_results),
    )
}

const SHELL_HELP: &str = "\
Type a query and press enter to search.
  :mode <formula|material-id|chemsys>  switch search mode (input is kept)
  :key <api-key>                       set the API key for this session
  :status                              show mode, key status and last result
  :help                                show this help
  :quit                                leave the shell";

async fn run_shell(
    provider: &dyn SearchProvider,
    mut credential: Credential,
    mode: QueryMode,
    format: UiFormat,
) -> Result<()> {
    let mut session = SearchSession::new();
    session.set_mode(mode);

    ui::print_section("Materials Master");
    println!("API key: {}", ui::credential_badge(&credential));
    println!("{}", SHELL_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(
            "{} ({})> ",
            session.draft().mode().id(),
            session.draft().mode().placeholder()
        );
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim() {
            ":quit" | ":q" | ":exit" => break,
            ":help" | ":h" => println!("{}", SHELL_HELP),
            ":status" => {
                println!("Mode:    {}", session.draft().mode());
                println!("API key: {}", ui::credential_badge(&credential));
                ui::render_state(session.state(), format)?;
            }
            cmd if cmd.starts_with(":mode") => {
                match cmd.trim_start_matches(":mode").parse::<QueryMode>() {
                    Ok(mode) => session.set_mode(mode),
                    Err(e) => ui::print_status(Status::Warning, &e),
                }
            }
            cmd if cmd.starts_with(":key") => {
                credential = Credential::new(cmd.trim_start_matches(":key").trim());
                println!("API key: {}", ui::credential_badge(&credential));
            }
            _ => {
                session.set_input(line.clone());
                let spinner = Spinner::for_output("Searching materials...", format);
                let state = session.search(provider, &credential).await;
                spinner.finish();
                ui::render_state(state, format)?;
            }
        }
    }

    Ok(())
}

impl From<Mode> for QueryMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Formula => QueryMode::Formula,
            Mode::MaterialId => QueryMode::MaterialId,
            Mode::Chemsys => QueryMode::ChemicalSystem,
        }
    }
}

impl From<OutputFormat> for UiFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Auto => UiFormat::Auto,
            OutputFormat::Table => UiFormat::Table,
            OutputFormat::Json => UiFormat::Json,
            OutputFormat::Plain => UiFormat::Plain,
        }
    }
}
