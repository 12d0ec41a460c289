use anyhow::Result;
use catche_cli::{commands, init_logging};
use catche_core::{ImportRequest, Settings};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catche")]
#[command(author, version, long_about = None)]
#[command(
    about = "Imports fuel card transaction files from S3 into Catch-e",
    long_about = "Catche logs in to Catch-e, opens the transaction import dialog and uploads \
                  a file fetched from S3, either once from the command line or on demand \
                  through an HTTP API."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the import HTTP API
    Serve {
        /// Address to bind (defaults to API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single import
    Run {
        /// Catch-e username
        #[arg(short, long)]
        username: String,

        /// Catch-e password
        #[arg(long, env = "CATCHE_PASSWORD", hide_env_values = true)]
        password: String,

        /// S3 key of the transaction file
        #[arg(short, long, value_name = "KEY")]
        object_key: String,

        /// Login page URL
        #[arg(long)]
        url: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which Chrome binary imports would use
    Chrome {
        /// Path to the Chrome binary (defaults to CHROME_PATH, then auto-detect)
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Completion { shell } = cli.command {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    let settings = Settings::from_env()?;
    let _log_guard = init_logging(&settings.log_level, cli.verbose, &settings.log_dir);

    match cli.command {
        Commands::Serve { host, port } => commands::serve::execute(settings, host, port),
        Commands::Run {
            username,
            password,
            object_key,
            url,
            json,
        } => {
            let mut request = ImportRequest::new(username, password, object_key);
            if let Some(url) = url {
                request = request.with_url(url);
            }
            commands::run::execute(settings, request, json)
        }
        Commands::Chrome { chrome_path } => {
            let headless = settings.headless;
            commands::chrome::execute(chrome_path.or(settings.chrome_path), headless)
        }
        Commands::Completion { .. } => Ok(()),
    }
}
