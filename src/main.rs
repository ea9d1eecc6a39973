use agile_docs::cli::{DocsArgs, ValidateArgs};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `agile_docs=debug`
const LOG_ENV: &str = "AGILE_DOCS_LOG";

#[derive(Parser)]
#[command(name = "agile-docs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schema validator for agile methodology documentation", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate documentation files against the schema
    Validate(ValidateArgs),

    /// Print the bundled agile documentation
    Docs(DocsArgs),

    /// Print the bundled JSON schema
    Schema,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

/// Dispatch a command; `Ok(false)` means the command ran but reported failure
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Validate(args) => agile_docs::cli::validate::run(&args),

        Commands::Docs(args) => {
            agile_docs::cli::docs::run(&args)?;
            Ok(true)
        }

        Commands::Schema => {
            agile_docs::cli::schema::run()?;
            Ok(true)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "agile-docs", &mut io::stdout());
            Ok(true)
        }
    }
}
