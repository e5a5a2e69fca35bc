use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "shadersync")]
#[command(about = "shadersync CLI - inspect, pack and publish shader sessions", long_about = None)]
struct Cli {
    /// Read config.toml and secret.json from this directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a stored document and summarize it
    Inspect {
        /// Document id or URL
        identity: String,
    },
    /// Build a document from local files, inlining every asset
    Pack {
        /// Fragment source file
        #[arg(long)]
        frag: Option<PathBuf>,
        /// Vertex source file
        #[arg(long)]
        vert: Option<PathBuf>,
        /// Asset file, stored under its file name
        #[arg(long = "asset")]
        assets: Vec<PathBuf>,
        /// Runtime command replayed after load (e.g. `floor,on`)
        #[arg(long = "command")]
        commands: Vec<String>,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a document and print its id
    Publish {
        /// Document JSON file
        document: PathBuf,
        /// Title of the new document
        #[arg(short, long)]
        name: String,
    },
    /// Show the user the store token belongs to
    Whoami,
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("shadersync=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let context = commands::Context::load(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Inspect { identity } => commands::inspect::run(&context, &identity).await?,
        Commands::Pack {
            frag,
            vert,
            assets,
            commands: runtime_commands,
            output,
        } => {
            let options = commands::pack::PackOptions {
                frag,
                vert,
                assets,
                commands: runtime_commands,
            };
            commands::pack::run(&options, output.as_deref())?
        }
        Commands::Publish { document, name } => {
            commands::publish::run(&context, &document, &name).await?
        }
        Commands::Whoami => commands::whoami::run(&context).await?,
    }

    Ok(())
}
