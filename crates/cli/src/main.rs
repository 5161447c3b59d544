use clap::{Parser, Subcommand};
use core_restriction::ViewContext;

mod commands;

#[derive(Parser)]
#[command(name = "coursegate")]
#[command(version, about = "Course content restriction CLI", long_about = None)]
struct Cli {
    /// Log resolver decisions (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a site file and report configuration warnings
    Check {
        /// Path to the site file (.toml, .yaml or .yml)
        file: String,
    },
    /// Explain whether a viewer may see a piece of content
    Resolve {
        /// Path to the site file (.toml, .yaml or .yml)
        file: String,

        /// Content id to resolve
        content_id: u64,

        /// Viewer id (anonymous when omitted)
        #[arg(long)]
        viewer: Option<u64>,

        /// Page context the content is shown in
        #[arg(long, default_value = "singular")]
        context: ViewContext,

        /// Evaluation time: Unix seconds, RFC 3339 or YYYY-MM-DD (defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Print the result as YAML
        #[arg(long)]
        yaml: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { file } => {
            commands::check::check(&file)?;
        }
        Commands::Resolve {
            file,
            content_id,
            viewer,
            context,
            at,
            yaml,
        } => {
            commands::resolve::resolve(
                &file,
                content_id,
                viewer,
                context,
                at.as_deref(),
                yaml,
            )?;
        }
    }

    Ok(())
}
