mod classify;
mod commands;
mod config;
mod diagnostics;
mod digest;
mod error;
mod example;
mod html;
mod info;
mod loader;
mod positions;
mod render;
mod resolver;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "schemaview", about = "Multi-file JSON Schema viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every $ref in a schema (or directory of schemas) resolves
    Check {
        /// Root schema document, or a directory to sweep for *.json roots
        target: PathBuf,
    },
    /// Print a synthesized example value as JSON
    Example {
        /// Root schema document
        schema: PathBuf,
        /// Pointer to synthesize instead of the root, e.g. `#/$defs/Address`
        pointer: Option<String>,
    },
    /// Output a comprehensive reference document for schemaview
    Info {
        /// Emit JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// List every $ref with its form and resolution status
    Refs {
        /// Root schema document
        schema: PathBuf,
    },
    /// Export a standalone HTML view
    Render {
        /// Root schema document
        schema: PathBuf,
        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Render the schema tree in the terminal
    View {
        /// Root schema document
        schema: PathBuf,
        /// Maximum tree depth (overrides config; 0 = unlimited)
        #[arg(long)]
        depth: Option<usize>,
        /// Annotate nodes with source line numbers
        #[arg(long)]
        lines: bool,
        /// Suppress property descriptions
        #[arg(long)]
        no_descriptions: bool,
    },
    /// Re-render on filesystem changes
    Watch {
        /// Root schema document
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Check { target } => commands::check(&target),
        Commands::Example { schema, pointer } => {
            commands::example(&schema, pointer.as_deref()).map(|()| ExitCode::SUCCESS)
        },
        Commands::Info { json } => {
            info::run(json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Refs { schema } => commands::refs(&schema).map(|()| ExitCode::SUCCESS),
        Commands::Render { schema, output } => {
            commands::render(&schema, &output).map(|()| ExitCode::SUCCESS)
        },
        Commands::View { schema, depth, lines, no_descriptions } => {
            commands::view(&schema, depth, no_descriptions, lines).map(|()| ExitCode::SUCCESS)
        },
        Commands::Watch { schema } => watch::run(&schema),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}
