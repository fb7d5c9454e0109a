//! Infinite Faces CLI
//!
//! Commands: generate, traits, catalog, serve
//! `generate` writes SVG to stdout, the others JSON; logs go to stderr.
//! Returns non-zero on catalog or server failure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use faces_core::{
    FaceGenerator, TraitCatalog, TraitCategory, DEFAULT_SEED,
    server,
};

#[derive(Parser)]
#[command(name = "faces-cli")]
#[command(about = "Infinite Faces - deterministic SVG faces from any seed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON trait catalog (built-in catalog if omitted)
    #[arg(short, long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SVG for a seed
    Generate {
        #[arg(default_value = DEFAULT_SEED)]
        seed: String,
    },

    /// Print the traits selected for a seed
    Traits {
        #[arg(default_value = DEFAULT_SEED)]
        seed: String,
    },

    /// Print table sizes and the catalog fingerprint
    Catalog,

    /// Serve faces over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,faces_core=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => match TraitCatalog::from_json_file(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                println!("{}", serde_json::json!({ "error": e.to_string() }));
                return ExitCode::FAILURE;
            }
        },
        None => TraitCatalog::standard(),
    };

    // An invalid catalog must never serve a single face.
    let generator = match FaceGenerator::new(Arc::new(catalog)) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Generate { seed } => {
            print!("{}", generator.generate(&seed));
            ExitCode::SUCCESS
        }

        Commands::Traits { seed } => {
            let face = generator.derive(&seed);
            print_json(&face)
        }

        Commands::Catalog => {
            let catalog = generator.catalog();
            let fingerprint = match catalog.fingerprint() {
                Ok(f) => f,
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": e.to_string() }));
                    return ExitCode::FAILURE;
                }
            };
            let tables: serde_json::Map<_, _> = TraitCategory::ALL
                .iter()
                .map(|c| (c.name().to_string(), serde_json::json!(catalog.table(*c).len())))
                .collect();
            print_json(&serde_json::json!({
                "fingerprint": fingerprint,
                "tables": tables,
            }))
        }

        Commands::Serve { host, port } => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("Failed to start runtime: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let bind_addr = format!("{}:{}", host, port);
            match runtime.block_on(server::serve(&bind_addr, generator)) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}
