use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use xsd_codegen::codegen::{self, GenerateConfig};
use xsd_codegen::target::TargetLanguage;

/// Generate typed data-binding declarations from a parsed XML Schema.
///
/// Reads a proto tree (the JSON form of a parsed XSD) and writes one source
/// file of Go, Rust or TypeScript declarations for it.
#[derive(Parser)]
#[command(name = "xsd-codegen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a serialized proto tree and cache it locally.
    #[cfg(feature = "download")]
    FetchTree {
        /// URL serving the proto tree JSON.
        #[arg(long, env = "XSD_CODEGEN_TREE_URL")]
        url: String,

        /// Where to save the tree.
        #[arg(long, default_value = "tree.json")]
        output: PathBuf,
    },

    /// Generate declarations from a proto tree.
    Generate {
        /// Proto tree JSON file.
        #[arg(long)]
        tree: PathBuf,

        /// Target language: go, rust or typescript.
        #[arg(long, default_value = "go")]
        target: TargetLanguage,

        /// Output base path; the target's file extension is appended.
        #[arg(long)]
        output: PathBuf,

        /// Package or module name for the generated file.
        #[arg(long, env = "XSD_CODEGEN_PACKAGE")]
        package: Option<String>,

        /// Fail on type references the tree does not define.
        #[arg(long)]
        strict: bool,

        /// Suppress non-error output.
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet());

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

impl Cli {
    fn quiet(&self) -> bool {
        match &self.command {
            Commands::Generate { quiet, .. } => *quiet,
            #[cfg(feature = "download")]
            Commands::FetchTree { .. } => false,
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `error` when quiet.
fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn run(cli: Cli) -> xsd_codegen::error::Result<()> {
    match cli.command {
        #[cfg(feature = "download")]
        Commands::FetchTree { url, output } => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| xsd_codegen::error::Error::Download(e.to_string()))?;
            rt.block_on(xsd_codegen::proto_tree::download_tree(&url, &output))?;
        }

        Commands::Generate {
            tree,
            target,
            output,
            package,
            strict,
            quiet: _,
        } => {
            info!(path = %tree.display(), "loading proto tree");
            let proto_tree = xsd_codegen::proto_tree::load_tree(&tree)?;
            info!(
                definitions = proto_tree.definitions.len(),
                source = proto_tree.source.as_deref().unwrap_or("-"),
                "loaded proto tree"
            );

            let config = GenerateConfig {
                target,
                output,
                package,
                strict,
            };
            let stats = codegen::generate(&proto_tree, &config)?;

            info!(
                emitted = stats.declarations_emitted,
                duplicates = stats.duplicates_skipped,
                self_typed = stats.self_typed_elements_skipped,
                "generated {} declarations",
                stats.declarations_emitted
            );
            if stats.names_disambiguated > 0 {
                info!("Disambiguated {} colliding names", stats.names_disambiguated);
            }
            if stats.unresolved_references > 0 {
                info!(
                    "Passed through {} references not defined in the tree",
                    stats.unresolved_references
                );
            }
            if stats.indirections_inserted > 0 {
                info!(
                    "Inserted {} indirections for recursive types",
                    stats.indirections_inserted
                );
            }
            info!("Done.");
        }
    }

    Ok(())
}
