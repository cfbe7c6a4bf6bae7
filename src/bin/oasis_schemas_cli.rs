//! OASIS Schemas CLI - Studio Tooling Interface
//!
//! Commands: types, schema, check, validate, preview, create, manifest,
//! verify-manifest, config
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure, 1 on any other error

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use oasis_schemas::{
    pipeline::{mutation_payload, verify_manifest, ManifestHeader, SchemaManifest},
    DocumentPipeline, PipelineError, SchemaRegistry, SchemaValidator, Settings,
};

#[derive(Parser)]
#[command(name = "oasis-schemas-cli")]
#[command(about = "OASIS Schemas CLI - content studio document types")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use the full catalog instead of the studio registry
    #[arg(long, global = true)]
    catalog: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered document types
    Types,

    /// Print schema definitions
    Schema {
        /// Only this document type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },

    /// Run the structural schema rules over the registry
    Check,

    /// Validate a document
    Validate(DocumentArgs),

    /// Compute a document's preview
    Preview(DocumentArgs),

    /// Build a create mutation for a document
    Create(DocumentArgs),

    /// Export a schema manifest
    Manifest {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Compare a stored manifest with the current registry
    VerifyManifest {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the resolved CLI and studio configuration
    Config,
}

#[derive(Args)]
struct DocumentArgs {
    /// Document type name
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// JSON document
    #[arg(short, long, conflicts_with = "file")]
    payload: Option<String>,

    /// File holding the JSON document
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{e}");
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => return fail(format!("Failed to load configuration: {e}")),
    };

    let registry = if cli.catalog {
        SchemaRegistry::catalog()
    } else {
        SchemaRegistry::studio()
    };
    debug!(types = registry.len(), catalog = cli.catalog, "registry ready");

    let pipeline = DocumentPipeline::with_failure_mode(registry, settings.validation.failure_mode);

    match cli.command {
        Commands::Types => {
            let types: Vec<_> = pipeline
                .registry()
                .list()
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "title": t.title,
                        "fields": t.fields.len(),
                        "preview": t.preview.is_some(),
                    })
                })
                .collect();
            emit(&types)
        }

        Commands::Schema { type_name } => match type_name {
            Some(name) => match pipeline.get_type(&name) {
                Ok(document_type) => emit(document_type),
                Err(e) => fail(e),
            },
            None => emit(pipeline.registry().list()),
        },

        Commands::Check => {
            let report = SchemaValidator::new().validate_registry(pipeline.registry());
            verdict(&report, report.valid)
        }

        Commands::Validate(args) => {
            let document = match read_document(&args) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };
            match pipeline.validate_document(&args.type_name, &document) {
                Ok(result) => verdict(&result, result.valid),
                Err(e) => fail(e),
            }
        }

        Commands::Preview(args) => {
            let document = match read_document(&args) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };
            match pipeline.preview_document(&args.type_name, &document) {
                Ok(preview) => emit(&preview),
                Err(e) => fail(e),
            }
        }

        Commands::Create(args) => {
            let document = match read_document(&args) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };
            match pipeline.prepare_create(&args.type_name, document) {
                Ok(prepared) => {
                    info!(id = %prepared.id, document_type = %prepared.document_type, "document prepared");
                    emit(&json!({
                        "success": true,
                        "id": prepared.id,
                        "contentHash": prepared.content_hash,
                        "mutation": mutation_payload(std::slice::from_ref(&prepared)),
                    }))
                }
                Err(e @ PipelineError::ValidationFailed(_)) => {
                    println!("{}", json!({"success": false, "error": e.to_string()}));
                    ExitCode::from(2)
                }
                Err(e) => fail(e),
            }
        }

        Commands::Manifest { out } => {
            let manifest = match SchemaManifest::build(pipeline.registry()) {
                Ok(m) => m,
                Err(e) => return fail(e),
            };
            match out {
                Some(path) => match write_json(&path, &manifest) {
                    Ok(()) => emit(&json!({
                        "written": path.display().to_string(),
                        "schema_hash": manifest.schema_hash,
                        "types": manifest.type_names,
                    })),
                    Err(e) => fail(e),
                },
                None => emit(&manifest),
            }
        }

        Commands::VerifyManifest { file } => {
            let header: ManifestHeader = match read_json(&file) {
                Ok(h) => h,
                Err(e) => return fail(e),
            };
            match verify_manifest(&header, pipeline.registry()) {
                Ok(check) => {
                    let up_to_date = check.hash_matches;
                    verdict(&check, up_to_date)
                }
                Err(e) => fail(e),
            }
        }

        Commands::Config => emit(&json!({
            "cli": settings.cli_config(),
            "studio": settings.studio_config(pipeline.registry()),
        })),
    }
}

fn init_tracing(verbose: bool) -> Result<(), String> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("OASIS_SCHEMAS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))
}

fn read_document(args: &DocumentArgs) -> Result<Value, PipelineError> {
    match (&args.payload, &args.file) {
        (Some(payload), _) => Ok(serde_json::from_str(payload)?),
        (None, Some(path)) => read_json(path),
        (None, None) => Err(PipelineError::InvalidPayload(
            "provide --payload or --file".to_string(),
        )),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw)?;
    Ok(())
}

fn emit<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    verdict(value, true)
}

/// Print a report; exit 2 when it did not pass.
fn verdict<T: Serialize + ?Sized>(value: &T, passed: bool) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }
        Err(e) => fail(e),
    }
}

fn fail(error: impl Display) -> ExitCode {
    println!("{}", json!({"error": error.to_string()}));
    ExitCode::FAILURE
}
