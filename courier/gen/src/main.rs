//! Courier Code Generator
//!
//! Generates HTTP client implementations from declarative interface
//! definitions.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use courier_gen::config::GeneratorConfig;
use courier_gen::frontend::load_definitions;
use courier_gen::output::generate_and_write;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Courier code generator - implements declarative HTTP interfaces
#[derive(Parser, Debug)]
#[command(name = "courier-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Definition file: Rust source (.rs) or a JSON/TOML document
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for generated code
    #[arg(short, long, default_value = "src/generated")]
    output: PathBuf,

    /// Generator configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path of the runtime crate used by generated code
    #[arg(long)]
    runtime: Option<String>,

    /// Module where the annotated traits live, relative to the generated file
    #[arg(long)]
    trait_module: Option<String>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Write output even when some methods could not be generated
    #[arg(long)]
    allow_faults: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,courier_gen=info".to_string(),
            2 => "info,courier_gen=debug".to_string(),
            _ => "debug,courier_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(runtime) = &cli.runtime {
        config.runtime = runtime.clone();
    }
    if let Some(trait_module) = &cli.trait_module {
        config.trait_module = trait_module.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config = load_config(&cli)?;
    let definitions = load_definitions(&cli.input)
        .wrap_err_with(|| format!("loading definitions from {}", cli.input.display()))?;

    tracing::info!(
        input = %cli.input.display(),
        interfaces = definitions.interfaces.len(),
        dry_run = cli.dry_run,
        "generating clients"
    );

    let generated = generate_and_write(
        &definitions,
        &config,
        &cli.output,
        cli.dry_run,
        cli.allow_faults,
    )?;

    if !cli.dry_run {
        for file in &generated {
            eprintln!(
                "Generated {} -> {}",
                file.name,
                cli.output.join(&file.file_name).display()
            );
        }
    }

    Ok(())
}
