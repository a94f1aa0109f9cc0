//! Command-line driver for the reflection generator.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info};
use obsidian_codegen::{CodeGenerator, GeneratorConfig};

/// Generate C++ reflection code from parsed header ASTs
#[derive(Parser, Debug)]
#[command(name = "obsidian")]
#[command(version, about = "Generate C++ reflection metadata from annotated header ASTs")]
struct Args {
    /// AST document or directory of documents (repeatable)
    #[arg(long = "ast", value_name = "FILE|DIR", required = true)]
    ast: Vec<PathBuf>,

    /// Directory receiving the generated headers
    #[arg(short, long, value_name = "DIR", required_unless_present = "stdout")]
    out_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Attribute that opts declarations in
    #[arg(short, long)]
    marker: Option<String>,

    /// Directory with template overrides
    #[arg(long, value_name = "DIR")]
    template_dir: Option<PathBuf>,

    /// Prefix stripped from generated include paths (repeatable)
    #[arg(long = "include-root", value_name = "DIR")]
    include_roots: Vec<String>,

    /// Do not write the marker header
    #[arg(long)]
    no_marker_header: bool,

    /// Also write a JSON summary with this file name
    #[arg(long, value_name = "FILE")]
    metadata: Option<String>,

    /// Print the reflection header instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(marker) = &self.marker {
            config.marker = marker.clone();
        }
        config.include_roots.extend(self.include_roots.iter().cloned());
        if self.no_marker_header {
            config.marker_header = None;
        }
        if let Some(metadata) = &self.metadata {
            config.metadata_file = Some(metadata.clone());
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.load_config()?;
    if config.marker.is_empty() {
        bail!("The reflection marker must not be empty");
    }
    debug!("configuration: {config:?}");

    let mut generator = CodeGenerator::with_config(config);
    if let Some(dir) = &args.template_dir {
        generator
            .load_templates(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
    }

    for path in &args.ast {
        let loaded = if path.is_dir() {
            generator.add_ast_dir(path)
        } else {
            generator.add_ast_file(path)
        };
        loaded.with_context(|| format!("Failed to load AST from {}", path.display()))?;
    }

    if args.stdout {
        generator
            .write_to(io::stdout().lock())
            .context("Failed to generate reflection code")?;
        return Ok(());
    }

    let Some(out_dir) = &args.out_dir else {
        bail!("--out-dir is required unless --stdout is given");
    };
    let artifacts = generator
        .write_to_dir(out_dir)
        .context("Failed to generate reflection code")?;
    info!("{} files written to {}", artifacts.len(), out_dir.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(&args)
}
