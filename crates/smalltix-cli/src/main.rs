// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Smalltix transpiler command-line interface.
//!
//! This is the main entry point for the `st2sh` command: it reads one
//! Smalltalk-style method (from a file or an inline `-e` string),
//! compiles it, and either writes the generated scripts into an output
//! directory or prints them to stdout labeled by name.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use miette::{Context, IntoDiagnostic, NamedSource, Result};
use tracing::{debug, info};

use smalltix_core::codegen::CompiledMethod;

/// Smalltix: compile a Smalltalk-style method to runtime shell scripts
#[derive(Debug, Parser)]
#[command(name = "st2sh")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file containing one method
    #[arg(conflicts_with = "expression", required_unless_present = "expression")]
    file: Option<Utf8PathBuf>,

    /// Compile an inline source string instead of a file
    #[arg(short = 'e', long = "expression", value_name = "SOURCE")]
    expression: Option<String>,

    /// Directory to write the generated scripts into
    ///
    /// Without this, all scripts are printed to stdout labeled by name.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<Utf8PathBuf>,
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    init_logging();

    let cli = Cli::parse();

    let result = transpile(&cli);

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn transpile(cli: &Cli) -> Result<()> {
    let (source, origin) = read_source(cli)?;
    debug!(origin = %origin, bytes = source.len(), "read source");

    let compiled = smalltix_core::compile(&source).map_err(|error| {
        miette::Report::new(error).with_source_code(NamedSource::new(&origin, source.clone()))
    })?;

    match &cli.output {
        Some(directory) => write_scripts(&compiled, directory),
        None => {
            print_scripts(&compiled);
            Ok(())
        }
    }
}

/// Reads the method source from the file argument or the `-e` string.
fn read_source(cli: &Cli) -> Result<(String, String)> {
    if let Some(expression) = &cli.expression {
        return Ok((expression.clone(), "<inline>".to_owned()));
    }
    let Some(path) = &cli.file else {
        miette::bail!("no source file or -e expression given");
    };
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read '{path}'"))?;
    Ok((source, path.to_string()))
}

/// Writes every generated script into `directory`, reporting each path.
fn write_scripts(compiled: &CompiledMethod, directory: &Utf8Path) -> Result<()> {
    fs::create_dir_all(directory)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create output directory '{directory}'"))?;

    for script in compiled.scripts() {
        let path = directory.join(script.name.as_str());
        fs::write(&path, format!("{}\n", script.contents))
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write '{path}'"))?;
        make_executable(&path)?;
        info!(script = %script.name, "wrote script");
        println!("{path}");
    }
    Ok(())
}

/// Prints every generated script to stdout, labeled by name.
fn print_scripts(compiled: &CompiledMethod) {
    for script in compiled.scripts() {
        println!("=== {} ===", script.name);
        println!("{}", script.contents);
    }
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to mark '{path}' executable"))
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

/// Initialize logging for the transpiler.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}
