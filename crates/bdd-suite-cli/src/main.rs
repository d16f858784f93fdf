//! Command line runner and diagnostics for feature suites.
//!
//! `apps` lists the applications under a root directory together with their
//! feature directories. `run` builds a features-only suite over the root and
//! executes it; step definitions come from crates linked into the calling
//! binary, so a bare `run` is mostly useful for discovery and for generating
//! step-definition scaffolding from the undefined-step snippets.

use std::io::Write;
use std::process::ExitCode;

use bdd_suite::{
    AppRegistry, CaseOptions, DirectoryRegistry, FeaturesOnlySuiteBuilder, Formatter,
    GherkinRunner, LoopbackServer, locate,
};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use eyre::Result;

/// Feature-suite runner and diagnostics.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Supported commands.
#[derive(Subcommand)]
enum Commands {
    /// List applications under the root and their feature directories.
    Apps {
        /// Directory whose subdirectories are treated as applications.
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,
    },
    /// Build and run a features-only suite.
    Run {
        /// Directory whose subdirectories are treated as applications.
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,
        /// Application labels to run; all applications when omitted.
        labels: Vec<String>,
        /// Stop at the first failing case.
        #[arg(long)]
        fail_fast: bool,
        /// Suppress undefined-step snippet generation.
        #[arg(long)]
        no_snippets: bool,
        /// One line per scenario instead of per-step output.
        #[arg(long)]
        plain: bool,
        /// Buffer case output and replay it only on failure.
        #[arg(long)]
        capture: bool,
        /// Run without a live server lifecycle.
        #[arg(long)]
        no_server: bool,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    match Cli::parse().command {
        Commands::Apps { root } => {
            handle_apps(&root)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            root,
            labels,
            fail_fast,
            no_snippets,
            plain,
            capture,
            no_server,
        } => {
            let options = CaseOptions {
                formatter: if plain {
                    Formatter::Plain
                } else {
                    Formatter::Pretty
                },
                capture_output: capture,
                show_snippets: !no_snippets,
            };
            handle_run(&root, &labels, options, fail_fast, no_server)
        }
    }
}

fn handle_apps(root: &Utf8PathBuf) -> Result<()> {
    let registry = DirectoryRegistry::discover(root)?;
    let mut out = std::io::stdout().lock();
    for app in registry.all() {
        match locate::features_dir(app.dir()) {
            Some(dir) => writeln!(out, "{}\t{dir}", app.label())?,
            None => writeln!(out, "{}\t-", app.label())?,
        }
    }
    Ok(())
}

fn handle_run(
    root: &Utf8PathBuf,
    labels: &[String],
    options: CaseOptions,
    fail_fast: bool,
    no_server: bool,
) -> Result<ExitCode> {
    let registry = DirectoryRegistry::discover(root)?;
    let mut builder =
        FeaturesOnlySuiteBuilder::new(Box::new(registry), std::sync::Arc::new(GherkinRunner))
            .with_options(options)
            .with_fail_fast(fail_fast);
    if !no_server {
        builder = builder.with_server_factory(Box::new(|| Box::new(LoopbackServer::new())));
    }
    let mut suite = builder.build(labels)?;

    let mut out = std::io::stdout().lock();
    let mut diag = std::io::stderr().lock();
    let report = suite.run(&mut out, &mut diag, builder.fail_fast());
    writeln!(out)?;
    report.write_summary(&mut out)?;
    Ok(report.exit_code())
}
