use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::TwsCommand;
use crate::logging;
use crate::project::Project;

/// Inspect how Twig templates inherit and override blocks.
#[derive(Parser)]
#[command(name = "tws")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: TwsCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });
    let global = &cli.args.global;

    let root = match &global.project {
        Some(root) => root.clone(),
        None => Utf8PathBuf::try_from(std::env::current_dir()?)
            .context("Current directory is not valid UTF-8")?,
    };

    let settings = tws_conf::Settings::new(&root).context("Failed to load settings")?;
    let _guard = logging::init_tracing(global, &settings, &root);

    let project = Project::load(root, settings)?;
    let exit = cli.command.execute(&project)?;

    Ok(exit.report(global.quiet))
}
