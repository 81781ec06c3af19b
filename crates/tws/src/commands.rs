mod action;
mod blocks;
mod chains;
mod inspect;
mod tree;

use anyhow::Result;
use clap::Subcommand;
use tws_inspector::InspectionError;

use crate::exit::Exit;
use crate::project::Project;

pub trait Command {
    fn execute(&self, project: &Project) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum TwsCommand {
    /// Show how a block is resolved across the template hierarchy
    Blocks(self::blocks::Blocks),
    /// Summarize a template: parent, imports, blocks and slots
    Inspect(self::inspect::Inspect),
    /// List the templates implementing each identifier
    Chains(self::chains::Chains),
    /// Print the identifier tree
    Tree(self::tree::Tree),
    /// Run a studio action
    Action(self::action::RunAction),
}

impl Command for TwsCommand {
    fn execute(&self, project: &Project) -> Result<Exit> {
        match self {
            TwsCommand::Blocks(command) => command.execute(project),
            TwsCommand::Inspect(command) => command.execute(project),
            TwsCommand::Chains(command) => command.execute(project),
            TwsCommand::Tree(command) => command.execute(project),
            TwsCommand::Action(command) => command.execute(project),
        }
    }
}

/// Exit for a failed inspection.
fn inspection_failed(subject: &str, err: &InspectionError) -> Exit {
    let message = if err.is_stale_cache() {
        format!(
            "Could not retrieve information about {subject}: {err}; please rebuild the template cache"
        )
    } else {
        format!("Could not retrieve information about {subject}: {err}")
    };
    Exit::error().with_message(message)
}
