use anyhow::Result;
use clap::Parser;
use tws_inspector::MetadataStore;

use crate::commands::Command;
use crate::exit::Exit;
use crate::project::Project;

#[derive(Debug, Parser)]
pub struct Chains {
    /// Only show the chain of this identifier, e.g. `content_element/text`
    identifier: Option<String>,
}

impl Command for Chains {
    fn execute(&self, project: &Project) -> Result<Exit> {
        let chains = project.workspace.inheritance_chains();

        if let Some(identifier) = &self.identifier {
            let Some(chain) = chains.get(identifier) else {
                return Ok(Exit::error().with_message(format!("Unknown template identifier '{identifier}'")));
            };
            for name in chain {
                println!("{name}");
            }
            return Ok(Exit::success());
        }

        for (identifier, chain) in &chains {
            println!("{identifier}");
            for name in chain {
                println!("  {name}");
            }
        }

        Ok(Exit::success())
    }
}
