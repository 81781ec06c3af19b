use anyhow::Result;
use clap::Parser;
use tws_inspector::BlockContribution;

use crate::commands::inspection_failed;
use crate::commands::Command;
use crate::exit::Exit;
use crate::project::Project;

#[derive(Debug, Parser)]
pub struct Blocks {
    /// Template name, e.g. `@Contao/content_element/text.html.twig`
    template: String,

    /// Block name
    block: String,

    /// Include templates that do not define the block
    #[arg(long)]
    all: bool,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl Command for Blocks {
    fn execute(&self, project: &Project) -> Result<Exit> {
        let hierarchy = match project.inspector().block_info(&self.template, &self.block) {
            Ok(hierarchy) => hierarchy,
            Err(err) => {
                let subject = format!("block \"{}\" of \"{}\"", self.block, self.template);
                return Ok(inspection_failed(&subject, &err));
            }
        };

        let contributions: Vec<&BlockContribution> = if self.all {
            hierarchy.contributions().iter().collect()
        } else {
            hierarchy.visible().collect()
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&contributions)?);
        } else {
            for contribution in contributions {
                println!("{}", render(contribution));
            }
        }

        Ok(Exit::success())
    }
}

pub(crate) fn render(contribution: &BlockContribution) -> String {
    let marker = if contribution.is_target { '>' } else { ' ' };

    let mut notes = Vec::new();
    if contribution.is_prototype {
        notes.push("prototype");
    }
    if contribution.is_shadowed {
        notes.push("shadowed");
    }
    if contribution.has_warning {
        notes.push("warning: discards content defined below");
    }

    let mut line = format!(
        "{marker} {} {}",
        contribution.template_name, contribution.block_type
    );
    if !notes.is_empty() {
        line.push_str(&format!(" ({})", notes.join(", ")));
    }
    line
}
