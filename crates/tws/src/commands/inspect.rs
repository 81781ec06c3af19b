use anyhow::Result;
use clap::Parser;
use tws_inspector::TemplateInformation;
use tws_inspector::TemplateNameInfo;
use tws_templates::UseDeclaration;

use crate::commands::inspection_failed;
use crate::commands::Command;
use crate::exit::Exit;
use crate::project::Project;

#[derive(Debug, Parser)]
pub struct Inspect {
    /// Template name, e.g. `@Contao/content_element/text.html.twig`
    template: String,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl Command for Inspect {
    fn execute(&self, project: &Project) -> Result<Exit> {
        let info = match project.inspector().inspect_template(&self.template) {
            Ok(info) => info,
            Err(err) => {
                let subject = format!("\"{}\"", self.template);
                return Ok(inspection_failed(&subject, &err));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            print!("{}", render(&info));
        }

        Ok(Exit::success())
    }
}

fn render_use(declaration: &UseDeclaration) -> String {
    if declaration.renames.is_empty() {
        return declaration.template.to_string();
    }

    let renames: Vec<String> = declaration
        .renames
        .iter()
        .map(|(used, local)| format!("{used} as {local}"))
        .collect();
    format!("{} with {}", declaration.template, renames.join(", "))
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn render(info: &TemplateInformation) -> String {
    let name = TemplateNameInfo::new(info.name.as_str());
    let uses: Vec<String> = info.uses.iter().map(render_use).collect();

    let rows = [
        ("namespace", name.namespace),
        ("identifier", name.identifier),
        ("extension", name.extension),
        (
            "extends",
            info.extends
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
        ),
        ("uses", list(&uses)),
        ("blocks", list(&info.block_names)),
        ("slots", list(&info.slots)),
    ];

    let mut output = format!("{}\n", info.name);
    for (label, value) in rows {
        output.push_str(&format!("  {:<12}{value}\n", format!("{label}:")));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_information() {
        let info = TemplateInformation {
            name: "@Contao_Global/content_element/text.html.twig".into(),
            block_names: vec!["content".to_string(), "image".to_string()],
            slots: vec!["headline".to_string()],
            extends: Some("@Contao_CoreBundle/content_element/text.html.twig".into()),
            uses: vec![UseDeclaration::new("@Contao_CoreBundle/component/_figure.html.twig")
                .with_rename("figure", "image")],
        };

        insta::assert_snapshot!(render(&info), @r"
        @Contao_Global/content_element/text.html.twig
          namespace:  Contao_Global
          identifier: content_element/text
          extension:  html.twig
          extends:    @Contao_CoreBundle/content_element/text.html.twig
          uses:       @Contao_CoreBundle/component/_figure.html.twig with figure as image
          blocks:     content, image
          slots:      headline
        ");
    }
}
