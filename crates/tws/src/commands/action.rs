use anyhow::bail;
use anyhow::Result;
use clap::Parser;
use tws_studio::ActionContext;
use tws_studio::ActionRegistry;
use tws_studio::ActionResult;
use tws_studio::CoreActionProvider;
use tws_studio::StudioError;

use crate::commands::inspection_failed;
use crate::commands::Command;
use crate::exit::Exit;
use crate::project::Project;

fn parse_parameter(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{value}'"))
}

#[derive(Debug, Parser)]
pub struct RunAction {
    /// Action name, e.g. `create_custom_template`
    name: String,

    /// Template identifier the action operates on
    #[arg(long)]
    identifier: String,

    /// Additional parameters (`name=highlight`, `confirm=1`, `content=...`)
    #[arg(long = "set", value_parser = parse_parameter)]
    parameters: Vec<(String, String)>,
}

impl Command for RunAction {
    fn execute(&self, project: &Project) -> Result<Exit> {
        let studio = project.studio()?;
        let provider = CoreActionProvider::new(studio);
        let registry = ActionRegistry::from_providers(&[&provider])?;

        let context = self
            .parameters
            .iter()
            .fold(ActionContext::for_identifier(&self.identifier), |context, (key, value)| {
                context.with(key, value)
            });

        let result = match registry.execute(&self.name, &context) {
            Ok(result) => result,
            Err(StudioError::Inspection(err)) => {
                return Ok(inspection_failed(&format!("\"{}\"", self.identifier), &err));
            }
            Err(err @ (StudioError::UnknownAction(_) | StudioError::NotExecutable { .. })) => {
                let available = registry.available(&context);
                return Ok(Exit::error().with_message(format!(
                    "{err}. Available actions: {}",
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                )));
            }
            Err(err) => bail!(err),
        };

        Ok(match result {
            ActionResult::Success { message } => Exit::success().with_message(message),
            ActionResult::Error { message } => Exit::error().with_message(message),
            ActionResult::Step(step) => {
                Exit::success().with_message(serde_json::to_string_pretty(&step)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("name=highlight"),
            Ok(("name".to_string(), "highlight".to_string()))
        );
        assert_eq!(
            parse_parameter("content=a=b"),
            Ok(("content".to_string(), "a=b".to_string()))
        );
        assert!(parse_parameter("confirm").is_err());
    }
}
