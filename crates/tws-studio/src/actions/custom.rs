use std::sync::Arc;

use camino::Utf8PathBuf;
use tws_inspector::MetadataStore;

use crate::action::Action;
use crate::action::ActionContext;
use crate::action::ActionResult;
use crate::action::ActionStep;
use crate::error::StudioError;
use crate::studio::TemplateStudio;

fn custom_path(studio: &TemplateStudio, identifier: &str) -> Result<Utf8PathBuf, StudioError> {
    let extension = studio.extension(identifier)?;
    Ok(Utf8PathBuf::from(format!("{identifier}.{extension}")))
}

/// Create a custom template for an identifier that has none yet.
pub struct CreateCustomTemplate {
    studio: Arc<TemplateStudio>,
}

impl CreateCustomTemplate {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>) -> Self {
        Self { studio }
    }
}

impl Action for CreateCustomTemplate {
    fn name(&self) -> &str {
        "create_custom_template"
    }

    fn can_execute(&self, context: &ActionContext) -> bool {
        context
            .identifier()
            .is_ok_and(|identifier| {
                self.studio.first(identifier).is_ok() && !self.studio.is_custom(identifier)
            })
    }

    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let identifier = context.identifier()?;

        let path = custom_path(&self.studio, identifier)?;
        let content = self.studio.skeleton(identifier)?;

        self.studio.write(&path, &content)?;
        self.studio.refresh();

        Ok(ActionResult::success("A custom template was created."))
    }
}

/// Replace the content of an existing custom template.
pub struct SaveCustomTemplate {
    studio: Arc<TemplateStudio>,
}

impl SaveCustomTemplate {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>) -> Self {
        Self { studio }
    }
}

impl Action for SaveCustomTemplate {
    fn name(&self) -> &str {
        "save_custom_template"
    }

    fn can_execute(&self, context: &ActionContext) -> bool {
        context
            .identifier()
            .is_ok_and(|identifier| self.studio.is_custom(identifier))
    }

    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let identifier = context.identifier()?;
        let content = context
            .get("content")
            .ok_or(StudioError::MissingParameter("content"))?;

        if !self.studio.is_custom(identifier) {
            return Err(StudioError::NoCustomTemplate(identifier.to_string()));
        }

        let path = custom_path(&self.studio, identifier)?;
        self.studio.write(&path, content)?;
        self.studio.refresh();

        Ok(ActionResult::Step(ActionStep::Saved {
            identifier: identifier.to_string(),
        }))
    }
}

/// Delete a custom template after confirmation.
pub struct DeleteCustomTemplate {
    studio: Arc<TemplateStudio>,
}

impl DeleteCustomTemplate {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>) -> Self {
        Self { studio }
    }
}

impl Action for DeleteCustomTemplate {
    fn name(&self) -> &str {
        "delete_custom_template"
    }

    fn can_execute(&self, context: &ActionContext) -> bool {
        context
            .identifier()
            .is_ok_and(|identifier| self.studio.is_custom(identifier))
    }

    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let identifier = context.identifier()?;

        if !context.has("confirm") {
            return Ok(ActionResult::Step(ActionStep::ConfirmDelete {
                identifier: identifier.to_string(),
                action: self.name().to_string(),
            }));
        }

        let path = custom_path(&self.studio, identifier)?;
        let is_last = self
            .studio
            .workspace()
            .inheritance_chains()
            .get(identifier)
            .is_some_and(|chain| chain.len() == 1);

        self.studio
            .storage()
            .delete(&path)
            .map_err(StudioError::io(&path))?;
        self.studio.refresh();

        Ok(ActionResult::Step(ActionStep::Deleted {
            identifier: identifier.to_string(),
            close_tab: is_last,
        }))
    }
}
