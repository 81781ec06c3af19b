use std::sync::Arc;

use camino::Utf8PathBuf;

use crate::action::Action;
use crate::action::ActionContext;
use crate::action::ActionResult;
use crate::action::ActionStep;
use crate::error::StudioError;
use crate::studio::TemplateStudio;

/// Segments of a variant name: ASCII alphanumerics, `_` and `-`.
fn is_valid_variant_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

/// `<prefix>/<name>` without further segments.
fn is_base_identifier(prefix: &str, identifier: &str) -> bool {
    identifier
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| !name.is_empty() && !name.contains('/'))
}

/// Split `<prefix>/<base>/<variant>` into `(<prefix>/<base>, <variant>)`.
fn split_variant<'a>(prefix: &str, identifier: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = identifier.strip_prefix(prefix)?.strip_prefix('/')?;
    let (base, variant) = rest.split_once('/')?;
    if base.is_empty() || variant.is_empty() {
        return None;
    }
    let split = prefix.len() + 1 + base.len();
    Some((&identifier[..split], variant))
}

/// Names of the variants that already exist below `base_identifier`.
fn taken_names(studio: &TemplateStudio, base_identifier: &str) -> Vec<String> {
    studio
        .identifiers_below(base_identifier)
        .into_iter()
        .map(|identifier| identifier[base_identifier.len() + 1..].to_string())
        .collect()
}

/// Create a new variant `<identifier>/<name>` of a base template.
pub struct CreateVariantTemplate {
    studio: Arc<TemplateStudio>,
    prefix: String,
    name: String,
}

impl CreateVariantTemplate {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>, prefix: &str) -> Self {
        Self {
            studio,
            prefix: prefix.to_string(),
            name: format!("create_{prefix}_variant_template"),
        }
    }
}

impl Action for CreateVariantTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_execute(&self, context: &ActionContext) -> bool {
        context
            .identifier()
            .is_ok_and(|identifier| is_base_identifier(&self.prefix, identifier))
    }

    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let identifier = context.identifier()?;
        let extension = self.studio.extension(identifier)?;

        let Some(name) = context.get("name") else {
            return Ok(ActionResult::Step(ActionStep::ChooseName {
                identifier: identifier.to_string(),
                action: self.name.clone(),
                base_identifier: identifier.to_string(),
                current_name: None,
                extension,
                taken: taken_names(&self.studio, identifier),
            }));
        };

        if !is_valid_variant_name(name) {
            return Ok(ActionResult::error("The given name is not valid."));
        }

        let path = Utf8PathBuf::from(format!("{identifier}/{name}.{extension}"));
        if self.studio.storage().exists(&path) {
            return Ok(ActionResult::error("The given name already exists."));
        }

        let content = self.studio.skeleton(identifier)?;
        self.studio.write(&path, &content)?;
        self.studio.refresh();

        Ok(ActionResult::success("The new variant was created."))
    }
}

/// Rename a custom variant within its base identifier.
pub struct RenameVariantTemplate {
    studio: Arc<TemplateStudio>,
    prefix: String,
    name: String,
}

impl RenameVariantTemplate {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>, prefix: &str) -> Self {
        Self {
            studio,
            prefix: prefix.to_string(),
            name: format!("rename_{prefix}_variant_template"),
        }
    }
}

impl Action for RenameVariantTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_execute(&self, context: &ActionContext) -> bool {
        context
            .identifier()
            .is_ok_and(|identifier| split_variant(&self.prefix, identifier).is_some())
    }

    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let identifier = context.identifier()?;
        let (base_identifier, current_name) = split_variant(&self.prefix, identifier)
            .ok_or_else(|| StudioError::NotExecutable {
                action: self.name.clone(),
                identifier: identifier.to_string(),
            })?;
        let extension = self.studio.extension(identifier)?;

        let Some(name) = context.get("name") else {
            let taken = taken_names(&self.studio, base_identifier)
                .into_iter()
                .filter(|taken| taken != current_name)
                .collect();

            return Ok(ActionResult::Step(ActionStep::ChooseName {
                identifier: identifier.to_string(),
                action: self.name.clone(),
                base_identifier: base_identifier.to_string(),
                current_name: Some(current_name.to_string()),
                extension,
                taken,
            }));
        };

        if !is_valid_variant_name(name) {
            return Ok(ActionResult::error("The given name is not valid."));
        }

        let from = Utf8PathBuf::from(format!("{identifier}.{extension}"));
        let to = Utf8PathBuf::from(format!("{base_identifier}/{name}.{extension}"));

        if !self.studio.storage().is_file(&from) {
            return Err(StudioError::NoCustomTemplate(identifier.to_string()));
        }
        if self.studio.storage().exists(&to) {
            return Ok(ActionResult::error("The given name already exists."));
        }

        self.studio
            .storage()
            .rename(&from, &to)
            .map_err(StudioError::io(&from))?;
        self.studio.refresh();

        Ok(ActionResult::success("The variant template was renamed."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names() {
        assert!(is_valid_variant_name("highlight"));
        assert!(is_valid_variant_name("special/red-box_2"));
        assert!(!is_valid_variant_name(""));
        assert!(!is_valid_variant_name("../escape"));
        assert!(!is_valid_variant_name("a//b"));
        assert!(!is_valid_variant_name("with space"));
    }

    #[test]
    fn test_identifier_shapes() {
        assert!(is_base_identifier("content_element", "content_element/text"));
        assert!(!is_base_identifier("content_element", "content_element/text/highlight"));
        assert!(!is_base_identifier("content_element", "content_elements/text"));
        assert!(!is_base_identifier("content_element", "content_element/"));

        assert_eq!(
            split_variant("content_element", "content_element/text/highlight/red"),
            Some(("content_element/text", "highlight/red"))
        );
        assert_eq!(split_variant("content_element", "content_element/text"), None);
        assert_eq!(split_variant("frontend_module", "content_element/text/a"), None);
    }
}
