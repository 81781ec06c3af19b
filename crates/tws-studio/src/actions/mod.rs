//! Actions shipped with the studio.

mod custom;
mod variant;

use std::sync::Arc;

pub use self::custom::CreateCustomTemplate;
pub use self::custom::DeleteCustomTemplate;
pub use self::custom::SaveCustomTemplate;
pub use self::variant::CreateVariantTemplate;
pub use self::variant::RenameVariantTemplate;
use crate::action::Action;
use crate::action::ActionProvider;
use crate::studio::TemplateStudio;

/// Identifier groups that support variants.
pub const VARIANT_PREFIXES: &[&str] = &["content_element", "frontend_module"];

pub struct CoreActionProvider {
    studio: Arc<TemplateStudio>,
}

impl CoreActionProvider {
    #[must_use]
    pub fn new(studio: Arc<TemplateStudio>) -> Self {
        Self { studio }
    }
}

impl ActionProvider for CoreActionProvider {
    fn actions(&self) -> Vec<Box<dyn Action>> {
        let mut actions: Vec<Box<dyn Action>> = vec![
            Box::new(SaveCustomTemplate::new(self.studio.clone())),
            Box::new(DeleteCustomTemplate::new(self.studio.clone())),
            Box::new(CreateCustomTemplate::new(self.studio.clone())),
        ];

        for prefix in VARIANT_PREFIXES {
            actions.push(Box::new(CreateVariantTemplate::new(
                self.studio.clone(),
                prefix,
            )));
            actions.push(Box::new(RenameVariantTemplate::new(
                self.studio.clone(),
                prefix,
            )));
        }

        actions
    }
}
