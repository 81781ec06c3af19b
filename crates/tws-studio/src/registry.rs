use crate::action::Action;
use crate::action::ActionContext;
use crate::action::ActionProvider;
use crate::action::ActionResult;
use crate::error::StudioError;

/// All actions known to the studio, in registration order.
///
/// Built once from a list of providers and never modified afterwards.
pub struct ActionRegistry {
    actions: Vec<Box<dyn Action>>,
}

impl ActionRegistry {
    /// # Errors
    ///
    /// Returns [`StudioError::DuplicateAction`] if two actions share a name.
    pub fn from_providers(providers: &[&dyn ActionProvider]) -> Result<Self, StudioError> {
        let mut actions: Vec<Box<dyn Action>> = Vec::new();

        for action in providers.iter().flat_map(|provider| provider.actions()) {
            if actions.iter().any(|known| known.name() == action.name()) {
                return Err(StudioError::DuplicateAction(action.name().to_string()));
            }
            actions.push(action);
        }

        Ok(Self { actions })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|action| action.name())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|action| action.name() == name)
            .map(|action| &**action)
    }

    /// Names of the actions that can run in `context`.
    #[must_use]
    pub fn available(&self, context: &ActionContext) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|action| action.can_execute(context))
            .map(|action| action.name())
            .collect()
    }

    /// # Errors
    ///
    /// Fails if the action is unknown, refuses the context or fails itself.
    pub fn execute(&self, name: &str, context: &ActionContext) -> Result<ActionResult, StudioError> {
        let action = self
            .get(name)
            .ok_or_else(|| StudioError::UnknownAction(name.to_string()))?;

        if !action.can_execute(context) {
            return Err(StudioError::NotExecutable {
                action: name.to_string(),
                identifier: context.get("identifier").unwrap_or_default().to_string(),
            });
        }

        tracing::info!("Executing studio action {}", name);
        action.execute(context)
    }
}
