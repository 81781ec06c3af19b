use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::StudioError;

/// Parameters an action is invoked with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionContext {
    parameters: BTreeMap<String, String>,
}

impl ActionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for an action on `identifier`.
    #[must_use]
    pub fn for_identifier(identifier: &str) -> Self {
        Self::new().with("identifier", identifier)
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.parameters.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// # Errors
    ///
    /// Returns [`StudioError::MissingParameter`] if no identifier was given.
    pub fn identifier(&self) -> Result<&str, StudioError> {
        self.get("identifier")
            .ok_or(StudioError::MissingParameter("identifier"))
    }
}

/// Follow-up an action asks the caller to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ActionStep {
    /// Ask before deleting; re-run the action with `confirm` set.
    ConfirmDelete { identifier: String, action: String },
    Deleted { identifier: String, close_tab: bool },
    Saved { identifier: String },
    /// Ask for a name; re-run the action with `name` set.
    ChooseName {
        identifier: String,
        action: String,
        base_identifier: String,
        current_name: Option<String>,
        extension: String,
        taken: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionResult {
    Success { message: String },
    Error { message: String },
    Step(ActionStep),
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// `None` while the action waits for another step.
    #[must_use]
    pub fn is_successful(&self) -> Option<bool> {
        match self {
            Self::Success { .. } => Some(true),
            Self::Error { .. } => Some(false),
            Self::Step(_) => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message } | Self::Error { message } => Some(message),
            Self::Step(_) => None,
        }
    }
}

/// An operation the studio can run against a template identifier.
pub trait Action: Send + Sync {
    /// Unique name the action is registered and invoked under.
    fn name(&self) -> &str;

    fn can_execute(&self, context: &ActionContext) -> bool;

    /// # Errors
    ///
    /// Fails if the context lacks parameters or storage access fails.
    /// Expected refusals (a name that is already taken) are
    /// [`ActionResult::Error`] instead.
    fn execute(&self, context: &ActionContext) -> Result<ActionResult, StudioError>;
}

pub trait ActionProvider {
    fn actions(&self) -> Vec<Box<dyn Action>>;
}
