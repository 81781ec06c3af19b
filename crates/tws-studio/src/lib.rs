//! Editing support for custom templates: studio actions, skeletons for new
//! templates, the identifier tree and file-manager move requests.

mod action;
pub mod actions;
mod error;
pub mod filemanager;
mod registry;
mod skeleton;
mod studio;
mod tree;

pub use crate::action::Action;
pub use crate::action::ActionContext;
pub use crate::action::ActionProvider;
pub use crate::action::ActionResult;
pub use crate::action::ActionStep;
pub use crate::actions::CoreActionProvider;
pub use crate::error::StudioError;
pub use crate::registry::ActionRegistry;
pub use crate::skeleton::render_skeleton;
pub use crate::studio::TemplateStudio;
pub use crate::tree::IdentifierTree;
pub use crate::tree::TreeLeaf;
pub use crate::tree::TreeNode;
