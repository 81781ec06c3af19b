mod discovery;
mod error;
mod references;
mod workspace;

pub use crate::discovery::discover;
pub use crate::discovery::Discovery;
pub use crate::error::WorkspaceError;
pub use crate::references::resolve_managed_reference;
pub use crate::workspace::TemplateWorkspace;
pub use crate::workspace::WarmReport;
