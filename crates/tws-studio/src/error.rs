use camino::Utf8PathBuf;
use thiserror::Error;
use tws_inspector::InspectionError;
use tws_inspector::StoreError;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Action '{0}' is registered more than once")]
    DuplicateAction(String),

    #[error("Action '{action}' cannot be executed for '{identifier}'")]
    NotExecutable { action: String, identifier: String },

    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("There is no custom template for identifier '{0}'")]
    NoCustomTemplate(String),

    #[error("Template '{0}' has no file extension")]
    MissingExtension(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to access '{path}'")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Inspection(#[from] InspectionError),
}

impl StudioError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
