use camino::Utf8PathBuf;
use thiserror::Error;
use tws_templates::TemplateError;
use tws_templates::TemplateName;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Unknown template '{0}'")]
    UnknownTemplate(TemplateName),

    #[error("Failed to read '{path}'")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile '{template}': {source}")]
    Compile {
        template: TemplateName,
        #[source]
        source: TemplateError,
    },
}
