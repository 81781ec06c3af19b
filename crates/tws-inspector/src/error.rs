use thiserror::Error;
use tws_templates::TemplateName;

/// Failures raised by a [`MetadataStore`](crate::MetadataStore).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No metadata was recorded for '{0}'; the template has not been compiled")]
    NotCompiled(TemplateName),

    #[error("Unknown template identifier '{0}'")]
    UnknownIdentifier(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InspectionError {
    /// Fetching metadata for `template` failed, aborting the whole resolution.
    #[error("Could not retrieve information about '{template}'")]
    Metadata {
        template: TemplateName,
        #[source]
        source: StoreError,
    },

    /// No template in the hierarchy defines the block.
    #[error("Block '{block}' is not defined anywhere in the hierarchy of '{template}'")]
    NoOriginFound { template: TemplateName, block: String },

    #[error("'{template}' takes part in an inheritance cycle")]
    CyclicInheritance { template: TemplateName },

    #[error("'{0}' is not a valid template name")]
    InvalidName(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InspectionError {
    pub(crate) fn metadata(template: &TemplateName, source: StoreError) -> Self {
        Self::Metadata {
            template: template.clone(),
            source,
        }
    }

    /// Whether rebuilding the template cache could make this error go away.
    #[must_use]
    pub fn is_stale_cache(&self) -> bool {
        matches!(
            self,
            Self::Metadata { .. } | Self::Store(StoreError::UnknownIdentifier(_))
        )
    }
}
