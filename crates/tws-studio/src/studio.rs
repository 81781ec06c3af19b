use std::sync::Arc;

use camino::Utf8Path;
use tws_inspector::Inspector;
use tws_inspector::MetadataStore;
use tws_source::FileSystem;
use tws_templates::TemplateName;
use tws_workspace::TemplateWorkspace;

use crate::error::StudioError;
use crate::skeleton::render_skeleton;
use crate::tree::IdentifierTree;

/// Shared state of the studio actions: the template workspace and the
/// storage backing the custom namespace.
pub struct TemplateStudio {
    workspace: Arc<TemplateWorkspace>,
    storage: Arc<dyn FileSystem>,
    custom_namespace: String,
}

impl TemplateStudio {
    /// `storage` takes paths relative to the custom namespace root.
    pub fn new(
        workspace: Arc<TemplateWorkspace>,
        storage: Arc<dyn FileSystem>,
        custom_namespace: impl Into<String>,
    ) -> Self {
        Self {
            workspace,
            storage,
            custom_namespace: custom_namespace.into(),
        }
    }

    #[must_use]
    pub fn workspace(&self) -> &TemplateWorkspace {
        &self.workspace
    }

    #[must_use]
    pub fn storage(&self) -> &dyn FileSystem {
        self.storage.as_ref()
    }

    #[must_use]
    pub fn custom_namespace(&self) -> &str {
        &self.custom_namespace
    }

    #[must_use]
    pub fn inspector(&self) -> Inspector<&TemplateWorkspace> {
        Inspector::with_managed_namespace(
            self.workspace.as_ref(),
            self.workspace.managed_namespace(),
        )
    }

    /// # Errors
    ///
    /// Fails for unknown identifiers.
    pub fn first(&self, identifier: &str) -> Result<TemplateName, StudioError> {
        Ok(self.workspace.first(identifier)?)
    }

    /// Extension (`html.twig`, ...) of the highest precedence template.
    ///
    /// # Errors
    ///
    /// Fails for unknown identifiers.
    pub fn extension(&self, identifier: &str) -> Result<String, StudioError> {
        let first = self.first(identifier)?;
        first
            .extension()
            .map(ToString::to_string)
            .ok_or_else(|| StudioError::MissingExtension(first.to_string()))
    }

    /// Whether the highest precedence template lives in the custom namespace.
    #[must_use]
    pub fn is_custom(&self, identifier: &str) -> bool {
        self.workspace
            .first(identifier)
            .is_ok_and(|first| first.namespace() == Some(self.custom_namespace.as_str()))
    }

    /// Identifiers starting with `prefix/`.
    #[must_use]
    pub fn identifiers_below(&self, prefix: &str) -> Vec<String> {
        let prefix = format!("{prefix}/");
        self.workspace
            .inheritance_chains()
            .into_keys()
            .filter(|identifier| identifier.starts_with(&prefix))
            .collect()
    }

    /// Skeleton for a new template building on `identifier`.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is unknown or cannot be inspected.
    pub fn skeleton(&self, identifier: &str) -> Result<String, StudioError> {
        let extension = self.extension(identifier)?;
        let base = TemplateName::namespaced(
            self.workspace.managed_namespace(),
            &format!("{identifier}.{extension}"),
        );

        let info = self.inspector().inspect_template(base.as_str())?;
        Ok(render_skeleton(&base, &info))
    }

    /// Write a file to the custom storage, creating its directory.
    ///
    /// # Errors
    ///
    /// Fails if the storage rejects the write.
    pub fn write(&self, path: &Utf8Path, content: &str) -> Result<(), StudioError> {
        if let Some(directory) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            if !self.storage.is_directory(directory) {
                self.storage
                    .create_directory(directory)
                    .map_err(StudioError::io(directory))?;
            }
        }

        self.storage
            .write(path, content)
            .map_err(StudioError::io(path))
    }

    /// Rediscover and recompile after the custom storage changed.
    pub fn refresh(&self) {
        self.workspace.reset();
        let report = self.workspace.warm();
        tracing::debug!(
            "Recompiled {} templates, {} failed",
            report.compiled,
            report.failed.len()
        );
    }

    #[must_use]
    pub fn tree(&self) -> IdentifierTree {
        let chains = self.workspace.inheritance_chains();

        let entries: Vec<(&str, bool)> = chains
            .iter()
            .map(|(identifier, chain)| {
                let has_user_template = chain
                    .iter()
                    .any(|name| name.namespace() == Some(self.custom_namespace.as_str()));
                (identifier.as_str(), has_user_template)
            })
            .collect();

        IdentifierTree::build(entries)
    }
}
