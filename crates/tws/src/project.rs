use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use tws_conf::Settings;
use tws_inspector::Inspector;
use tws_source::FileSystem;
use tws_source::OsFileSystem;
use tws_source::ScopedFileSystem;
use tws_studio::TemplateStudio;
use tws_workspace::TemplateWorkspace;

/// A loaded project: settings plus a compiled template workspace.
pub struct Project {
    pub root: Utf8PathBuf,
    pub settings: Settings,
    pub workspace: Arc<TemplateWorkspace>,
    fs: Arc<dyn FileSystem>,
}

impl Project {
    pub fn load(root: Utf8PathBuf, settings: Settings) -> Result<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem);
        let workspace = Arc::new(TemplateWorkspace::from_settings(
            fs.clone(),
            &settings,
            &root,
        ));

        let report = workspace.warm();
        tracing::info!(
            "Compiled {} templates ({} failed)",
            report.compiled,
            report.failed.len()
        );

        Ok(Self {
            root,
            settings,
            workspace,
            fs,
        })
    }

    pub fn inspector(&self) -> Inspector<&TemplateWorkspace> {
        Inspector::with_managed_namespace(
            self.workspace.as_ref(),
            self.settings.managed_namespace.clone(),
        )
    }

    pub fn studio(&self) -> Result<Arc<TemplateStudio>> {
        let custom_root = self
            .settings
            .custom_root(&self.root)
            .context("No directory is configured for the custom namespace")?;

        let storage = Arc::new(ScopedFileSystem::new(custom_root, self.fs.clone()));

        Ok(Arc::new(TemplateStudio::new(
            self.workspace.clone(),
            storage,
            self.settings.custom_namespace.clone(),
        )))
    }
}
