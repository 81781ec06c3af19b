//! Compiled template metadata for a set of namespace directories.

use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;
use rayon::prelude::*;
use tws_conf::NamespaceDir;
use tws_conf::Settings;
use tws_inspector::InheritanceChains;
use tws_inspector::MetadataStore;
use tws_inspector::StoreError;
use tws_source::FileSystem;
use tws_templates::TemplateMetadata;
use tws_templates::TemplateName;

use crate::discovery::discover;
use crate::error::WorkspaceError;
use crate::references::resolve_managed_reference;

/// Outcome of [`TemplateWorkspace::warm`].
#[derive(Debug, Default)]
pub struct WarmReport {
    pub compiled: usize,
    pub failed: Vec<WorkspaceError>,
}

/// Discovers templates below the namespace roots and caches their compiled
/// metadata.
///
/// The cache only grows through [`compile`](Self::compile) and
/// [`warm`](Self::warm); [`reset`](Self::reset) drops it together with the
/// discovered chains. Lookups through [`MetadataStore`] never compile.
pub struct TemplateWorkspace {
    fs: Arc<dyn FileSystem>,
    namespaces: Vec<NamespaceDir>,
    managed_namespace: String,
    chains: DashMap<String, Vec<TemplateName>>,
    paths: DashMap<TemplateName, Utf8PathBuf>,
    metadata: DashMap<TemplateName, Arc<TemplateMetadata>>,
}

impl TemplateWorkspace {
    /// Create a workspace and discover its templates. Nothing is compiled yet.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        namespaces: Vec<NamespaceDir>,
        managed_namespace: impl Into<String>,
    ) -> Self {
        let workspace = Self {
            fs,
            namespaces,
            managed_namespace: managed_namespace.into(),
            chains: DashMap::new(),
            paths: DashMap::new(),
            metadata: DashMap::new(),
        };
        workspace.reset();
        workspace
    }

    pub fn from_settings(
        fs: Arc<dyn FileSystem>,
        settings: &Settings,
        project_root: &Utf8Path,
    ) -> Self {
        Self::new(
            fs,
            settings.namespace_roots(project_root),
            settings.managed_namespace.clone(),
        )
    }

    #[must_use]
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceDir] {
        &self.namespaces
    }

    #[must_use]
    pub fn managed_namespace(&self) -> &str {
        &self.managed_namespace
    }

    /// Rediscover templates and forget all compiled metadata.
    pub fn reset(&self) {
        let discovery = discover(self.fs.as_ref(), &self.namespaces);

        self.metadata.clear();
        self.chains.clear();
        self.paths.clear();

        for (identifier, chain) in discovery.chains {
            self.chains.insert(identifier, chain);
        }
        for (name, path) in discovery.paths {
            self.paths.insert(name, path);
        }

        tracing::info!("Template cache reset, {} templates found", self.paths.len());
    }

    /// Compile every discovered template in parallel.
    pub fn warm(&self) -> WarmReport {
        let templates = self.templates();
        let chains = self.inheritance_chains();

        let failed: Vec<WorkspaceError> = templates
            .par_iter()
            .filter_map(|name| self.compile_with(name, &chains).err())
            .collect();

        for err in &failed {
            tracing::warn!("{}", err);
        }

        WarmReport {
            compiled: templates.len() - failed.len(),
            failed,
        }
    }

    /// Compile one template and cache its metadata.
    ///
    /// Managed references in `extends` and `use` are resolved against the
    /// current chains.
    ///
    /// # Errors
    ///
    /// Fails if the template is unknown, unreadable or does not compile.
    pub fn compile(&self, name: &TemplateName) -> Result<Arc<TemplateMetadata>, WorkspaceError> {
        self.compile_with(name, &self.inheritance_chains())
    }

    fn compile_with(
        &self,
        name: &TemplateName,
        chains: &InheritanceChains,
    ) -> Result<Arc<TemplateMetadata>, WorkspaceError> {
        let source = self.source(name)?;

        let mut metadata =
            tws_templates::compile(&source).map_err(|source| WorkspaceError::Compile {
                template: name.clone(),
                source,
            })?;

        let resolve = |reference: &TemplateName| {
            resolve_managed_reference(reference, name, chains, &self.managed_namespace)
        };

        metadata.parent = metadata.parent.as_ref().map(resolve);
        for declaration in &mut metadata.uses {
            declaration.template = resolve(&declaration.template);
        }

        tracing::debug!("Compiled {}", name);

        let metadata = Arc::new(metadata);
        self.metadata.insert(name.clone(), metadata.clone());
        Ok(metadata)
    }

    /// All discovered template names, sorted.
    #[must_use]
    pub fn templates(&self) -> Vec<TemplateName> {
        let mut templates: Vec<TemplateName> =
            self.paths.iter().map(|entry| entry.key().clone()).collect();
        templates.sort();
        templates
    }

    #[must_use]
    pub fn exists(&self, name: &TemplateName) -> bool {
        self.paths.contains_key(name)
    }

    #[must_use]
    pub fn path(&self, name: &TemplateName) -> Option<Utf8PathBuf> {
        self.paths.get(name).map(|entry| entry.value().clone())
    }

    /// # Errors
    ///
    /// Fails if the template is unknown or cannot be read.
    pub fn source(&self, name: &TemplateName) -> Result<String, WorkspaceError> {
        let path = self
            .path(name)
            .ok_or_else(|| WorkspaceError::UnknownTemplate(name.clone()))?;

        self.fs
            .read_to_string(&path)
            .map_err(|source| WorkspaceError::Io { path, source })
    }
}

impl MetadataStore for TemplateWorkspace {
    fn metadata(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, StoreError> {
        self.metadata
            .get(template)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotCompiled(template.clone()))
    }

    fn inheritance_chains(&self) -> InheritanceChains {
        self.chains
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn first(&self, identifier: &str) -> Result<TemplateName, StoreError> {
        self.chains
            .get(identifier)
            .and_then(|chain| chain.first().cloned())
            .ok_or_else(|| StoreError::UnknownIdentifier(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use tws_inspector::BlockType;
    use tws_inspector::Inspector;
    use tws_source::InMemoryFileSystem;
    use tws_source::OsFileSystem;

    use super::*;

    const GLOBAL: &str = "@Contao_Global/content_element/text.html.twig";
    const CORE: &str = "@Contao_CoreBundle/content_element/text.html.twig";
    const FIGURE: &str = "@Contao_CoreBundle/component/_figure.html.twig";

    fn namespaces() -> Vec<NamespaceDir> {
        vec![
            NamespaceDir {
                name: "Contao_Global".to_string(),
                path: "/project/templates".into(),
            },
            NamespaceDir {
                name: "Contao_CoreBundle".to_string(),
                path: "/core/templates".into(),
            },
        ]
    }

    fn fixture() -> (Arc<InMemoryFileSystem>, TemplateWorkspace) {
        let fs = Arc::new(InMemoryFileSystem::new());
        fs.add_file(
            "/core/templates/content_element/text.html.twig",
            "{% use \"@Contao/component/_figure.html.twig\" %}\n\
             {% block content %}{% endblock %}\n\
             {% slot headline %}{% endslot %}",
        );
        fs.add_file(
            "/core/templates/component/_figure.html.twig",
            "{% block figure %}<figure></figure>{% endblock %}",
        );
        fs.add_file(
            "/project/templates/content_element/text.html.twig",
            "{% extends \"@Contao/content_element/text.html.twig\" %}\n\
             {% block content %}{{ parent() }}<p>more</p>{% endblock %}",
        );

        let workspace = TemplateWorkspace::new(fs.clone(), namespaces(), "Contao");
        (fs, workspace)
    }

    mod store {
        use super::*;

        #[test]
        fn test_metadata_requires_compilation() {
            let (_, workspace) = fixture();

            assert_eq!(
                workspace.metadata(&GLOBAL.into()).unwrap_err(),
                StoreError::NotCompiled(GLOBAL.into())
            );

            workspace.compile(&GLOBAL.into()).unwrap();
            assert!(workspace.metadata(&GLOBAL.into()).is_ok());
        }

        #[test]
        fn test_managed_references_are_resolved() {
            let (_, workspace) = fixture();

            let global = workspace.compile(&GLOBAL.into()).unwrap();
            let core = workspace.compile(&CORE.into()).unwrap();

            assert_eq!(global.parent.as_ref().map(TemplateName::as_str), Some(CORE));
            assert_eq!(core.uses[0].template, FIGURE);
        }

        #[test]
        fn test_warm_resolves_managed_references() {
            let (_, workspace) = fixture();
            assert_eq!(workspace.warm().compiled, 3);

            let global = workspace.metadata(&GLOBAL.into()).unwrap();
            let core = workspace.metadata(&CORE.into()).unwrap();

            assert_eq!(global.parent.as_ref().map(TemplateName::as_str), Some(CORE));
            assert_eq!(core.uses[0].template, FIGURE);
        }

        #[test]
        fn test_first() {
            let (_, workspace) = fixture();

            assert_eq!(workspace.first("content_element/text").unwrap(), GLOBAL);
            assert_eq!(
                workspace.first("content_element/image").unwrap_err(),
                StoreError::UnknownIdentifier("content_element/image".to_string())
            );
        }

        #[test]
        fn test_reset_forgets_metadata_and_rediscovers() {
            let (fs, workspace) = fixture();
            assert_eq!(workspace.warm().compiled, 3);

            fs.delete(Utf8Path::new("/project/templates/content_element/text.html.twig"))
                .unwrap();
            workspace.reset();

            assert!(workspace.metadata(&CORE.into()).is_err());
            assert!(!workspace.exists(&GLOBAL.into()));
            assert_eq!(workspace.first("content_element/text").unwrap(), CORE);
        }
    }

    mod compile {
        use super::*;

        #[test]
        fn test_warm_reports_failures() {
            let (fs, workspace) = fixture();
            fs.add_file(
                "/project/templates/content_element/broken.html.twig",
                "{% block content %}",
            );
            workspace.reset();

            let report = workspace.warm();

            assert_eq!(report.compiled, 3);
            assert_eq!(report.failed.len(), 1);
            assert!(matches!(
                &report.failed[0],
                WorkspaceError::Compile { template, .. }
                    if template == "@Contao_Global/content_element/broken.html.twig"
            ));
        }

        #[test]
        fn test_unknown_template() {
            let (_, workspace) = fixture();

            assert!(matches!(
                workspace.compile(&"@Contao_Global/missing.html.twig".into()),
                Err(WorkspaceError::UnknownTemplate(_))
            ));
        }

        #[test]
        fn test_source_and_path() {
            let (_, workspace) = fixture();
            let name = TemplateName::from(FIGURE);

            assert_eq!(
                workspace.path(&name).unwrap(),
                "/core/templates/component/_figure.html.twig"
            );
            assert!(workspace.source(&name).unwrap().contains("<figure>"));
        }
    }

    mod inspection {
        use super::*;

        #[test]
        fn test_inspect_compiled_workspace() {
            let (_, workspace) = fixture();
            workspace.warm();
            let inspector = Inspector::new(&workspace);

            let hierarchy = inspector
                .block_info("@Contao/content_element/text.html.twig", "content")
                .unwrap();
            let visible: Vec<_> = hierarchy
                .visible()
                .map(|c| (c.template_name.as_str(), c.block_type, c.is_prototype))
                .collect();

            assert_eq!(
                visible,
                [
                    (GLOBAL, BlockType::Enhance, false),
                    (CORE, BlockType::Origin, true),
                ]
            );

            let info = inspector
                .inspect_template("@Contao/content_element/text.html.twig")
                .unwrap();
            assert_eq!(info.block_names, ["content", "figure"]);
            assert_eq!(info.slots, ["headline"]);
        }

        #[test]
        fn test_workspace_on_disk() {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            let template = root.join("templates/content_element/text.html.twig");
            std::fs::create_dir_all(template.parent().unwrap()).unwrap();
            std::fs::write(&template, "{% block content %}{% endblock %}").unwrap();

            let workspace = TemplateWorkspace::new(
                Arc::new(OsFileSystem),
                vec![NamespaceDir {
                    name: "Contao_Global".to_string(),
                    path: root.join("templates"),
                }],
                "Contao",
            );

            assert_eq!(workspace.warm().compiled, 1);
            let hierarchy = Inspector::new(&workspace)
                .block_info("@Contao/content_element/text.html.twig", "content")
                .unwrap();
            assert_eq!(hierarchy.origin().unwrap().template_name, GLOBAL);
        }
    }
}
