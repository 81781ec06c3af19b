use camino::Utf8Path;
use camino::Utf8PathBuf;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Namespace '{0}' is configured more than once")]
    DuplicateNamespace(String),
    #[error("Custom template namespace '{0}' has no configured directory")]
    MissingCustomNamespace(String),
}

/// A template directory registered under a namespace.
///
/// Namespaces are listed in precedence order: templates from earlier
/// entries win over templates with the same identifier from later ones.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NamespaceDir {
    pub name: String,
    pub path: Utf8PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    /// Namespace that resolves to the first template of a chain
    /// (`@Contao/...`).
    pub managed_namespace: String,
    /// Namespace holding user-editable templates.
    pub custom_namespace: String,
    pub namespaces: Vec<NamespaceDir>,
    pub log_dir: Option<Utf8PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            managed_namespace: "Contao".to_string(),
            custom_namespace: "Contao_Global".to_string(),
            namespaces: vec![NamespaceDir {
                name: "Contao_Global".to_string(),
                path: Utf8PathBuf::from("templates"),
            }],
            log_dir: None,
        }
    }
}

#[must_use]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "twig-studio", "tws")
}

impl Settings {
    pub fn new(project_root: &Utf8Path) -> Result<Self, ConfigError> {
        let user_config_file = project_dirs()
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.config_dir().join("tws.toml")).ok());

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    fn load_from_paths(
        project_root: &Utf8Path,
        user_config_path: Option<&Utf8Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(
                File::from(path.as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            File::from(project_root.join(".tws.toml").as_std_path())
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("tws.toml").as_std_path())
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(Environment::with_prefix("TWS").try_parsing(true));

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            "Loaded settings with {} namespace(s) from {}",
            settings.namespaces.len(),
            project_root
        );

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::with_capacity(self.namespaces.len());
        for namespace in &self.namespaces {
            if seen.contains(&namespace.name.as_str()) {
                return Err(ConfigError::DuplicateNamespace(namespace.name.clone()));
            }
            seen.push(namespace.name.as_str());
        }

        if !seen.contains(&self.custom_namespace.as_str()) {
            return Err(ConfigError::MissingCustomNamespace(
                self.custom_namespace.clone(),
            ));
        }

        Ok(())
    }

    /// Namespace directories with relative paths resolved against
    /// `project_root`, in precedence order.
    #[must_use]
    pub fn namespace_roots(&self, project_root: &Utf8Path) -> Vec<NamespaceDir> {
        self.namespaces
            .iter()
            .map(|namespace| NamespaceDir {
                name: namespace.name.clone(),
                path: if namespace.path.is_relative() {
                    project_root.join(&namespace.path)
                } else {
                    namespace.path.clone()
                },
            })
            .collect()
    }

    /// Directory backing the custom template namespace.
    #[must_use]
    pub fn custom_root(&self, project_root: &Utf8Path) -> Option<Utf8PathBuf> {
        self.namespace_roots(project_root)
            .into_iter()
            .find(|namespace| namespace.name == self.custom_namespace)
            .map(|namespace| namespace.path)
    }
}
