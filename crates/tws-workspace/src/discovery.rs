use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use tws_conf::NamespaceDir;
use tws_inspector::InheritanceChains;
use tws_source::FileSystem;
use tws_templates::TemplateName;

const TWIG_EXTENSION: &str = "twig";

/// Templates found below the namespace roots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub chains: InheritanceChains,
    pub paths: BTreeMap<TemplateName, Utf8PathBuf>,
}

/// Walk every namespace root and collect `*.twig` files.
///
/// `namespaces` is in precedence order; chains list templates of earlier
/// namespaces first, then by path. Files without a valid identifier are
/// skipped.
pub fn discover(fs: &dyn FileSystem, namespaces: &[NamespaceDir]) -> Discovery {
    let mut discovery = Discovery::default();

    for namespace in namespaces {
        let files = match fs.walk_files(&namespace.path) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!("Failed to list templates in {}: {}", namespace.path, err);
                continue;
            }
        };

        for path in files {
            if path.extension() != Some(TWIG_EXTENSION) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&namespace.path) else {
                continue;
            };

            let name = TemplateName::namespaced(&namespace.name, relative.as_str());
            let Some(identifier) = name.identifier() else {
                tracing::debug!("Skipping {}: no template identifier", name);
                continue;
            };

            discovery
                .chains
                .entry(identifier.to_string())
                .or_default()
                .push(name.clone());
            discovery.paths.insert(name, path);
        }
    }

    tracing::debug!(
        "Discovered {} templates for {} identifiers",
        discovery.paths.len(),
        discovery.chains.len()
    );

    discovery
}
