use std::collections::BTreeMap;
use std::sync::Arc;

use tws_templates::TemplateMetadata;
use tws_templates::TemplateName;

use crate::error::StoreError;
use crate::store::InheritanceChains;
use crate::store::MetadataStore;

/// Hand-filled store for resolver tests.
#[derive(Default)]
pub(crate) struct StaticStore {
    metadata: BTreeMap<TemplateName, Arc<TemplateMetadata>>,
    chains: InheritanceChains,
}

impl StaticStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, name: &str, metadata: TemplateMetadata) -> Self {
        self.metadata.insert(name.into(), Arc::new(metadata));
        self
    }

    pub(crate) fn with_chain(mut self, identifier: &str, names: &[&str]) -> Self {
        self.chains.insert(
            identifier.to_string(),
            names.iter().map(|name| TemplateName::from(*name)).collect(),
        );
        self
    }
}

impl MetadataStore for StaticStore {
    fn metadata(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, StoreError> {
        self.metadata
            .get(template)
            .cloned()
            .ok_or_else(|| StoreError::NotCompiled(template.clone()))
    }

    fn inheritance_chains(&self) -> InheritanceChains {
        self.chains.clone()
    }
}
