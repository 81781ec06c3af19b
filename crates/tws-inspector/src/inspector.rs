use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tws_templates::names::identifier;
use tws_templates::names::parse_template_name;
use tws_templates::TemplateMetadata;
use tws_templates::TemplateName;
use tws_templates::UseDeclaration;

use crate::error::InspectionError;
use crate::hierarchy::resolve;
use crate::hierarchy::BlockHierarchy;
use crate::store::MetadataStore;

pub const DEFAULT_MANAGED_NAMESPACE: &str = "Contao";

/// Summary of a single template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateInformation {
    pub name: TemplateName,
    /// Blocks the template can render: its own, imported ones under their
    /// local names, and inherited ones.
    pub block_names: Vec<String>,
    /// Slots of the template and all statically known ancestors.
    pub slots: Vec<String>,
    pub extends: Option<TemplateName>,
    pub uses: Vec<UseDeclaration>,
}

/// Answers questions about compiled templates.
///
/// Holds no state besides the injected store, so one inspector can serve
/// concurrent requests.
pub struct Inspector<S> {
    store: S,
    managed_namespace: String,
}

impl<S: MetadataStore> Inspector<S> {
    pub fn new(store: S) -> Self {
        Self::with_managed_namespace(store, DEFAULT_MANAGED_NAMESPACE)
    }

    pub fn with_managed_namespace(store: S, managed_namespace: impl Into<String>) -> Self {
        Self {
            store,
            managed_namespace: managed_namespace.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolution hierarchy of `block` as seen from `base`.
    ///
    /// # Errors
    ///
    /// Fails if any template along the way has no metadata, if no template
    /// defines the block, or if the `extends` chain loops.
    pub fn block_hierarchy(
        &self,
        base: &TemplateName,
        block: &str,
    ) -> Result<BlockHierarchy, InspectionError> {
        resolve(&self.store, base, block)
    }

    /// Like [`Inspector::block_hierarchy`] but accepts managed names.
    ///
    /// # Errors
    ///
    /// See [`Inspector::resolve_name`] and [`Inspector::block_hierarchy`].
    pub fn block_info(&self, name: &str, block: &str) -> Result<BlockHierarchy, InspectionError> {
        let template = self.resolve_name(name)?;
        self.block_hierarchy(&template, block)
    }

    /// Map a managed name (`@Contao/...`) to the highest precedence
    /// implementation. Other names are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionError::InvalidName`] for names without an
    /// identifier in the managed namespace and propagates
    /// [`StoreError::UnknownIdentifier`](crate::StoreError::UnknownIdentifier).
    pub fn resolve_name(&self, name: &str) -> Result<TemplateName, InspectionError> {
        let parsed =
            parse_template_name(name).ok_or_else(|| InspectionError::InvalidName(name.into()))?;

        if parsed.namespace != Some(self.managed_namespace.as_str()) {
            return Ok(TemplateName::from(name));
        }

        let identifier = identifier(name)
            .ok_or_else(|| InspectionError::InvalidName(name.into()))?;

        Ok(self.store.first(identifier)?)
    }

    /// # Errors
    ///
    /// Fails if the template or one of its ancestors/imports has no metadata.
    pub fn inspect_template(&self, name: &str) -> Result<TemplateInformation, InspectionError> {
        let name = self.resolve_name(name)?;
        let data = self.fetch(&name)?;

        let mut block_names = BTreeSet::new();
        let mut slots = data.slots.clone();

        let mut ancestors: FxHashSet<TemplateName> = FxHashSet::default();
        ancestors.insert(name.clone());

        let mut current = data.clone();
        loop {
            block_names.extend(self.available_blocks(&current)?);

            let Some(parent) = current.parent.clone() else {
                break;
            };
            if !ancestors.insert(parent.clone()) {
                return Err(InspectionError::CyclicInheritance { template: parent });
            }

            current = self.fetch(&parent)?;
            slots.extend(current.slots.iter().cloned());
        }

        Ok(TemplateInformation {
            name,
            block_names: block_names.into_iter().collect(),
            slots: slots.into_iter().collect(),
            extends: data.parent.clone(),
            uses: data.uses.clone(),
        })
    }

    /// Own blocks plus everything reachable through `uses`, renamed the way
    /// each importer sees them.
    fn available_blocks(
        &self,
        metadata: &TemplateMetadata,
    ) -> Result<BTreeSet<String>, InspectionError> {
        let mut names: BTreeSet<String> = metadata.block_names().map(ToString::to_string).collect();
        let mut visiting = FxHashSet::default();

        for declaration in &metadata.uses {
            for imported in self.imported_blocks(declaration, &mut visiting)? {
                names.insert(declaration.imported_name(&imported).to_string());
            }
        }

        Ok(names)
    }

    fn imported_blocks(
        &self,
        declaration: &UseDeclaration,
        visiting: &mut FxHashSet<TemplateName>,
    ) -> Result<BTreeSet<String>, InspectionError> {
        if !visiting.insert(declaration.template.clone()) {
            return Ok(BTreeSet::new());
        }

        let data = self.fetch(&declaration.template)?;
        let mut names: BTreeSet<String> = data.block_names().map(ToString::to_string).collect();

        for nested in &data.uses {
            for imported in self.imported_blocks(nested, visiting)? {
                names.insert(nested.imported_name(&imported).to_string());
            }
        }

        visiting.remove(&declaration.template);
        Ok(names)
    }

    fn fetch(&self, template: &TemplateName) -> Result<Arc<TemplateMetadata>, InspectionError> {
        self.store
            .metadata(template)
            .map_err(|err| InspectionError::metadata(template, err))
    }
}
