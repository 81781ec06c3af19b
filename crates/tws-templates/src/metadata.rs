use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::names::TemplateName;

/// How a block definition relates to the content it replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideFlags {
    /// The block body renders the replaced content via `parent()`.
    pub uses_parent_call: bool,
    /// The block is an empty placeholder meant to be filled elsewhere.
    pub is_prototype: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    pub flags: OverrideFlags,
}

/// A `{% use %}` import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UseDeclaration {
    pub template: TemplateName,
    /// Block name inside the used template -> name under which the importing
    /// template sees it (`{% use "x" with content as body %}`).
    pub renames: BTreeMap<String, String>,
}

impl UseDeclaration {
    #[must_use]
    pub fn new(template: impl Into<TemplateName>) -> Self {
        Self {
            template: template.into(),
            renames: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_rename(mut self, used: &str, local: &str) -> Self {
        self.renames.insert(used.to_string(), local.to_string());
        self
    }

    /// Name under which the importer sees `block` from the used template.
    #[must_use]
    pub fn imported_name<'a>(&'a self, block: &'a str) -> &'a str {
        self.renames.get(block).map_or(block, String::as_str)
    }
}

/// Everything the inspector needs to know about one compiled template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Blocks in definition order.
    pub blocks: Vec<BlockDefinition>,
    /// Target of `{% extends %}` when it is statically known.
    pub parent: Option<TemplateName>,
    /// `{% use %}` imports in declaration order.
    pub uses: Vec<UseDeclaration>,
    pub slots: BTreeSet<String>,
}

impl TemplateMetadata {
    #[must_use]
    pub fn block(&self, name: &str) -> Option<OverrideFlags> {
        self.blocks
            .iter()
            .find(|block| block.name == name)
            .map(|block| block.flags)
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.name.as_str())
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<TemplateName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_block(mut self, name: &str, uses_parent_call: bool, is_prototype: bool) -> Self {
        self.blocks.push(BlockDefinition {
            name: name.to_string(),
            flags: OverrideFlags {
                uses_parent_call,
                is_prototype,
            },
        });
        self
    }

    #[must_use]
    pub fn with_use(mut self, declaration: UseDeclaration) -> Self {
        self.uses.push(declaration);
        self
    }

    #[must_use]
    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slots.insert(slot.to_string());
        self
    }
}
