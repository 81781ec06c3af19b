use serde::Serialize;
use tws_templates::OverrideFlags;
use tws_templates::TemplateName;

/// How a template takes part in resolving a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// The most generic definition; the block's content source.
    Origin,
    /// Replaces the inherited content without rendering it.
    Overwrite,
    /// Replaces the inherited content and renders it via `parent()`.
    Enhance,
    /// Not defined at this level.
    Transparent,
}

impl BlockType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Overwrite => "overwrite",
            Self::Enhance => "enhance",
            Self::Transparent => "transparent",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a block definition. [`BlockType::Origin`] is never produced here;
/// the resolver assigns it once the whole hierarchy is known.
#[must_use]
pub fn classify(flags: Option<OverrideFlags>) -> BlockType {
    match flags {
        None => BlockType::Transparent,
        Some(flags) if flags.uses_parent_call => BlockType::Enhance,
        Some(_) => BlockType::Overwrite,
    }
}

/// One template's part in resolving a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockContribution {
    pub template_name: TemplateName,
    /// The block name as seen from the inspected template.
    pub block_name: String,
    pub block_type: BlockType,
    pub is_prototype: bool,
    pub is_target: bool,
    /// A more specific overwrite masks this definition.
    pub is_shadowed: bool,
    /// This overwrite discards content defined further down the hierarchy.
    pub has_warning: bool,
}

impl BlockContribution {
    pub(crate) fn new(template: &TemplateName, block: &str, flags: Option<OverrideFlags>) -> Self {
        Self {
            template_name: template.clone(),
            block_name: block.to_string(),
            block_type: classify(flags),
            is_prototype: flags.is_some_and(|flags| flags.is_prototype),
            is_target: false,
            is_shadowed: false,
            has_warning: false,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.block_type != BlockType::Transparent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(uses_parent_call: bool, is_prototype: bool) -> Option<OverrideFlags> {
        Some(OverrideFlags {
            uses_parent_call,
            is_prototype,
        })
    }

    #[test]
    fn test_classify_is_total() {
        assert_eq!(classify(None), BlockType::Transparent);
        assert_eq!(classify(flags(true, false)), BlockType::Enhance);
        assert_eq!(classify(flags(true, true)), BlockType::Enhance);
        assert_eq!(classify(flags(false, false)), BlockType::Overwrite);
        assert_eq!(classify(flags(false, true)), BlockType::Overwrite);
    }

    #[test]
    fn test_contribution_keeps_prototype_flag() {
        let name = TemplateName::from("@Contao/a.html.twig");

        let contribution = BlockContribution::new(&name, "main", flags(false, true));
        assert!(contribution.is_prototype);
        assert_eq!(contribution.block_type, BlockType::Overwrite);

        let contribution = BlockContribution::new(&name, "main", None);
        assert!(!contribution.is_prototype);
        assert!(!contribution.is_visible());
    }

    #[test]
    fn test_block_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BlockType::Transparent).unwrap(),
            "\"transparent\""
        );
    }
}
