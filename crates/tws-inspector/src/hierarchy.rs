use rustc_hash::FxHashSet;
use serde::Serialize;
use tws_templates::TemplateName;
use tws_templates::UseDeclaration;

use crate::block::BlockContribution;
use crate::block::BlockType;
use crate::error::InspectionError;
use crate::store::MetadataStore;

/// Every template taking part in resolving one block, most specific first.
///
/// The list keeps transparent entries so callers can see where the inspected
/// template sits even when it does not define the block itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockHierarchy {
    template: TemplateName,
    block: String,
    contributions: Vec<BlockContribution>,
}

impl BlockHierarchy {
    #[must_use]
    pub fn template(&self) -> &TemplateName {
        &self.template
    }

    #[must_use]
    pub fn block(&self) -> &str {
        &self.block
    }

    /// All annotated contributions, transparent ones included.
    #[must_use]
    pub fn contributions(&self) -> &[BlockContribution] {
        &self.contributions
    }

    /// Contributions that define the block.
    pub fn visible(&self) -> impl Iterator<Item = &BlockContribution> {
        self.contributions.iter().filter(|c| c.is_visible())
    }

    #[must_use]
    pub fn into_visible(self) -> Vec<BlockContribution> {
        self.contributions
            .into_iter()
            .filter(BlockContribution::is_visible)
            .collect()
    }

    #[must_use]
    pub fn target(&self) -> Option<&BlockContribution> {
        self.contributions.iter().find(|c| c.is_target)
    }

    /// The origin is always the last contribution.
    #[must_use]
    pub fn origin(&self) -> Option<&BlockContribution> {
        self.contributions
            .last()
            .filter(|c| c.block_type == BlockType::Origin)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.contributions.iter().any(|c| c.has_warning)
    }
}

/// Resolve `block` starting at `base`.
///
/// Walks the `use` graph (last declared import first), then the `extends`
/// chain, then annotates the collected contributions.
pub(crate) fn resolve<S: MetadataStore + ?Sized>(
    store: &S,
    base: &TemplateName,
    block: &str,
) -> Result<BlockHierarchy, InspectionError> {
    let fetch = |template: &TemplateName| {
        store
            .metadata(template)
            .map_err(|err| InspectionError::metadata(template, err))
    };

    let data = fetch(base)?;
    let mut contributions = vec![BlockContribution::new(base, block, data.block(block))];

    // Each entry carries the templates on its import path; a template that
    // imports one of its importers is not followed again.
    let root_path: FxHashSet<TemplateName> = std::iter::once(base.clone()).collect();
    let mut queue: Vec<(UseDeclaration, FxHashSet<TemplateName>)> = data
        .uses
        .iter()
        .map(|declaration| (declaration.clone(), root_path.clone()))
        .collect();

    while let Some((declaration, mut path)) = queue.pop() {
        if path.contains(&declaration.template) {
            continue;
        }

        let used = fetch(&declaration.template)?;
        for definition in &used.blocks {
            if declaration.imported_name(&definition.name) == block {
                contributions.push(BlockContribution::new(
                    &declaration.template,
                    block,
                    Some(definition.flags),
                ));
            }
        }

        path.insert(declaration.template.clone());
        queue.extend(
            used.uses
                .iter()
                .map(|nested| (nested.clone(), path.clone())),
        );
    }

    let mut ancestors: FxHashSet<TemplateName> = FxHashSet::default();
    ancestors.insert(base.clone());

    let mut current = data;
    while let Some(parent) = current.parent.clone() {
        if !ancestors.insert(parent.clone()) {
            return Err(InspectionError::CyclicInheritance { template: parent });
        }

        current = fetch(&parent)?;
        contributions.push(BlockContribution::new(&parent, block, current.block(block)));
    }

    mark_origin(&mut contributions).ok_or_else(|| InspectionError::NoOriginFound {
        template: base.clone(),
        block: block.to_string(),
    })?;

    if let Some(target) = contributions.iter_mut().find(|c| c.template_name == *base) {
        target.is_target = true;
    }

    mark_shadowed(&mut contributions);

    tracing::debug!(
        template = %base,
        block,
        contributions = contributions.len(),
        "Resolved block hierarchy"
    );

    Ok(BlockHierarchy {
        template: base.clone(),
        block: block.to_string(),
        contributions,
    })
}

/// Re-tag the last defining contribution as origin and drop everything after it.
fn mark_origin(contributions: &mut Vec<BlockContribution>) -> Option<()> {
    let index = contributions.iter().rposition(BlockContribution::is_visible)?;

    contributions.truncate(index + 1);
    contributions[index].block_type = BlockType::Origin;

    Some(())
}

fn mark_shadowed(contributions: &mut [BlockContribution]) {
    let mut shadowed = false;
    let mut last_overwrite: Option<usize> = None;

    for index in 0..contributions.len() {
        if contributions[index].block_type == BlockType::Overwrite {
            if let Some(previous) = last_overwrite {
                contributions[previous].has_warning = true;
                contributions[index].is_shadowed = true;
            }

            shadowed = true;
            last_overwrite = Some(index);
            continue;
        }

        let contribution = &mut contributions[index];
        contribution.is_shadowed = shadowed;

        let masks_content =
            contribution.block_type == BlockType::Origin && !contribution.is_prototype;

        if let (Some(previous), true) = (last_overwrite, masks_content) {
            contributions[previous].has_warning = true;
        }
    }
}
