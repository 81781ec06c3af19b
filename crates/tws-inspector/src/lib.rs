//! Static analysis of template inheritance.
//!
//! Given compiled [`TemplateMetadata`](tws_templates::TemplateMetadata)
//! behind a [`MetadataStore`], the [`Inspector`] reconstructs how a block is
//! resolved across `extends` and `use` relationships: which template
//! defines it, which override or enhance it, and which overrides are masked
//! by more specific ones.

mod block;
mod error;
mod hierarchy;
mod info;
mod inspector;
mod store;
#[cfg(test)]
mod testing;

pub use crate::block::classify;
pub use crate::block::BlockContribution;
pub use crate::block::BlockType;
pub use crate::error::InspectionError;
pub use crate::error::StoreError;
pub use crate::hierarchy::BlockHierarchy;
pub use crate::info::TemplateNameInfo;
pub use crate::inspector::Inspector;
pub use crate::inspector::TemplateInformation;
pub use crate::inspector::DEFAULT_MANAGED_NAMESPACE;
pub use crate::store::InheritanceChains;
pub use crate::store::MetadataStore;
