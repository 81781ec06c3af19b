//! Twig template names and static metadata.
//!
//! This crate knows how to take a template apart without rendering it:
//!
//! 1. **Names**: split `@Namespace/path/name.html.twig` into namespace,
//!    short name, identifier and extension ([`names`])
//! 2. **Lexing**: tokenize template source into tags, variables, comments
//!    and text ([`Lexer`])
//! 3. **Compiling**: record the blocks, `extends` parent, `use` imports and
//!    slots of a template as [`TemplateMetadata`] ([`compile`])
//!
//! The metadata is what the inspector consumes; nothing here knows about
//! where templates live or how inheritance chains are assembled.

mod compiler;
mod error;
mod lexer;
mod metadata;
pub mod names;

pub use compiler::compile;
pub use error::TemplateError;
pub use lexer::Lexer;
pub use lexer::Token;
pub use metadata::BlockDefinition;
pub use metadata::OverrideFlags;
pub use metadata::TemplateMetadata;
pub use metadata::UseDeclaration;
pub use names::TemplateName;
