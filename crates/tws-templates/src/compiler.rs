use crate::error::TemplateError;
use crate::lexer::Lexer;
use crate::lexer::Token;
use crate::metadata::BlockDefinition;
use crate::metadata::OverrideFlags;
use crate::metadata::TemplateMetadata;
use crate::metadata::UseDeclaration;
use crate::names::TemplateName;

/// Record the static structure of a template.
///
/// Only constructs that affect block resolution are interpreted: `extends`,
/// `use`, `block`/`endblock`, `slot` and `embed`. Block bodies are inspected
/// for `parent()` calls and for real content; everything else is ignored.
pub fn compile(source: &str) -> Result<TemplateMetadata, TemplateError> {
    let tokens = Lexer::new(source).tokenize();
    Compiler::default().run(&tokens)
}

struct OpenBlock {
    name: String,
    line: usize,
    uses_parent_call: bool,
    has_content: bool,
}

#[derive(Default)]
struct Compiler {
    metadata: TemplateMetadata,
    extends_seen: bool,
    open_blocks: Vec<OpenBlock>,
    /// Tag names of open `embed`/`slot` constructs, innermost last.
    open_tags: Vec<(&'static str, usize)>,
}

impl Compiler {
    fn run(mut self, tokens: &[Token]) -> Result<TemplateMetadata, TemplateError> {
        for token in tokens {
            match token {
                Token::Text { content, .. } => {
                    if !content.trim().is_empty() {
                        self.mark_content();
                    }
                }
                Token::Comment { .. } => {}
                Token::Variable { content, .. } => {
                    if self.in_embed() {
                        continue;
                    }
                    self.mark_content();
                    if calls_parent(content) {
                        self.mark_parent_call();
                    }
                }
                Token::Tag { content, line } => self.tag(content, *line)?,
                Token::Error { opening, line } => {
                    return Err(TemplateError::Unterminated {
                        opening: *opening,
                        line: *line,
                    });
                }
            }
        }

        if let Some(block) = self.open_blocks.pop() {
            return Err(TemplateError::Unclosed {
                tag: format!("block {}", block.name),
                line: block.line,
            });
        }
        if let Some((tag, line)) = self.open_tags.pop() {
            return Err(TemplateError::Unclosed {
                tag: tag.to_string(),
                line,
            });
        }

        Ok(self.metadata)
    }

    fn tag(&mut self, content: &str, line: usize) -> Result<(), TemplateError> {
        let (name, rest) = split_word(content);

        if self.in_embed() {
            // Blocks of an embedded template belong to that anonymous
            // template; only the nesting of embeds matters here.
            match name {
                "embed" => self.open_tags.push(("embed", line)),
                "endembed" => self.close_tag("embed", "endembed", line)?,
                _ => {}
            }
            return Ok(());
        }

        match name {
            "extends" => self.extends(rest, line),
            "use" => self.use_tag(rest, line),
            "block" => self.block(rest, line),
            "endblock" => self.end_block(rest, line),
            "slot" => {
                let (slot, _) = split_word(rest);
                if !is_identifier(slot) {
                    return Err(malformed("slot", line));
                }
                self.mark_content();
                self.metadata.slots.insert(slot.to_string());
                self.open_tags.push(("slot", line));
                Ok(())
            }
            "endslot" => self.close_tag("slot", "endslot", line),
            "embed" => {
                self.mark_content();
                self.open_tags.push(("embed", line));
                Ok(())
            }
            "endembed" => self.close_tag("embed", "endembed", line),
            _ => {
                self.mark_content();
                if calls_parent(rest) {
                    self.mark_parent_call();
                }
                Ok(())
            }
        }
    }

    fn extends(&mut self, rest: &str, line: usize) -> Result<(), TemplateError> {
        if self.extends_seen {
            return Err(TemplateError::MultipleExtends { line });
        }
        self.extends_seen = true;

        match string_literal(rest) {
            Some((parent, "")) => self.metadata.parent = Some(TemplateName::from(parent)),
            _ => tracing::debug!("Dynamic extends on line {line} is not resolved statically"),
        }
        Ok(())
    }

    fn use_tag(&mut self, rest: &str, line: usize) -> Result<(), TemplateError> {
        let Some((template, tail)) = string_literal(rest) else {
            return Err(malformed("use", line));
        };

        let mut declaration = UseDeclaration::new(template);

        if !tail.is_empty() {
            let (keyword, renames) = split_word(tail);
            if keyword != "with" {
                return Err(malformed("use", line));
            }

            for rename in renames.split(',') {
                let parts: Vec<&str> = rename.split_whitespace().collect();
                match parts.as_slice() {
                    [used, "as", local] if is_identifier(used) && is_identifier(local) => {
                        declaration = declaration.with_rename(used, local);
                    }
                    _ => return Err(malformed("use", line)),
                }
            }
        }

        self.metadata.uses.push(declaration);
        Ok(())
    }

    fn block(&mut self, rest: &str, line: usize) -> Result<(), TemplateError> {
        let (name, expression) = split_word(rest);
        if !is_identifier(name) {
            return Err(malformed("block", line));
        }

        self.mark_content();

        if expression.is_empty() {
            self.open_blocks.push(OpenBlock {
                name: name.to_string(),
                line,
                uses_parent_call: false,
                has_content: false,
            });
            return Ok(());
        }

        // `{% block title page.title %}` is a complete block on its own.
        self.define(
            name,
            OverrideFlags {
                uses_parent_call: calls_parent(expression),
                is_prototype: false,
            },
            line,
        )
    }

    fn end_block(&mut self, rest: &str, line: usize) -> Result<(), TemplateError> {
        let Some(block) = self.open_blocks.pop() else {
            return Err(TemplateError::Orphaned {
                tag: "endblock".to_string(),
                line,
            });
        };

        let (closing_name, _) = split_word(rest);
        if !closing_name.is_empty() && closing_name != block.name {
            return Err(TemplateError::MismatchedEndBlock {
                expected: block.name,
                found: closing_name.to_string(),
                line,
            });
        }

        self.define(
            &block.name,
            OverrideFlags {
                uses_parent_call: block.uses_parent_call,
                is_prototype: !block.has_content,
            },
            block.line,
        )
    }

    fn define(&mut self, name: &str, flags: OverrideFlags, line: usize) -> Result<(), TemplateError> {
        if self.metadata.block(name).is_some() {
            return Err(TemplateError::DuplicateBlock {
                name: name.to_string(),
                line,
            });
        }
        self.metadata.blocks.push(BlockDefinition {
            name: name.to_string(),
            flags,
        });
        Ok(())
    }

    fn close_tag(
        &mut self,
        opening: &'static str,
        closing: &str,
        line: usize,
    ) -> Result<(), TemplateError> {
        match self.open_tags.last() {
            Some((tag, _)) if *tag == opening => {
                self.open_tags.pop();
                Ok(())
            }
            _ => Err(TemplateError::Orphaned {
                tag: closing.to_string(),
                line,
            }),
        }
    }

    fn in_embed(&self) -> bool {
        self.open_tags.iter().any(|(tag, _)| *tag == "embed")
    }

    fn mark_content(&mut self) {
        if let Some(block) = self.open_blocks.last_mut() {
            block.has_content = true;
        }
    }

    fn mark_parent_call(&mut self) {
        if let Some(block) = self.open_blocks.last_mut() {
            block.uses_parent_call = true;
        }
    }
}

fn malformed(tag: &str, line: usize) -> TemplateError {
    TemplateError::Malformed {
        tag: tag.to_string(),
        line,
    }
}

fn split_word(content: &str) -> (&str, &str) {
    let content = content.trim();
    match content.find(char::is_whitespace) {
        Some(index) => (&content[..index], content[index..].trim_start()),
        None => (content, ""),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a leading quoted string, returning its value and the trimmed rest.
fn string_literal(expression: &str) -> Option<(&str, &str)> {
    let expression = expression.trim();
    let quote = expression.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &expression[1..];
    let end = body.find(quote)?;
    let value = &body[..end];

    if value.contains("#{") {
        // Interpolated strings are dynamic.
        return None;
    }

    Some((value, body[end + 1..].trim()))
}

/// Whether an expression calls the `parent()` function.
fn calls_parent(expression: &str) -> bool {
    expression.match_indices("parent").any(|(index, matched)| {
        let before = expression[..index].chars().next_back();
        let preceded_ok =
            before.map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'));
        let after = expression[index + matched.len()..].trim_start();
        preceded_ok && after.starts_with('(')
    })
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

    mod structure {
        use super::*;

        #[test]
        fn test_extends_and_blocks() {
            let metadata = compile(
                r#"{% extends "@Contao/content_element/text.html.twig" %}
{% block main %}<p>{{ parent() }}</p>{% endblock %}
{% block aside %}<aside>x</aside>{% endblock aside %}"#,
            )
            .unwrap();

            assert_eq!(
                metadata.parent,
                Some(TemplateName::from("@Contao/content_element/text.html.twig"))
            );
            assert_eq!(metadata.block("main"), flags(true, false));
            assert_eq!(metadata.block("aside"), flags(false, false));
        }

        #[test]
        fn test_dynamic_extends_has_no_parent() {
            let metadata = compile(r#"{% extends layout ?: "base.html.twig" %}"#).unwrap();
            assert_eq!(metadata.parent, None);
        }

        #[test]
        fn test_use_with_renames() {
            let metadata = compile(
                r#"{% use "@Contao/component/_figure.html.twig" with figure as image, caption as image_caption %}
{% use '@Contao/component/_headline.html.twig' %}"#,
            )
            .unwrap();

            assert_eq!(
                metadata.uses,
                vec![
                    UseDeclaration::new("@Contao/component/_figure.html.twig")
                        .with_rename("figure", "image")
                        .with_rename("caption", "image_caption"),
                    UseDeclaration::new("@Contao/component/_headline.html.twig"),
                ]
            );
        }

        #[test]
        fn test_slots() {
            let metadata =
                compile("{% slot headline %}{% endslot %}{% slot text %}x{% endslot %}").unwrap();

            assert_eq!(
                metadata.slots.iter().map(String::as_str).collect::<Vec<_>>(),
                ["headline", "text"]
            );
        }

        #[test]
        fn test_embed_blocks_are_ignored() {
            let metadata = compile(
                r#"{% block outer %}{% embed "@Contao/component/_list.html.twig" %}{% block item %}x{% endblock %}{% endembed %}{% endblock %}"#,
            )
            .unwrap();

            assert_eq!(metadata.block_names().collect::<Vec<_>>(), ["outer"]);
            assert_eq!(metadata.block("outer"), flags(false, false));
        }
    }

    mod override_flags {
        use super::*;

        #[test]
        fn test_empty_block_is_prototype() {
            let metadata = compile("{% block main %}\n  {# filled later #}\n{% endblock %}").unwrap();
            assert_eq!(metadata.block("main"), flags(false, true));
        }

        #[test]
        fn test_nested_block_counts_as_content() {
            let metadata =
                compile("{% block outer %}{% block inner %}{% endblock %}{% endblock %}").unwrap();

            assert_eq!(metadata.block("outer"), flags(false, false));
            assert_eq!(metadata.block("inner"), flags(false, true));
            assert_eq!(metadata.block_names().collect::<Vec<_>>(), ["inner", "outer"]);
        }

        #[test]
        fn test_parent_call_belongs_to_innermost_block() {
            let metadata = compile(
                "{% block outer %}{% block inner %}{{ parent() }}{% endblock %}{% endblock %}",
            )
            .unwrap();

            assert_eq!(metadata.block("outer"), flags(false, false));
            assert_eq!(metadata.block("inner"), flags(true, false));
        }

        #[test]
        fn test_parent_call_inside_tag() {
            let metadata =
                compile("{% block main %}{% set content = parent() %}{% endblock %}").unwrap();
            assert_eq!(metadata.block("main"), flags(true, false));
        }

        #[test]
        fn test_shortcut_block() {
            let metadata = compile("{% block title page.title|upper %}").unwrap();
            assert_eq!(metadata.block("title"), flags(false, false));
        }

        #[test]
        fn test_parent_lookalikes() {
            assert!(calls_parent("parent()"));
            assert!(calls_parent("parent ( )|upper"));
            assert!(!calls_parent("grandparent()"));
            assert!(!calls_parent("item.parent()"));
            assert!(!calls_parent("parent"));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_unclosed_block() {
            assert_eq!(
                compile("{% block main %}\ncontent").unwrap_err(),
                TemplateError::Unclosed {
                    tag: "block main".to_string(),
                    line: 1
                }
            );
        }

        #[test]
        fn test_orphaned_endblock() {
            assert!(matches!(
                compile("{% endblock %}").unwrap_err(),
                TemplateError::Orphaned { .. }
            ));
        }

        #[test]
        fn test_mismatched_endblock() {
            assert_eq!(
                compile("{% block a %}\n{% endblock b %}").unwrap_err(),
                TemplateError::MismatchedEndBlock {
                    expected: "a".to_string(),
                    found: "b".to_string(),
                    line: 2
                }
            );
        }

        #[test]
        fn test_duplicate_block() {
            assert!(matches!(
                compile("{% block a %}{% endblock %}{% block a %}{% endblock %}").unwrap_err(),
                TemplateError::DuplicateBlock { name, .. } if name == "a"
            ));
        }

        #[test]
        fn test_multiple_extends() {
            assert_eq!(
                compile("{% extends 'a.html.twig' %}\n{% extends 'b.html.twig' %}").unwrap_err(),
                TemplateError::MultipleExtends { line: 2 }
            );
        }

        #[test]
        fn test_malformed_use() {
            assert!(matches!(
                compile("{% use component %}").unwrap_err(),
                TemplateError::Malformed { tag, .. } if tag == "use"
            ));
            assert!(matches!(
                compile("{% use 'a.html.twig' with x %}").unwrap_err(),
                TemplateError::Malformed { .. }
            ));
        }

        #[test]
        fn test_unterminated_tag() {
            assert_eq!(
                compile("{% block main %}{{ value").unwrap_err(),
                TemplateError::Unterminated {
                    opening: "{{",
                    line: 1
                }
            );
        }
    }
}
