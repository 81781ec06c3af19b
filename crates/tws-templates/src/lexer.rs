use serde::Serialize;

const TAG_START: &str = "{%";
const TAG_END: &str = "%}";
const VARIABLE_START: &str = "{{";
const VARIABLE_END: &str = "}}";
const COMMENT_START: &str = "{#";
const COMMENT_END: &str = "#}";

/// A lexical unit of Twig source. Construct contents are trimmed and have
/// their whitespace-control markers (`-`, `~`) removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Token {
    Text { content: String, line: usize },
    Tag { content: String, line: usize },
    Variable { content: String, line: usize },
    Comment { content: String, line: usize },
    Error { opening: &'static str, line: usize },
}

impl Token {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Token::Text { line, .. }
            | Token::Tag { line, .. }
            | Token::Variable { line, .. }
            | Token::Comment { line, .. }
            | Token::Error { line, .. } => *line,
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    current: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            current: 0,
            line: 1,
        }
    }

    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let rest = &self.source[self.current..];

            let token = if rest.starts_with(TAG_START) {
                self.lex_construct(TAG_START, TAG_END, |content, line| Token::Tag {
                    content,
                    line,
                })
            } else if rest.starts_with(VARIABLE_START) {
                self.lex_construct(VARIABLE_START, VARIABLE_END, |content, line| {
                    Token::Variable { content, line }
                })
            } else if rest.starts_with(COMMENT_START) {
                self.lex_construct(COMMENT_START, COMMENT_END, |content, line| {
                    Token::Comment { content, line }
                })
            } else {
                self.lex_text()
            };

            let opens_verbatim =
                matches!(&token, Token::Tag { content, .. } if content == "verbatim");
            tokens.push(token);

            if opens_verbatim {
                self.lex_verbatim(&mut tokens);
            }
        }

        tokens
    }

    fn lex_construct(
        &mut self,
        opening: &'static str,
        closing: &str,
        token_fn: impl FnOnce(String, usize) -> Token,
    ) -> Token {
        let line = self.line;
        let body_start = self.current + opening.len();

        if let Some(offset) = self.source[body_start..].find(closing) {
            let body_end = body_start + offset;
            let content = strip_markers(&self.source[body_start..body_end]).to_string();
            self.advance_to(body_end + closing.len());
            token_fn(content, line)
        } else {
            self.advance_to(self.source.len());
            Token::Error { opening, line }
        }
    }

    fn lex_text(&mut self) -> Token {
        let line = self.line;
        let rest = &self.source[self.current..];

        let end = rest
            .match_indices('{')
            .map(|(index, _)| index)
            .find(|&index| {
                index > 0 && matches!(rest.as_bytes().get(index + 1), Some(b'%' | b'{' | b'#'))
            })
            .unwrap_or(rest.len());

        let content = rest[..end].to_string();
        self.advance_to(self.current + end);
        Token::Text { content, line }
    }

    /// Everything up to the matching `{% endverbatim %}` is plain text.
    fn lex_verbatim(&mut self, tokens: &mut Vec<Token>) {
        let start = self.current;
        let mut search = start;

        while let Some(offset) = self.source[search..].find(TAG_START) {
            let open = search + offset;
            let body_start = open + TAG_START.len();
            let Some(close) = self.source[body_start..].find(TAG_END) else {
                break;
            };

            if strip_markers(&self.source[body_start..body_start + close]) == "endverbatim" {
                if open > start {
                    let line = self.line;
                    self.advance_to(open);
                    tokens.push(Token::Text {
                        content: self.source[start..open].to_string(),
                        line,
                    });
                }
                return;
            }

            search = body_start;
        }

        let line = self.line;
        self.advance_to(self.source.len());
        tokens.push(Token::Error {
            opening: "{% verbatim %}",
            line,
        });
    }

    fn advance_to(&mut self, position: usize) {
        self.line += self.source[self.current..position].matches('\n').count();
        self.current = position;
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

fn strip_markers(body: &str) -> &str {
    let body = body.strip_prefix(['-', '~']).unwrap_or(body);
    let body = body.strip_suffix(['-', '~']).unwrap_or(body);
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(content: &str, line: usize) -> Token {
        Token::Tag {
            content: content.to_string(),
            line,
        }
    }

    fn text(content: &str, line: usize) -> Token {
        Token::Text {
            content: content.to_string(),
            line,
        }
    }

    #[test]
    fn test_tokenize_block() {
        let tokens = Lexer::new("{% block main %}<p>{{ parent() }}</p>{% endblock %}").tokenize();

        assert_eq!(
            tokens,
            vec![
                tag("block main", 1),
                text("<p>", 1),
                Token::Variable {
                    content: "parent()".to_string(),
                    line: 1
                },
                text("</p>", 1),
                tag("endblock", 1),
            ]
        );
    }

    #[test]
    fn test_whitespace_control_markers_are_removed() {
        let tokens = Lexer::new("{%- block main ~%}{#- note -#}{%~ endblock -%}").tokenize();

        assert_eq!(
            tokens,
            vec![
                tag("block main", 1),
                Token::Comment {
                    content: "note".to_string(),
                    line: 1
                },
                tag("endblock", 1),
            ]
        );
    }

    #[test]
    fn test_tracks_lines() {
        let tokens = Lexer::new("a\nb\n{% block x %}\n{% endblock %}").tokenize();

        assert_eq!(tokens[1], tag("block x", 3));
        assert_eq!(tokens[3], tag("endblock", 4));
    }

    #[test]
    fn test_lone_brace_is_text() {
        let tokens = Lexer::new("a { b } c").tokenize();

        assert_eq!(tokens, vec![text("a { b } c", 1)]);
    }

    #[test]
    fn test_unterminated_construct() {
        let tokens = Lexer::new("text\n{% block main").tokenize();

        assert_eq!(
            tokens.last(),
            Some(&Token::Error {
                opening: "{%",
                line: 2
            })
        );
    }

    #[test]
    fn test_verbatim_body_is_text() {
        let tokens =
            Lexer::new("{% verbatim %}{% block fake %}{% endverbatim %}{% block real %}")
                .tokenize();

        assert_eq!(
            tokens,
            vec![
                tag("verbatim", 1),
                text("{% block fake %}", 1),
                tag("endverbatim", 1),
                tag("block real", 1),
            ]
        );
    }

    #[test]
    fn test_unclosed_verbatim() {
        let tokens = Lexer::new("{% verbatim %}{% block fake %}").tokenize();

        assert_eq!(
            tokens.last(),
            Some(&Token::Error {
                opening: "{% verbatim %}",
                line: 1
            })
        );
    }
}
