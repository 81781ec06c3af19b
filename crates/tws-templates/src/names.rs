//! Template names and identifiers.
//!
//! A template name looks like `@Contao_Global/content_element/text.html.twig`:
//! an optional `@Namespace/` prefix followed by the short name. The
//! identifier (`content_element/text`) drops the namespace and the
//! `.<type>.twig` extension so that every implementation of the same logical
//! template, whichever namespace provides it, shares one key.
//!
//! All functions here are pure string operations.

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

const TWIG_SUFFIX: &str = ".twig";

/// A template name, used as lookup key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build `@{namespace}/{short_name}`.
    #[must_use]
    pub fn namespaced(namespace: &str, short_name: &str) -> Self {
        Self(format!("@{namespace}/{short_name}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn parse(&self) -> Option<ParsedName<'_>> {
        parse_template_name(&self.0)
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.parse().and_then(|parsed| parsed.namespace)
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        identifier(&self.0)
    }

    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        extension(&self.0)
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TemplateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TemplateName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for TemplateName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TemplateName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName<'a> {
    pub namespace: Option<&'a str>,
    pub short_name: &'a str,
}

/// Split a template name into namespace and short name.
///
/// Returns `None` for names that start with `@` but carry no namespace or no
/// short name (`@Contao`, `@/text.html.twig`, `@Contao/`), and for the
/// empty string.
#[must_use]
pub fn parse_template_name(name: &str) -> Option<ParsedName<'_>> {
    let Some(rest) = name.strip_prefix('@') else {
        return (!name.is_empty()).then_some(ParsedName {
            namespace: None,
            short_name: name,
        });
    };

    let (namespace, short_name) = rest.split_once('/')?;
    if namespace.is_empty() || short_name.is_empty() {
        return None;
    }

    Some(ParsedName {
        namespace: Some(namespace),
        short_name,
    })
}

/// Split a short name into its identifier and `.<type>.twig` extension.
fn split_extension(short_name: &str) -> Option<(&str, &str)> {
    let stem = short_name.strip_suffix(TWIG_SUFFIX)?;
    let dot = stem.rfind('.')?;
    let (identifier, file_type) = (&stem[..dot], &stem[dot + 1..]);

    let valid_type = !file_type.is_empty()
        && !file_type
            .chars()
            .any(|c| c == '/' || c == '.' || c.is_whitespace());
    let valid_identifier =
        !identifier.is_empty() && !identifier.ends_with('/') && !identifier.starts_with('/');

    (valid_type && valid_identifier).then(|| (identifier, &short_name[dot + 1..]))
}

/// Identifier of a template: the short name without its `.<type>.twig`
/// extension. A leading `@Namespace/` is ignored.
///
/// ```
/// use tws_templates::names::identifier;
///
/// assert_eq!(identifier("content_element/text.html.twig"), Some("content_element/text"));
/// assert_eq!(identifier("@Contao_Global/component/_figure.html.twig"), Some("component/_figure"));
/// assert_eq!(identifier("content_element/text.twig"), None);
/// ```
#[must_use]
pub fn identifier(name: &str) -> Option<&str> {
    let short_name = parse_template_name(name)?.short_name;
    split_extension(short_name).map(|(identifier, _)| identifier)
}

/// Extension of a template (`html.twig`, `json.twig`, ...). A leading
/// `@Namespace/` is ignored.
#[must_use]
pub fn extension(name: &str) -> Option<&str> {
    let short_name = parse_template_name(name)?.short_name;
    split_extension(short_name).map(|(_, extension)| extension)
}
