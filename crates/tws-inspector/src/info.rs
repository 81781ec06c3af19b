use serde::Serialize;
use tws_templates::names::extension;
use tws_templates::names::identifier;
use tws_templates::names::parse_template_name;

const UNKNOWN: &str = "?";

/// Display parts of a template name; unparsable parts become `?`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateNameInfo {
    pub name: String,
    pub short_name: String,
    pub namespace: String,
    pub identifier: String,
    pub extension: String,
}

impl TemplateNameInfo {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let parsed = parse_template_name(name);

        Self {
            name: name.to_string(),
            short_name: parsed
                .map_or(UNKNOWN, |parsed| parsed.short_name)
                .to_string(),
            namespace: parsed
                .and_then(|parsed| parsed.namespace)
                .unwrap_or(UNKNOWN)
                .to_string(),
            identifier: identifier(name).unwrap_or(UNKNOWN).to_string(),
            extension: extension(name).unwrap_or(UNKNOWN).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let info = TemplateNameInfo::new("@Contao_Global/content_element/text.html.twig");

        assert_eq!(info.short_name, "content_element/text.html.twig");
        assert_eq!(info.namespace, "Contao_Global");
        assert_eq!(info.identifier, "content_element/text");
        assert_eq!(info.extension, "html.twig");
    }

    #[test]
    fn test_placeholders() {
        let info = TemplateNameInfo::new("text.twig");

        assert_eq!(info.short_name, "text.twig");
        assert_eq!(info.namespace, "?");
        assert_eq!(info.identifier, "?");
        assert_eq!(info.extension, "?");

        let info = TemplateNameInfo::new("@Contao");
        assert_eq!(info.short_name, "?");
        assert_eq!(info.namespace, "?");
    }
}
