use std::fmt::Write;

use tws_inspector::TemplateInformation;
use tws_templates::TemplateName;

const COMPONENT_PREFIX: &str = "component/";

/// Initial content for a template that builds on `base_template`.
///
/// Components are pulled in with `use`, everything else is extended. A
/// comment lists what the base template offers.
#[must_use]
pub fn render_skeleton(base_template: &TemplateName, info: &TemplateInformation) -> String {
    let is_component = base_template
        .parse()
        .is_some_and(|parsed| parsed.short_name.starts_with(COMPONENT_PREFIX));
    let tag = if is_component { "use" } else { "extends" };

    let mut content = format!("{{% {tag} \"{base_template}\" %}}\n");

    let sections = [("blocks", &info.block_names), ("slots", &info.slots)];
    if sections.iter().all(|(_, names)| names.is_empty()) {
        return content;
    }

    content.push_str("\n{#\n");
    for (label, names) in sections {
        if names.is_empty() {
            continue;
        }
        let _ = writeln!(content, "  Available {label}:");
        for name in names {
            let _ = writeln!(content, "    - {name}");
        }
    }
    content.push_str("#}\n");

    content
}
