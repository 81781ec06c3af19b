use tws_inspector::InheritanceChains;
use tws_templates::TemplateName;

/// Resolve a reference into the managed namespace (`@Contao/...`) to a
/// concrete template.
///
/// A template referencing its own identifier means "the next one in the
/// chain"; any other identifier resolves to the chain's first entry.
/// References that cannot be resolved are returned unchanged.
#[must_use]
pub fn resolve_managed_reference(
    reference: &TemplateName,
    referrer: &TemplateName,
    chains: &InheritanceChains,
    managed_namespace: &str,
) -> TemplateName {
    if reference.namespace() != Some(managed_namespace) {
        return reference.clone();
    }

    let Some(chain) = reference
        .identifier()
        .and_then(|identifier| chains.get(identifier))
    else {
        return reference.clone();
    };

    let resolved = if reference.identifier() == referrer.identifier() {
        chain
            .iter()
            .position(|name| name == referrer)
            .and_then(|index| chain.get(index + 1))
    } else {
        chain.first()
    };

    resolved.cloned().unwrap_or_else(|| reference.clone())
}
