use std::collections::BTreeMap;

use serde::Serialize;

const HIDDEN: &[&str] = &["backend"];
const PREFERRED: &[&str] = &["content_element", "frontend_module", "component"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLeaf {
    pub identifier: String,
    pub has_user_template: bool,
}

/// One path segment. A node can be a template and a directory at once
/// (`content_element/text` and its variant `content_element/text/highlight`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub leaf: Option<TreeLeaf>,
    pub children: Vec<TreeNode>,
}

/// Template identifiers arranged by their `/`-separated segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentifierTree {
    pub roots: Vec<TreeNode>,
}

#[derive(Default)]
struct Builder {
    leaf: Option<TreeLeaf>,
    children: BTreeMap<String, Builder>,
}

impl Builder {
    fn into_node(self, name: String) -> TreeNode {
        TreeNode {
            name,
            leaf: self.leaf,
            children: self
                .children
                .into_iter()
                .map(|(name, child)| child.into_node(name))
                .collect(),
        }
    }
}

impl IdentifierTree {
    /// Build from `(identifier, has_user_template)` pairs.
    ///
    /// Children are sorted by name, `backend` templates are hidden and the
    /// common template groups come first.
    pub fn build<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let mut root = Builder::default();

        for (identifier, has_user_template) in entries {
            let node = identifier
                .split('/')
                .fold(&mut root, |node, part| node.children.entry(part.to_string()).or_default());

            node.leaf = Some(TreeLeaf {
                identifier: identifier.to_string(),
                has_user_template,
            });
        }

        for hidden in HIDDEN {
            root.children.remove(*hidden);
        }

        let mut roots = Vec::with_capacity(root.children.len());
        for preferred in PREFERRED {
            if let Some(child) = root.children.remove(*preferred) {
                roots.push(child.into_node((*preferred).to_string()));
            }
        }
        roots.extend(
            root.children
                .into_iter()
                .map(|(name, child)| child.into_node(name)),
        );

        Self { roots }
    }

    /// Depth-first walk over all leaves.
    #[must_use]
    pub fn leaves(&self) -> Vec<&TreeLeaf> {
        fn collect<'a>(nodes: &'a [TreeNode], leaves: &mut Vec<&'a TreeLeaf>) {
            for node in nodes {
                leaves.extend(node.leaf.as_ref());
                collect(&node.children, leaves);
            }
        }

        let mut leaves = Vec::new();
        collect(&self.roots, &mut leaves);
        leaves
    }
}
