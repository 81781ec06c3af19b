use anyhow::Result;
use clap::Parser;
use tws_studio::TreeNode;

use crate::commands::Command;
use crate::exit::Exit;
use crate::project::Project;

#[derive(Debug, Parser)]
pub struct Tree {
    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl Command for Tree {
    fn execute(&self, project: &Project) -> Result<Exit> {
        let tree = project.studio()?.tree();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&tree)?);
            return Ok(Exit::success());
        }

        let mut output = String::new();
        for node in &tree.roots {
            render(node, 0, &mut output);
        }
        print!("{output}");

        Ok(Exit::success())
    }
}

/// Custom templates are marked with `*`.
fn render(node: &TreeNode, depth: usize, output: &mut String) {
    let marker = match &node.leaf {
        Some(leaf) if leaf.has_user_template => " *",
        _ => "",
    };
    let slash = if node.children.is_empty() { "" } else { "/" };

    output.push_str(&"  ".repeat(depth));
    output.push_str(&node.name);
    output.push_str(slash);
    output.push_str(marker);
    output.push('\n');

    for child in &node.children {
        render(child, depth + 1, output);
    }
}

#[cfg(test)]
mod tests {
    use tws_studio::IdentifierTree;

    use super::*;

    #[test]
    fn test_render_tree() {
        let tree = IdentifierTree::build([
            ("content_element/text", true),
            ("content_element/text/highlight", false),
            ("component/_figure", false),
        ]);

        let mut output = String::new();
        for node in &tree.roots {
            render(node, 0, &mut output);
        }

        insta::assert_snapshot!(output, @r"
        content_element/
          text/ *
            highlight
        component/
          _figure
        ");
    }
}
