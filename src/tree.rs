//! Dependency trees rebuilt from flat token records
//!
//! Nodes live in an arena; node 0 is the synthetic `ROOT` and the others follow in token order.
//! Every node knows its parent index and its children in position order, so there are no
//! reference cycles to worry about.
//!
//! A token whose head doesn't name any node in the sentence is an orphan. It keeps its node in
//! the arena, but nothing links to it, so it (and whatever hangs below it) is unreachable from
//! `ROOT` and never makes it into an export. Orphans are warned about and kept on the tree so
//! callers can report them.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conll::{ConllFile, Sentence};
use crate::errors::*;

pub const ROOT_LABEL: &str = "ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl TreeNode {
    fn new(label: String) -> Self {
        TreeNode { label, parent: None, children: vec![] }
    }
}

/// A token that could not be attached because its head doesn't exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub position: usize,
    pub head: usize,
    pub surface_form: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    nodes: Vec<TreeNode>,
    orphans: Vec<Orphan>,
}

/// Nested form of a tree, as written to and read from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDoc>,
}

/// Rebuild the dependency tree of one sentence
pub fn build_tree(sentence: &Sentence) -> DependencyTree {
    let mut nodes = vec![TreeNode::new(ROOT_LABEL.to_string())];
    // position -> node index, with the root standing in for position 0
    let mut by_position: Vec<Option<usize>> = vec![None; sentence.len() + 1];
    by_position[0] = Some(0);

    // First pass: create all nodes
    for token in sentence.iter() {
        match by_position.get_mut(token.position) {
            Some(slot) => *slot = Some(nodes.len()),
            // positions run 1..=N, anything past that can't be anyone's head
            None => warn!("Sentence {}: token {} ({}) is past the end of a {} token sentence",
                sentence.number, token.position, token.surface_form, sentence.len()),
        }
        nodes.push(TreeNode::new(format!("{} ({})", token.surface_form, token.relation)));
    }

    // Second pass: attach nodes to their parents
    let mut orphans = vec![];
    for (offset, token) in sentence.iter().enumerate() {
        let id = offset + 1;
        match by_position.get(token.head).and_then(|&slot| slot) {
            Some(parent) => {
                nodes[id].parent = Some(parent);
                nodes[parent].children.push(id);
            }
            None => {
                warn!("Sentence {}: parent with ID {} not found for token {} ({})",
                    sentence.number, token.head, token.position, token.surface_form);
                orphans.push(Orphan {
                    position: token.position,
                    head: token.head,
                    surface_form: token.surface_form.clone(),
                });
            }
        }
    }

    DependencyTree { nodes, orphans }
}

impl DependencyTree {
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Every node in the arena, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn orphans(&self) -> &[Orphan] {
        &self.orphans
    }

    /// The parent of each node, by node index (`None` for the root and for orphans)
    pub fn parents(&self) -> Vec<Option<usize>> {
        self.nodes.iter().map(|node| node.parent).collect()
    }

    /// Node indices reachable from the root, in depth-first preorder
    pub fn reachable(&self) -> Vec<usize> {
        let mut order = vec![];
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            if seen[id] {
                continue;
            }
            seen[id] = true;
            order.push(id);
            // reversed so the first child is visited first
            stack.extend(self.nodes[id].children.iter().rev().cloned());
        }
        order
    }

    /// Nodes that are not part of the exported tree
    pub fn detached(&self) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        for id in self.reachable() {
            seen[id] = true;
        }
        (0..self.nodes.len()).filter(|&id| !seen[id]).collect()
    }

    /// Nested document rooted at `ROOT`
    ///
    /// Built bottom up without recursion, so a long chain of heads can't exhaust the stack.
    pub fn export(&self) -> TreeDoc {
        let mut done: Vec<Option<TreeDoc>> = vec![None; self.nodes.len()];
        // reversed preorder puts every child before its parent
        for id in self.reachable().into_iter().rev() {
            let node = &self.nodes[id];
            let children = node.children.iter()
                .filter_map(|&child| done[child].take())
                .collect();
            done[id] = Some(TreeDoc { name: node.label.clone(), children });
        }
        done[0].take().unwrap_or_else(|| TreeDoc { name: ROOT_LABEL.to_string(), children: vec![] })
    }

    /// Rebuild an arena from a nested document
    ///
    /// Node 0 is the document's top node; the rest are numbered in preorder.
    pub fn import(doc: &TreeDoc) -> DependencyTree {
        let mut nodes = vec![];
        let mut stack: Vec<(&TreeDoc, Option<usize>)> = vec![(doc, None)];
        while let Some((current, parent)) = stack.pop() {
            let id = nodes.len();
            let mut node = TreeNode::new(current.name.clone());
            node.parent = parent;
            nodes.push(node);
            if let Some(parent) = parent {
                nodes[parent].children.push(id);
            }
            for child in current.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        DependencyTree { nodes, orphans: vec![] }
    }
}

/// Draw a tree as an indented outline, one node per line
pub fn render(doc: &TreeDoc) -> String {
    let mut out = format!("{}\n", doc.name);
    // (node, guides drawn so far, last among its siblings)
    let mut stack: Vec<(&TreeDoc, String, bool)> = doc.children.iter().rev()
        .enumerate()
        .map(|(i, child)| (child, String::new(), i == 0))
        .collect();
    while let Some((node, prefix, last)) = stack.pop() {
        out.push_str(&prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&node.name);
        out.push('\n');
        let deeper = format!("{}{}", prefix, if last { "    " } else { "│   " });
        for (i, child) in node.children.iter().rev().enumerate() {
            stack.push((child, deeper.clone(), i == 0));
        }
    }
    out
}

/// Build a tree for every sentence of a CoNLL file and save them all as one JSON array
///
/// Returns how many trees were written.
pub fn export_trees<P: AsRef<Path>>(conll: &ConllFile, output: P) -> Result<usize> {
    let mut docs = vec![];
    let mut orphans = 0;
    for sentence in conll.sentences()? {
        let tree = build_tree(&sentence?);
        orphans += tree.orphans().len();
        docs.push(tree.export());
    }
    let mut writer = BufWriter::new(File::create(output.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &docs)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    if orphans > 0 {
        warn!("{} tokens were left out of their trees", orphans);
    }
    info!("Dependency trees saved to '{}'.", output.as_ref().display());
    Ok(docs.len())
}

/// Load trees saved by `export_trees`
pub fn read_trees<P: AsRef<Path>>(path: P) -> Result<Vec<TreeDoc>> {
    let file = open_existing(path, "dependency tree JSON")?;
    // A sentence can chain its heads deeper than serde_json's default nesting limit
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
    de.disable_recursion_limit();
    let trees = Vec::<TreeDoc>::deserialize(&mut de)?;
    de.end()?;
    Ok(trees)
}
