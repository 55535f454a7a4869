//! Child to parent propagation of directory totals.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::node::DirNode;

/// Add every node's totals into its parent, deepest nodes first.
///
/// When a node is visited all of its children have already been folded
/// into it, so one linear pass leaves every node holding its subtree
/// totals. Nodes whose parent is not in the map (the root, or a directory
/// whose ancestor was never registered) contribute nowhere.
pub(crate) fn propagate(nodes: &mut IndexMap<PathBuf, DirNode>) {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[b].depth.cmp(&nodes[a].depth));

    for index in order {
        let Some((path, node)) = nodes.get_index(index) else {
            continue;
        };
        let totals = node.totals();
        let Some(parent_index) = path.parent().and_then(|parent| nodes.get_index_of(parent)) else {
            continue;
        };
        nodes[parent_index].absorb(&totals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str, depth: u32, size: u64, files: u64) -> (PathBuf, DirNode) {
        let mut node = DirNode::new(path, depth);
        node.size = size;
        node.file_count = files;
        (PathBuf::from(path), node)
    }

    #[test]
    fn test_propagates_through_all_levels() {
        // Insert deepest first to show order of insertion does not matter.
        let mut nodes: IndexMap<PathBuf, DirNode> = [
            node("/r/a/b/c", 3, 1, 1),
            node("/r/a", 1, 10, 1),
            node("/r", 0, 100, 1),
            node("/r/a/b", 2, 1000, 1),
            node("/r/z", 1, 5, 0),
        ]
        .into_iter()
        .collect();

        propagate(&mut nodes);

        assert_eq!(nodes[&PathBuf::from("/r/a/b/c")].size, 1);
        assert_eq!(nodes[&PathBuf::from("/r/a/b")].size, 1001);
        assert_eq!(nodes[&PathBuf::from("/r/a")].size, 1011);
        assert_eq!(nodes[&PathBuf::from("/r")].size, 1116);
        assert_eq!(nodes[&PathBuf::from("/r")].file_count, 4);
    }

    #[test]
    fn test_missing_parent_is_ignored() {
        let mut nodes: IndexMap<PathBuf, DirNode> =
            [node("/r", 0, 1, 1), node("/r/a/b", 2, 7, 1)].into_iter().collect();

        propagate(&mut nodes);

        assert_eq!(nodes[&PathBuf::from("/r")].size, 1);
        assert_eq!(nodes[&PathBuf::from("/r/a/b")].size, 7);
    }

    #[test]
    fn test_error_counters_propagate() {
        let (root_path, root) = node("/r", 0, 0, 0);
        let (child_path, mut child) = node("/r/a", 1, 0, 0);
        child.err_dir_count = 2;
        child.err_file_count = 3;
        let mut nodes: IndexMap<PathBuf, DirNode> =
            [(root_path.clone(), root), (child_path, child)].into_iter().collect();

        propagate(&mut nodes);

        assert_eq!(nodes[&root_path].err_dir_count, 2);
        assert_eq!(nodes[&root_path].err_file_count, 3);
    }
}
