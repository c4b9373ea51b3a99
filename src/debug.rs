//! Statistics and integrity checks for troubleshooting.

use crate::node::{NodeId, RadixNode};
use crate::tree::RadixTree;

/// Shape and occupancy of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub capacity: u64,
    pub branch_factor: usize,
    /// Routing levels between the root and a leaf.
    pub depth: usize,
    /// Total allocated nodes, root included.
    pub nodes: usize,
    /// Allocated terminal leaves
    pub terminals: usize,
    /// Values inserted but not yet drained.
    pub pending: usize,
}

impl RadixTree {
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            capacity: self.geometry.capacity(),
            branch_factor: self.geometry.branch_factor(),
            depth: self.geometry.depth(),
            nodes: self.nodes.len(),
            terminals: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            pending: self.len(),
        }
    }

    /// Approximate heap bytes held by the arena and its child slots.
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<RadixNode>()
            + self
                .nodes
                .iter()
                .map(|n| n.children.len() * std::mem::size_of::<Option<NodeId>>())
                .sum::<usize>()
    }

    /// Walk the tree and describe every broken structural rule: parent links
    /// that do not match the owning slot, slot counts per level, leaves whose
    /// value does not route back to them, and pending or descendant counters
    /// that disagree with the leaves. An empty result means the tree is sound.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let depth = self.geometry.depth();

        if self.nodes[0].parent.is_some() {
            issues.push("root has a parent".to_string());
        }

        // (node, depth, lowest value covered)
        let mut stack = vec![(NodeId::ROOT, 1usize, 0u64)];
        let mut reachable = 1usize;
        let mut pending = 0usize;

        while let Some((id, d, base)) = stack.pop() {
            let node = self.node(id);

            if d > depth {
                if !node.is_terminal() {
                    issues.push(format!("{id:?} below the last level has child slots"));
                }
                if node.descendant_count != 0 {
                    issues.push(format!("leaf {id:?} has descendant_count {}", node.descendant_count));
                }
                if node.count_here > 0 && node.stored_value != base {
                    issues.push(format!(
                        "leaf {id:?} stores {} but is routed from {base}",
                        node.stored_value
                    ));
                }
                pending += node.count_here;
                continue;
            }

            if node.children.len() != self.geometry.slots() {
                issues.push(format!(
                    "{id:?} at depth {d} has {} slots (expected {})",
                    node.children.len(),
                    self.geometry.slots()
                ));
            }
            if node.count_here != 0 {
                issues.push(format!("branch {id:?} holds {} values", node.count_here));
            }

            let divisor = self.geometry.divisor(d);
            let mut below = 0usize;
            for (slot, child) in node.children() {
                reachable += 1;
                let child_node = self.node(child);
                if child_node.parent != Some(id) {
                    issues.push(format!(
                        "{child:?} in slot {slot} of {id:?} points at parent {:?}",
                        child_node.parent
                    ));
                }
                below += self.subtree_count(child);
                stack.push((child, d + 1, base + slot as u64 * divisor));
            }

            if self.exact_descendants && node.descendant_count != below {
                issues.push(format!(
                    "{id:?} has descendant_count {} but {below} values below",
                    node.descendant_count
                ));
            }
        }

        if reachable != self.nodes.len() {
            issues.push(format!(
                "{} nodes allocated but {reachable} reachable from the root",
                self.nodes.len()
            ));
        }
        if pending != self.len() {
            issues.push(format!(
                "leaves hold {pending} values but {} are pending",
                self.len()
            ));
        }

        issues
    }

    fn subtree_count(&self, id: NodeId) -> usize {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            total += node.count_here;
            stack.extend(node.children().map(|(_, child)| child));
        }
        total
    }

    /// Log the tree structure at trace level.
    pub fn debug_print(&self) {
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, indent)) = stack.pop() {
            let node = self.node(id);
            if node.is_terminal() {
                tracing::trace!(
                    "{}leaf {:?}: value={} count={}",
                    "  ".repeat(indent),
                    id,
                    node.stored_value,
                    node.count_here
                );
            } else {
                tracing::trace!(
                    "{}branch {:?}: children={} below={}",
                    "  ".repeat(indent),
                    id,
                    node.children().count(),
                    node.descendant_count
                );
            }
            let children: Vec<_> = node.children().collect();
            for (_, child) in children.into_iter().rev() {
                stack.push((child, indent + 1));
            }
        }
    }
}
