use crate::octree::Octree;
use std::fmt;

/// Summary of the shape of an [`Octree`], see [`Octree::stats`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Number of visited nodes: the root and every node containing elements.
    pub nodes: usize,
    /// Number of visited leaves.
    pub leaves: usize,
    /// Number of elements in the tree.
    pub elements: usize,
    /// Largest number of elements stored directly in a single node.
    pub max_elements_per_node: usize,
    /// Depth of the deepest visited node, `0` for a tree with only a root.
    pub max_depth: usize,
    /// Number of nodes for every count of directly stored elements, indexed by that count.
    pub element_distribution: Vec<usize>,
}

impl fmt::Display for OctreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} elements in {} nodes ({} leaves), max depth {}, at most {} elements per node",
            self.elements, self.nodes, self.leaves, self.max_depth, self.max_elements_per_node
        )?;

        for (count, nodes) in self.element_distribution.iter().enumerate() {
            if *nodes > 0 {
                writeln!(f, "  {count:>4} elements: {nodes} nodes")?;
            }
        }

        Ok(())
    }
}

impl<E, S> Octree<E, S> {
    /// Walks the tree and returns a summary of its shape.
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();

        for (node, _) in self.iter_nodes() {
            let count = node.element_count();

            stats.nodes += 1;
            stats.leaves += usize::from(node.is_leaf());
            stats.elements += count;
            stats.max_elements_per_node = stats.max_elements_per_node.max(count);
            stats.max_depth = stats.max_depth.max(node.depth());

            if stats.element_distribution.len() <= count {
                stats.element_distribution.resize(count + 1, 0);
            }
            stats.element_distribution[count] += 1;
        }

        stats
    }

    /// Logs the [`OctreeStats`] of the tree at the info level.
    pub fn dump_stats(&self) {
        log::info!("octree stats: {}", self.stats());
    }
}
