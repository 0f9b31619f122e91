// src/encode/haar/sum_tree.rs

//! Binary reduction trees stored as a single flat buffer.
//!
//! The leaves come first, then each coarser level, and the root is the last
//! entry. Level boundaries are kept next to the buffer so individual levels
//! can be borrowed as slices without any node objects.

/// Pairwise combine operator applied to adjacent tree entries.
pub type Combine = fn(i32, i32) -> i32;

/// Parent of two nodes in a sum tree.
pub const SUM: Combine = sum;

/// Haar detail coefficient of two sibling nodes.
pub const DIFFERENCE: Combine = difference;

#[inline]
fn sum(left: i32, right: i32) -> i32 {
    left + right
}

#[inline]
fn difference(left: i32, right: i32) -> i32 {
    left - right
}

/// Applies `op` to every adjacent pair `(values[2i], values[2i + 1])`.
///
/// A trailing unpaired value is ignored.
pub fn combine_pairs(values: &[i32], op: Combine) -> impl Iterator<Item = i32> + '_ {
    values.chunks_exact(2).map(move |pair| op(pair[0], pair[1]))
}

/// A flat binary sum tree over a sample line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumTree {
    nodes: Vec<i32>,
    // Start index of every level, leaves first; the last entry is `nodes.len()`.
    bounds: Vec<usize>,
}

impl SumTree {
    /// Builds the tree whose leaves are the sums of `leaf_size` consecutive samples.
    ///
    /// # Panics
    /// If `leaf_size` is not a power of two, if `data.len()` is not a multiple
    /// of `leaf_size`, or if the resulting leaf count is not a power of two.
    pub fn build(data: &[i8], leaf_size: usize) -> Self {
        assert!(
            leaf_size.is_power_of_two(),
            "leaf size must be a power of two, got {}",
            leaf_size
        );
        assert!(
            data.len() % leaf_size == 0,
            "line length {} is not a multiple of leaf size {}",
            data.len(),
            leaf_size
        );

        let leaves = data.len() / leaf_size;
        if leaves == 0 {
            return Self {
                nodes: Vec::new(),
                bounds: vec![0],
            };
        }
        assert!(
            leaves.is_power_of_two(),
            "leaf count {} is not a power of two",
            leaves
        );

        let mut nodes = Vec::with_capacity(2 * leaves - 1);
        nodes.extend(
            data.chunks_exact(leaf_size)
                .map(|block| block.iter().map(|&s| i32::from(s)).sum::<i32>()),
        );

        let mut bounds = vec![0, leaves];
        let mut start = 0;
        while nodes.len() - start > 1 {
            let end = nodes.len();
            let parents: Vec<i32> = combine_pairs(&nodes[start..end], SUM).collect();
            nodes.extend_from_slice(&parents);
            bounds.push(nodes.len());
            start = end;
        }

        Self { nodes, bounds }
    }

    /// Number of leaves (the width of the bottom level).
    pub fn leaves(&self) -> usize {
        self.bounds[1.min(self.bounds.len() - 1)]
    }

    /// Total of all samples, or `None` for an empty tree.
    pub fn root(&self) -> Option<i32> {
        self.nodes.last().copied()
    }

    /// Number of levels including the leaves and the root.
    pub fn depth(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Borrows level `index`, where level 0 holds the leaves.
    pub fn level(&self, index: usize) -> &[i32] {
        &self.nodes[self.bounds[index]..self.bounds[index + 1]]
    }

    /// Iterates over the levels from the leaves up to the root.
    pub fn levels(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.bounds
            .windows(2)
            .map(move |w| &self.nodes[w[0]..w[1]])
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.nodes
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.nodes
    }
}

/// Flat sum tree of `data` with `data.len() / leaf_size` leaves.
///
/// The result has `2 * leaves - 1` entries, leaves first and root last.
pub fn sum_tree(data: &[i8], leaf_size: usize) -> Vec<i32> {
    SumTree::build(data, leaf_size).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_tree_unit_leaves() {
        let tree = sum_tree(&[1, 2, 3, 4], 1);
        assert_eq!(tree, vec![1, 2, 3, 4, 3, 7, 10]);
    }

    #[test]
    fn test_sum_tree_wide_leaves() {
        let tree = sum_tree(&[1, 2, 3, 4, -5, 6, 7, -8], 2);
        assert_eq!(tree, vec![3, 7, 1, -1, 10, 0, 10]);
    }

    #[test]
    fn test_levels_are_pairwise_sums() {
        let data: Vec<i8> = (0..64).map(|i| ((i * 37) % 256) as u8 as i8).collect();
        for leaf_size in [1, 2, 4, 8, 64] {
            let tree = SumTree::build(&data, leaf_size);
            assert_eq!(tree.leaves(), data.len() / leaf_size);
            assert_eq!(tree.as_slice().len(), 2 * tree.leaves() - 1);

            let levels: Vec<&[i32]> = tree.levels().collect();
            assert_eq!(levels.len(), tree.depth());
            for pair in levels.windows(2) {
                let (below, above) = (pair[0], pair[1]);
                assert_eq!(below.len(), 2 * above.len());
                for (i, parent) in above.iter().enumerate() {
                    assert_eq!(*parent, below[2 * i] + below[2 * i + 1]);
                }
            }

            let total: i32 = data.iter().map(|&s| i32::from(s)).sum();
            assert_eq!(tree.root(), Some(total));
        }
    }

    #[test]
    fn test_single_sample_tree() {
        let tree = SumTree::build(&[-7], 1);
        assert_eq!(tree.as_slice(), &[-7]);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.level(0), &[-7]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = SumTree::build(&[], 4);
        assert!(tree.as_slice().is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.leaves(), 0);
    }

    #[test]
    fn test_combine_pairs() {
        let diffs: Vec<i32> = combine_pairs(&[5, 3, 1, 4], DIFFERENCE).collect();
        assert_eq!(diffs, vec![2, -3]);
        let sums: Vec<i32> = combine_pairs(&[5, 3, 1], SUM).collect();
        assert_eq!(sums, vec![8]);
    }

    #[test]
    #[should_panic(expected = "not a multiple of leaf size")]
    fn test_rejects_ragged_line() {
        SumTree::build(&[1, 2, 3], 2);
    }

    #[test]
    #[should_panic(expected = "leaf size must be a power of two")]
    fn test_rejects_bad_leaf_size() {
        SumTree::build(&[1, 2, 3, 4, 5, 6], 3);
    }
}
