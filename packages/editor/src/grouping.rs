//! Sidebar grouping of a block sequence.
//!
//! Groups are a display-only view: they are rebuilt on every read and never
//! persisted. Buckets appear in order of first appearance and keep the
//! relative order of their blocks. Concatenating the buckets does NOT give
//! back the page order when groups interleave (`A, B, A` flattens to
//! `A, A, B`).

use indexmap::IndexMap;

use crate::ContentBlock;

/// Blocks partitioned by group name
#[derive(Debug, Clone, Default)]
pub struct BlockGroups<'a> {
    groups: IndexMap<&'a str, Vec<&'a ContentBlock>>,
}

impl<'a> BlockGroups<'a> {
    pub fn from_blocks(blocks: &'a [ContentBlock]) -> Self {
        let mut groups: IndexMap<&'a str, Vec<&'a ContentBlock>> = IndexMap::new();
        for block in blocks {
            groups.entry(block.group()).or_default().push(block);
        }
        Self { groups }
    }

    pub fn get(&self, group: &str) -> Option<&[&'a ContentBlock]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Group names in order of first appearance
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a ContentBlock])> + '_ {
        self.groups.iter().map(|(name, blocks)| (*name, blocks.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Bucket contents concatenated in bucket order
    pub fn flatten(&self) -> Vec<&'a ContentBlock> {
        self.groups.values().flatten().copied().collect()
    }
}
