/// A set of undirected edge ids with O(1) insert/remove/contains.
///
/// Removal is swap-remove, so iteration order depends on the history of
/// insertions and removals (but is deterministic for a given history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CutEdgeSet {
    edges: Vec<usize>,
    loc: Vec<Option<usize>>, // loc[edge] = Some(pos) if edges[pos] == edge
}

impl CutEdgeSet {
    /// Create an empty set over a universe of `num_edges` undirected edges.
    pub(crate) fn new(num_edges: usize) -> Self {
        Self { edges: Vec::new(), loc: vec![None; num_edges] }
    }

    /// Number of edges currently in the set.
    #[inline] pub(crate) fn len(&self) -> usize { self.edges.len() }

    /// Returns true if `edge` is in the set.
    #[inline]
    pub(crate) fn contains(&self, edge: usize) -> bool {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        self.loc[edge].is_some()
    }

    /// Read-only view of the edges in the set.
    #[inline] pub(crate) fn as_slice(&self) -> &[usize] { &self.edges }

    /// Insert `edge` (no-op if present).
    pub(crate) fn insert(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if self.loc[edge].is_none() {
            self.loc[edge] = Some(self.edges.len());
            self.edges.push(edge);
        }
    }

    /// Remove `edge` (no-op if absent).
    pub(crate) fn remove(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if let Some(pos) = self.loc[edge].take() {
            self.edges.swap_remove(pos);
            if let Some(&moved) = self.edges.get(pos) {
                self.loc[moved] = Some(pos);
            }
        }
    }

    /// Insert or remove `edge` depending on `present`.
    #[inline]
    pub(crate) fn set(&mut self, edge: usize, present: bool) {
        if present { self.insert(edge) } else { self.remove(edge) }
    }
}
