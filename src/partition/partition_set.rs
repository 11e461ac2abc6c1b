/// PartitionSet maintains a total assignment of elements to sets, with O(1) move/find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartitionSet {
    sets: Vec<Vec<usize>>,  // sets[s] = elements currently in set s
    index: Vec<u32>,        // index[e] = s when e is in sets[s]
    position: Vec<usize>,   // position[e] = i when sets[s][i] is e
}

impl PartitionSet {
    /// Build a partition of `assignments.len()` elements into `num_sets` sets.
    /// Every assignment must be in range `[0, num_sets)`.
    pub(crate) fn from_assignments(num_sets: usize, assignments: &[u32]) -> Self {
        assert!(num_sets > 0, "must have at least one set");
        let mut sets = vec![Vec::new(); num_sets];
        let mut position = Vec::with_capacity(assignments.len());
        for (elem, &set) in assignments.iter().enumerate() {
            assert!((set as usize) < num_sets, "set out of range");
            position.push(sets[set as usize].len());
            sets[set as usize].push(elem);
        }

        Self { sets, index: assignments.to_vec(), position }
    }

    /// Number of sets.
    #[inline] pub(crate) fn num_sets(&self) -> usize { self.sets.len() }

    /// Return the set that `elem` is currently in.
    #[inline]
    pub(crate) fn find(&self, elem: usize) -> u32 {
        debug_assert!(elem < self.index.len(), "element out of range");
        self.index[elem]
    }

    /// Returns a reference to the elements currently in `set`.
    #[inline]
    pub(crate) fn get(&self, set: usize) -> &[usize] {
        debug_assert!(set < self.sets.len(), "set out of range");
        &self.sets[set]
    }

    /// Get a complete slice of assignments for each element.
    #[inline] pub(crate) fn assignments(&self) -> &[u32] { &self.index }

    /// Iterator over each set as a slice.
    #[inline]
    pub(crate) fn iter_sets(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.sets.iter().map(|v| v.as_slice())
    }

    /// Move `elem` to `set`. Panics in debug if out of range.
    pub(crate) fn move_to(&mut self, elem: usize, set: u32) {
        debug_assert!(elem < self.index.len(), "element out of range");
        debug_assert!((set as usize) < self.sets.len(), "set out of range");

        let (prev, pos) = (self.index[elem] as usize, self.position[elem]);
        if prev == set as usize { return }

        // Remove from previous set by swapping with last element.
        if let Some(last_elem) = self.sets[prev].pop() {
            if last_elem != elem {
                self.sets[prev][pos] = last_elem;
                self.position[last_elem] = pos;
            }
        }

        // Add to new set.
        self.index[elem] = set;
        self.position[elem] = self.sets[set as usize].len();
        self.sets[set as usize].push(elem);
    }
}

#[cfg(test)]
mod tests {
    use super::PartitionSet;

    #[test]
    fn from_assignments_basic() {
        let ps = PartitionSet::from_assignments(3, &[0, 1, 2, 0, 2, 1]);
        assert_eq!(ps.num_sets(), 3);

        assert_eq!(ps.get(0), &[0, 3]);
        assert_eq!(ps.get(1), &[1, 5]);
        assert_eq!(ps.get(2), &[2, 4]);
        assert_eq!(ps.assignments(), &[0, 1, 2, 0, 2, 1]);
    }

    #[test]
    fn empty_sets_are_allowed() {
        let ps = PartitionSet::from_assignments(3, &[0, 0]);
        assert!(ps.get(1).is_empty());
        assert!(ps.get(2).is_empty());
        assert_eq!(ps.iter_sets().count(), 3);
    }

    #[test]
    #[should_panic(expected = "set out of range")]
    fn from_assignments_panics_on_set_oob() {
        PartitionSet::from_assignments(2, &[0, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "must have at least one set")]
    fn from_assignments_panics_on_zero_sets() {
        PartitionSet::from_assignments(0, &[]);
    }

    #[test]
    fn move_to_idempotent_when_same_set() {
        let mut ps = PartitionSet::from_assignments(2, &[0, 0, 0]);
        ps.move_to(2, 0);
        assert_eq!(ps.find(2), 0);
        assert_eq!(ps.get(0), &[0, 1, 2]);
        assert!(ps.get(1).is_empty());
    }

    #[test]
    fn move_to_updates_swapped_element_index() {
        let mut ps = PartitionSet::from_assignments(2, &[0, 0, 0, 1, 0]);
        ps.move_to(1, 1);

        assert_eq!(ps.find(1), 1);
        assert!(!ps.get(0).contains(&1));
        assert!(ps.get(0).contains(&4));
        assert_eq!(ps.find(4), 0);
        assert!(ps.get(1).contains(&3));

        // The swapped element must still be removable through its new position.
        ps.move_to(4, 1);
        assert_eq!(ps.get(0).len(), 2);
        assert_eq!(ps.get(1).len(), 3);
    }

    #[test]
    fn multiple_moves_keep_invariant() {
        let mut ps = PartitionSet::from_assignments(3, &[0; 6]);
        ps.move_to(0, 1);
        ps.move_to(1, 2);
        ps.move_to(2, 1);
        ps.move_to(3, 2);
        ps.move_to(4, 1);
        ps.move_to(5, 2);
        ps.move_to(0, 0);

        for elem in 0..6 {
            let set = ps.find(elem);
            assert!(ps.get(set as usize).contains(&elem));
        }

        let mut all = ps.iter_sets().flatten().copied().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4, 5]);
    }
}
