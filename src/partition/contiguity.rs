use std::collections::VecDeque;

use crate::partition::Partition;

impl Partition {
    /// Find all connected components (as node lists) inside `district`.
    pub fn find_components(&self, district: u32) -> Vec<Vec<usize>> {
        let mut components = Vec::new();

        let mut visited = vec![false; self.num_nodes()];
        for &u in self.nodes_in(district) {
            if visited[u] { continue }
            visited[u] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([u]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for w in self.graph().edges(v) {
                    if self.assignment(w) == district && !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Check if the induced subgraph of `district` is connected.
    pub fn is_contiguous(&self, district: u32) -> bool {
        let nodes = self.nodes_in(district);
        let Some(&start) = nodes.first() else { return false };

        let mut visited = vec![false; self.num_nodes()];
        visited[start] = true;
        let mut seen = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for v in self.graph().edges(u) {
                if !visited[v] && self.assignment(v) == district {
                    visited[v] = true;
                    seen += 1;
                    queue.push_back(v);
                }
            }
        }
        seen == nodes.len()
    }

    /// Check if every district is contiguous.
    pub fn check_contiguity(&self) -> bool {
        (0..self.num_districts()).all(|district| self.is_contiguous(district))
    }
}
