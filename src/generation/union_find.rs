//! Disjoint-set forest over region ids
//!
//! Regions are numbered `1..=n`; slot 0 exists so ids index directly but is
//! never counted as a component.

/// Union-find with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
    components: usize,
}

impl UnionFind {
    /// `regions` singleton sets with ids `1..=regions`
    pub fn new(regions: u32) -> Self {
        Self {
            parent: (0..=regions).collect(),
            rank: vec![0; regions as usize + 1],
            components: regions as usize,
        }
    }

    /// Number of region ids tracked
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    /// Check if the forest tracks no regions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of disjoint sets remaining
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Canonical representative of `region`, compressing the path on the way
    pub fn find(&mut self, region: u32) -> u32 {
        let mut root = region;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut current = region;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }

        root
    }

    /// Merge the sets containing `a` and `b`
    ///
    /// Returns the surviving representative, or `None` if they were
    /// already in the same set.
    pub fn union(&mut self, a: u32, b: u32) -> Option<u32> {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return None;
        }

        let (root, child) = match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Equal => {
                self.rank[ra as usize] += 1;
                (ra, rb)
            }
        };
        self.parent[child as usize] = root;
        self.components -= 1;
        Some(root)
    }

    /// Stop counting an unused id as a component
    ///
    /// Only meaningful for ids that were never merged.
    pub fn discard(&mut self, region: u32) {
        debug_assert_eq!(self.parent[region as usize], region);
        self.components = self.components.saturating_sub(1);
    }

    /// All of `regions` share one representative
    pub fn all_connected(&mut self, regions: &[u32]) -> bool {
        match regions.split_first() {
            Some((&first, rest)) => {
                let root = self.find(first);
                rest.iter().all(|&r| self.find(r) == root)
            }
            None => true,
        }
    }

    /// Flatten every path and return the `region -> canonical region` table
    ///
    /// The table is idempotent: `table[table[r]] == table[r]`.
    pub fn normalize(&mut self) -> Vec<u32> {
        for region in 0..self.parent.len() as u32 {
            self.find(region);
        }
        self.parent.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut uf = UnionFind::new(4);
        assert_eq!(uf.len(), 4);
        assert_eq!(uf.components(), 4);
        for r in 1..=4 {
            assert_eq!(uf.find(r), r);
        }
        assert!(UnionFind::new(0).is_empty());
        assert_eq!(UnionFind::new(0).components(), 0);
    }

    #[test]
    fn test_union_merges_and_counts() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(1, 2).is_some());
        assert!(uf.union(3, 4).is_some());
        assert_eq!(uf.components(), 3);

        assert!(uf.union(2, 1).is_none());
        assert_eq!(uf.components(), 3);

        uf.union(4, 1);
        assert_eq!(uf.components(), 2);
        assert!(uf.all_connected(&[1, 2, 3, 4]));
        assert!(!uf.all_connected(&[1, 5]));
        assert!(uf.all_connected(&[5]));
        assert!(uf.all_connected(&[]));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut uf = UnionFind::new(8);
        uf.union(1, 2);
        uf.union(3, 4);
        uf.union(2, 4);
        uf.union(6, 7);
        uf.union(7, 8);

        let table = uf.normalize();
        for r in 0..table.len() {
            assert_eq!(table[table[r] as usize], table[r]);
        }
        assert_eq!(table[1], table[3]);
        assert_eq!(table[6], table[8]);
        assert_ne!(table[1], table[6]);
        assert_eq!(table[5], 5);
    }

    #[test]
    fn test_long_chain_compresses() {
        let mut uf = UnionFind::new(100);
        for r in 1..100 {
            uf.union(r, r + 1);
        }
        assert_eq!(uf.components(), 1);
        let root = uf.find(1);
        for r in 1..=100 {
            assert_eq!(uf.find(r), root);
        }
    }
}
