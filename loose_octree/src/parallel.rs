use crate::{
    bounds::BoxCenterAndExtent, iterator::ElementBoxIterator, octree::Octree,
    semantics::OctreeSemantics,
};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

impl<E, S> Octree<E, S>
where
    E: Sync,
    S: OctreeSemantics<E>,
{
    /// Returns a parallel iterator over one [`ElementBoxIterator`] per query, in the order of
    /// the queries.
    ///
    /// The tree is only read, so any number of queries can run concurrently.
    #[inline]
    pub fn par_iter_boxes<'a, 'q>(
        &'a self,
        queries: &'q [BoxCenterAndExtent],
    ) -> impl IndexedParallelIterator<Item = ElementBoxIterator<'a, E, S>> + 'q
    where
        'a: 'q,
    {
        queries.par_iter().map(move |query| self.iter_box(*query))
    }

    /// Runs every query on the rayon thread pool and returns the intersecting elements of each,
    /// in the order of the queries.
    ///
    /// The results borrow the tree only, not the queries.
    pub fn par_query<'a>(&'a self, queries: &[BoxCenterAndExtent]) -> Vec<Vec<&'a E>> {
        queries
            .par_iter()
            .map(|query| self.iter_box(*query).collect::<Vec<_>>())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bounds::BoxCenterAndExtent,
        octree::{
            tests::{random_elements, Element},
            Octree,
        },
        semantics::BoundedSemantics,
    };
    use glam::Vec3;
    use rand::prelude::*;

    #[test]
    fn par_query_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut octree = Octree::<Element, BoundedSemantics<8, 10>>::new(Vec3::ZERO, 64.0);
        for element in random_elements(&mut rng, 3000, 64.0) {
            octree.add_element(element);
        }

        let queries = (0..64)
            .map(|_| {
                let center = Vec3::from_array([0.0; 3].map(|_| rng.gen_range(-64.0..64.0)));
                BoxCenterAndExtent::new(center, Vec3::splat(rng.gen_range(0.0..12.0)))
            })
            .collect::<Vec<_>>();

        let results = octree.par_query(&queries);
        assert_eq!(results.len(), queries.len());

        for (query, found) in queries.iter().zip(results) {
            let mut found = found.into_iter().map(|e| e.key).collect::<Vec<_>>();
            let mut expected = octree.iter_box(*query).map(|e| e.key).collect::<Vec<_>>();
            found.sort_unstable();
            expected.sort_unstable();

            assert_eq!(found, expected);
        }
    }

    #[test]
    fn results_outlive_queries() {
        let mut octree = Octree::<Element, BoundedSemantics<2, 6>>::new(Vec3::ZERO, 16.0);
        for (key, x) in [-8.0, -4.0, 4.0, 8.0].into_iter().enumerate() {
            octree.add_element(Element::new(
                key,
                BoxCenterAndExtent::new(Vec3::new(x, 0.0, 0.0), Vec3::splat(0.5)),
            ));
        }

        let results = {
            let queries = vec![
                BoxCenterAndExtent::from_point(Vec3::new(4.0, 0.0, 0.0)),
                BoxCenterAndExtent::from_min_max(Vec3::new(-9.0, -1.0, -1.0), Vec3::new(-3.0, 1.0, 1.0)),
                BoxCenterAndExtent::from_point(Vec3::splat(12.0)),
            ];
            octree.par_query(&queries)
        };

        let keys = results
            .iter()
            .map(|found| {
                let mut keys = found.iter().map(|e| e.key).collect::<Vec<_>>();
                keys.sort_unstable();
                keys
            })
            .collect::<Vec<_>>();
        assert_eq!(keys, vec![vec![2], vec![0, 1], vec![]]);

        let queries = [BoxCenterAndExtent::from_point(Vec3::new(-8.0, 0.0, 0.0))];
        let counts = octree
            .par_iter_boxes(&queries)
            .map(|elements| elements.count())
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![1]);
    }
}
