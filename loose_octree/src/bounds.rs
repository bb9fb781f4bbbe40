use glam::Vec3;

/// An axis-aligned bounding box stored as its center and half-extent.
///
/// Represents exactly the box `[center - extent, center + extent]`. Extents are expected to be
/// non-negative on every axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxCenterAndExtent {
    /// Center of the box.
    pub center: Vec3,
    /// Half-widths of the box along each axis.
    pub extent: Vec3,
}

impl BoxCenterAndExtent {
    /// Creates a new [`BoxCenterAndExtent`] with the given center and half-extent.
    #[inline]
    pub const fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    /// Creates a new [`BoxCenterAndExtent`] from its minimum and maximum corners.
    #[inline]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Creates a degenerate box with zero extent located at the given point.
    ///
    /// Querying with such a box turns box/box intersection into a point-in-box test.
    #[inline]
    pub const fn from_point(point: Vec3) -> Self {
        Self::new(point, Vec3::ZERO)
    }

    /// Creates the smallest box containing the sphere of the given center and radius.
    #[inline]
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::new(center, Vec3::splat(radius))
    }

    /// Returns the minimum corner of the box.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.extent
    }

    /// Returns the maximum corner of the box.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.extent
    }

    /// Returns `true` if `other` lies entirely inside this box, boundaries included.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        ((self.center - other.center).abs() + other.extent)
            .cmple(self.extent)
            .all()
    }

    /// Returns `true` if the two boxes overlap, boundaries included.
    ///
    /// Two boxes intersect if, on every axis, the distance between their centers is at most the
    /// sum of their extents. Uses SIMD lanes when the `simd` feature is enabled.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        #[cfg(feature = "simd")]
        {
            self.intersects_simd(other)
        }
        #[cfg(not(feature = "simd"))]
        {
            self.intersects_scalar(other)
        }
    }

    /// Scalar reference implementation of [`BoxCenterAndExtent::intersects`].
    #[inline]
    pub fn intersects_scalar(&self, other: &Self) -> bool {
        let center_difference = (self.center - other.center).to_array();
        let composite_extent = (self.extent + other.extent).to_array();

        !(0..3).any(|axis| center_difference[axis].abs() > composite_extent[axis])
    }

    /// [`BoxCenterAndExtent::intersects`] computed on four `f32` lanes at once.
    #[cfg(feature = "simd")]
    #[inline]
    pub fn intersects_simd(&self, other: &Self) -> bool {
        use wide::f32x4;

        let lanes = |v: Vec3| f32x4::from([v.x, v.y, v.z, 0.0]);

        let center_difference = (lanes(self.center) - lanes(other.center)).abs();
        let composite_extent = lanes(self.extent) + lanes(other.extent);

        wide::CmpGt::cmp_gt(center_difference, composite_extent).move_mask() == 0
    }
}

impl From<(Vec3, Vec3)> for BoxCenterAndExtent {
    /// Converts a `(min, max)` pair of corners.
    #[inline]
    fn from((min, max): (Vec3, Vec3)) -> Self {
        Self::from_min_max(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn random_box(rng: &mut StdRng) -> BoxCenterAndExtent {
        BoxCenterAndExtent::new(
            Vec3::from_array([0.0; 3].map(|_| rng.gen_range(-10.0..10.0))),
            Vec3::from_array([0.0; 3].map(|_| rng.gen_range(0.0..5.0))),
        )
    }

    #[test]
    fn min_max() {
        let bbox = BoxCenterAndExtent::from_min_max(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 2.0, 4.0));

        assert_eq!(bbox.center, Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(bbox.extent, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(bbox.min(), Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(bbox.max(), Vec3::new(3.0, 2.0, 4.0));
        assert_eq!(BoxCenterAndExtent::from((bbox.min(), bbox.max())), bbox);
    }

    #[test]
    fn intersects_touching_and_separated() {
        let a = BoxCenterAndExtent::new(Vec3::ZERO, Vec3::ONE);
        let touching = BoxCenterAndExtent::new(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        let separated = BoxCenterAndExtent::new(Vec3::new(2.0, 0.0, 2.5), Vec3::ONE);

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&separated));
    }

    #[test]
    fn point_query() {
        let a = BoxCenterAndExtent::new(Vec3::splat(5.0), Vec3::splat(1.0));

        assert!(a.intersects(&BoxCenterAndExtent::from_point(Vec3::splat(6.0))));
        assert!(a.intersects(&BoxCenterAndExtent::from_point(Vec3::new(4.5, 5.5, 5.0))));
        assert!(!a.intersects(&BoxCenterAndExtent::from_point(Vec3::new(6.1, 5.0, 5.0))));
    }

    #[test]
    fn intersects_symmetric_and_reflexive() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..10_000 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);

            assert_eq!(a.intersects(&b), b.intersects(&a));
            assert!(a.intersects(&a));
        }

        assert!(BoxCenterAndExtent::default().intersects(&BoxCenterAndExtent::default()));
    }

    #[test]
    fn intersects_matches_min_max_overlap() {
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..10_000 {
            // Integer-valued boxes keep the two formulations exact.
            let a = BoxCenterAndExtent::new(
                Vec3::from_array([0.0; 3].map(|_| rng.gen_range(-8..8) as f32)),
                Vec3::from_array([0.0; 3].map(|_| rng.gen_range(0..4) as f32)),
            );
            let b = BoxCenterAndExtent::new(
                Vec3::from_array([0.0; 3].map(|_| rng.gen_range(-8..8) as f32)),
                Vec3::from_array([0.0; 3].map(|_| rng.gen_range(0..4) as f32)),
            );

            let overlap = a.min().cmple(b.max()).all() && b.min().cmple(a.max()).all();
            assert_eq!(a.intersects(&b), overlap);
        }
    }

    #[test]
    fn contains() {
        let outer = BoxCenterAndExtent::new(Vec3::ZERO, Vec3::splat(2.0));

        assert!(outer.contains(&outer));
        assert!(outer.contains(&BoxCenterAndExtent::new(Vec3::ONE, Vec3::ONE)));
        assert!(!outer.contains(&BoxCenterAndExtent::new(Vec3::ONE, Vec3::splat(1.5))));
        assert!(!outer.contains(&BoxCenterAndExtent::new(Vec3::splat(5.0), Vec3::ZERO)));
    }

    #[cfg(feature = "simd")]
    #[test]
    fn simd_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..10_000 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);

            assert_eq!(a.intersects_simd(&b), a.intersects_scalar(&b));
        }
    }
}
