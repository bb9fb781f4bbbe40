use crate::{bounds::BoxCenterAndExtent, octree::ElementId};

/// Compile-time description of how an [`Octree`](crate::Octree) stores elements of type `E`.
///
/// # Example
///
/// ```
/// use loose_octree::prelude::*;
/// use glam::Vec3;
///
/// struct Attractor {
///     location: Vec3,
///     radius: f32,
///     octree_id: Option<ElementId>,
/// }
///
/// struct AttractorSemantics;
///
/// impl OctreeSemantics<Attractor> for AttractorSemantics {
///     const MAX_ELEMENTS_PER_LEAF: usize = 16;
///     const MAX_NODE_DEPTH: usize = 12;
///     const MIN_INCLUSIVE_ELEMENTS_PER_NODE: usize = 7;
///
///     fn bounding_box(attractor: &Attractor) -> BoxCenterAndExtent {
///         BoxCenterAndExtent::from_sphere(attractor.location, attractor.radius)
///     }
///
///     fn set_element_id(attractor: &mut Attractor, id: ElementId) {
///         attractor.octree_id = Some(id);
///     }
/// }
///
/// let mut octree = Octree::<Attractor, AttractorSemantics>::new(Vec3::ZERO, 1024.0);
/// let id = octree.add_element(Attractor { location: Vec3::ONE, radius: 2.0, octree_id: None });
///
/// assert_eq!(octree.element_by_id(id).octree_id, Some(id));
/// ```
pub trait OctreeSemantics<E> {
    /// Number of elements a leaf holds before it is subdivided.
    const MAX_ELEMENTS_PER_LEAF: usize;

    /// Depth past which leaves are no longer subdivided.
    const MAX_NODE_DEPTH: usize;

    /// A removal that leaves a subtree with fewer elements than this collapses the subtree into
    /// a single leaf. `0` never collapses.
    const MIN_INCLUSIVE_ELEMENTS_PER_NODE: usize = 0;

    /// Returns the bounding box of the element.
    fn bounding_box(element: &E) -> BoxCenterAndExtent;

    /// Called whenever the element is placed in a node or moved within the tree, with the
    /// identifier that is valid from now on.
    #[inline]
    fn set_element_id(element: &mut E, id: ElementId) {
        let _ = (element, id);
    }
}

/// Trait for elements that know their own bounding box.
///
/// Can be derived for structs with a `bounds` field or `center` and `extent` fields. A field
/// named `octree_id` of type `Option<ElementId>` receives the element's identifier.
pub trait Bounded {
    /// Returns the bounding box of the element.
    fn bounds(&self) -> BoxCenterAndExtent;

    /// Stores the identifier of the element in its octree.
    #[inline]
    fn set_element_id(&mut self, id: ElementId) {
        let _ = id;
    }
}

impl Bounded for BoxCenterAndExtent {
    #[inline]
    fn bounds(&self) -> BoxCenterAndExtent {
        *self
    }
}

impl<T> Bounded for (BoxCenterAndExtent, T) {
    #[inline]
    fn bounds(&self) -> BoxCenterAndExtent {
        self.0
    }
}

/// [`OctreeSemantics`] for any [`Bounded`] element, configured through const generics.
///
/// The defaults match a typical scene index: 16 elements per leaf, a depth of 12 and no
/// collapsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundedSemantics<
    const MAX_ELEMENTS_PER_LEAF: usize = 16,
    const MAX_NODE_DEPTH: usize = 12,
    const MIN_INCLUSIVE_ELEMENTS_PER_NODE: usize = 0,
>;

impl<E, const MAX_ELEMENTS: usize, const MAX_DEPTH: usize, const MIN_INCLUSIVE: usize>
    OctreeSemantics<E> for BoundedSemantics<MAX_ELEMENTS, MAX_DEPTH, MIN_INCLUSIVE>
where
    E: Bounded,
{
    const MAX_ELEMENTS_PER_LEAF: usize = MAX_ELEMENTS;
    const MAX_NODE_DEPTH: usize = MAX_DEPTH;
    const MIN_INCLUSIVE_ELEMENTS_PER_NODE: usize = MIN_INCLUSIVE;

    #[inline]
    fn bounding_box(element: &E) -> BoxCenterAndExtent {
        element.bounds()
    }

    #[inline]
    fn set_element_id(element: &mut E, id: ElementId) {
        element.set_element_id(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounded;
    use glam::Vec3;

    #[derive(Bounded)]
    struct Foliage {
        center: Vec3,
        extent: Vec3,
    }

    #[derive(Bounded)]
    struct Primitive {
        bounds: BoxCenterAndExtent,
        octree_id: Option<ElementId>,
    }

    #[test]
    fn derived_bounds() {
        let foliage = Foliage {
            center: Vec3::ONE,
            extent: Vec3::splat(0.5),
        };
        assert_eq!(
            foliage.bounds(),
            BoxCenterAndExtent::new(Vec3::ONE, Vec3::splat(0.5))
        );

        let mut primitive = Primitive {
            bounds: BoxCenterAndExtent::from_point(Vec3::X),
            octree_id: None,
        };
        assert_eq!(primitive.bounds(), BoxCenterAndExtent::from_point(Vec3::X));

        let id = ElementId::new(3, 1);
        <BoundedSemantics as OctreeSemantics<Primitive>>::set_element_id(&mut primitive, id);
        assert_eq!(primitive.octree_id, Some(id));
    }

    #[test]
    fn tuple_bounds() {
        let element = (BoxCenterAndExtent::from_sphere(Vec3::ZERO, 2.0), "payload");

        assert_eq!(
            <BoundedSemantics<4, 8> as OctreeSemantics<_>>::bounding_box(&element),
            BoxCenterAndExtent::new(Vec3::ZERO, Vec3::splat(2.0))
        );
    }
}
