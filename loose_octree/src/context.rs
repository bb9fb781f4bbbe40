use crate::{
    bounds::BoxCenterAndExtent,
    child::{ChildNodeRef, ChildNodeSubset},
};
use glam::Vec3;

/// Node bounds are expanded by their tight extent divided by this value.
pub const LOOSENESS_DENOMINATOR: f32 = 16.0;

/// The context of an octree node, derived while traversing the tree.
///
/// Nodes don't store their bounds; the bounds of a child are recomputed from its parent's
/// context on the way down. Nodes are cubes: only the X extent of the bounds is used to size
/// the children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeContext {
    /// The loose bounds of the node.
    pub bounds: BoxCenterAndExtent,
    /// The loose extent of the node's children.
    pub child_extent: f32,
    /// The offset of the children's centers from the center of this node, on every axis.
    pub child_center_offset: f32,
}

impl NodeContext {
    /// Creates the context of a node with the given bounds.
    #[inline]
    pub fn new(bounds: BoxCenterAndExtent) -> Self {
        let child_extent = Self::loose_child_extent(bounds.extent.x);

        Self {
            bounds,
            child_extent,
            child_center_offset: bounds.extent.x - child_extent,
        }
    }

    /// Returns the loose extent of the children of a node with the given extent.
    ///
    /// A child's tight extent is half its parent's, expanded by `1 / LOOSENESS_DENOMINATOR`.
    #[inline]
    pub fn loose_child_extent(extent: f32) -> f32 {
        let tight_child_extent = extent * 0.5;
        tight_child_extent * (1.0 + 1.0 / LOOSENESS_DENOMINATOR)
    }

    /// Returns the center of the given child.
    #[inline]
    pub fn child_center(&self, child: ChildNodeRef) -> Vec3 {
        let [x, y, z] = child.sides().map(|positive| self.child_offset(positive));
        self.bounds.center + Vec3::new(x, y, z)
    }

    /// Returns the loose bounds of the given child.
    #[inline]
    pub fn child_bounds(&self, child: ChildNodeRef) -> BoxCenterAndExtent {
        BoxCenterAndExtent::new(self.child_center(child), Vec3::splat(self.child_extent))
    }

    /// Returns the context of the given child.
    #[inline]
    pub fn child_context(&self, child: ChildNodeRef) -> Self {
        Self::new(self.child_bounds(child))
    }

    /// Returns the subset of children whose loose bounds intersect the given box.
    ///
    /// Agrees exactly with [`BoxCenterAndExtent::intersects`] applied to
    /// [`NodeContext::child_bounds`] for every child.
    pub fn intersecting_children(&self, query: &BoxCenterAndExtent) -> ChildNodeSubset {
        let center = self.bounds.center.to_array();
        let query_center = query.center.to_array();
        let query_extent = query.extent.to_array();

        let mut positive = 0;
        let mut negative = 0;

        for axis in 0..3 {
            let composite_extent = self.child_extent + query_extent[axis];
            let overlaps = |positive_side: bool| {
                let child_center = center[axis] + self.child_offset(positive_side);
                !((child_center - query_center[axis]).abs() > composite_extent)
            };

            positive |= u8::from(overlaps(true)) << axis;
            negative |= u8::from(overlaps(false)) << axis;
        }

        ChildNodeSubset::from_bits(positive, negative)
    }

    /// Returns the child whose loose bounds entirely contain the given box, if any.
    ///
    /// Only the child on the side of the box's center is a candidate. Returns `None` when the
    /// box straddles the loose bounds of that child, in which case it has to be stored in this
    /// node.
    #[inline]
    pub fn containing_child(&self, query: &BoxCenterAndExtent) -> Option<ChildNodeRef> {
        // The comparison mask has the same X, Y, Z bit layout as a child index.
        let child = ChildNodeRef::from_index(query.center.cmpgt(self.bounds.center).bitmask() as usize);

        self.child_bounds(child).contains(query).then_some(child)
    }

    #[inline]
    fn child_offset(&self, positive: bool) -> f32 {
        self.child_center_offset * if positive { 1.0 } else { -1.0 }
    }
}
