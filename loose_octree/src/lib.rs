#![warn(missing_docs)]
//! # Loose octree
//!
//! A loose octree spatial index for elements with axis-aligned bounding boxes, answering "which
//! elements overlap this box" queries while supporting fast addition and O(1) removal.
//!
//! ## Goals
//!
//! The octree is meant for scene indices that change every frame: visibility primitives,
//! lighting cache samples, foliage instances or crowd attractors. Elements are stored by value
//! in the deepest node whose bounds contain them. The identifier of an element is reported back
//! every time it is placed or moved, so that it can be removed without searching the tree.
//!
//! Nodes are *loose*: the bounds of each child are expanded past its half of the parent by
//! `1 / 16` of its extent. Elements straddling a split plane by a small amount can still sink
//! into a child instead of piling up in the parent.
//!
//! Enable the `parallel` feature to run batches of queries over
//! [rayon](https://github.com/rayon-rs/rayon) and the `simd` feature to test boxes with
//! [wide](https://github.com/Lokathor/wide) lanes.
//!
//! ## Using the octree
//!
//! How elements are stored is described at compile time by a type implementing
//! [`OctreeSemantics`]: the bounding box of an element, how its identifier is recorded and the
//! constants driving subdivision.
//!
//! ### Getting started
//!
//! Elements implementing [`Bounded`] can use the [`BoundedSemantics`]. When the type has a field
//! named `bounds` or fields named `center` and `extent`, you can derive the trait. An optional
//! `octree_id` field receives the identifier of the element.
//!
//! ```
//! use loose_octree::prelude::*;
//! use glam::Vec3;
//!
//! #[derive(Bounded)]
//! struct Primitive {
//!     bounds: BoxCenterAndExtent,
//!     octree_id: Option<ElementId>,
//! }
//!
//! let mut octree = Octree::<Primitive, BoundedSemantics>::new(Vec3::ZERO, 1024.0);
//!
//! for x in 0..100 {
//!     let center = Vec3::new(x as f32 * 10.0, 0.0, 0.0);
//!     octree.add_element(Primitive {
//!         bounds: BoxCenterAndExtent::new(center, Vec3::splat(2.0)),
//!         octree_id: None,
//!     });
//! }
//!
//! let view = BoxCenterAndExtent::from_min_max(Vec3::new(95.0, -1.0, -1.0), Vec3::new(125.0, 1.0, 1.0));
//! assert_eq!(octree.iter_box(view).count(), 3);
//!
//! // Identifiers stored by the elements are kept up to date by the octree.
//! let id = octree.iter_box(view).next().and_then(|primitive| primitive.octree_id).unwrap();
//! octree.remove_element(id);
//! assert_eq!(octree.iter_box(view).count(), 2);
//! ```
//!
//! If you can't implement [`Bounded`], it is implemented for tuples of a bounding box and any
//! payload.
//!
//! ```
//! # use loose_octree::prelude::*;
//! # use glam::Vec3;
//! let mut octree = Octree::<(BoxCenterAndExtent, &str), BoundedSemantics<4, 8>>::new(Vec3::ZERO, 64.0);
//! let id = octree.add_element((BoxCenterAndExtent::from_sphere(Vec3::ONE, 0.5), "light"));
//!
//! assert_eq!(octree.element_by_id(id).1, "light");
//! assert_eq!(octree.remove_element(id).1, "light");
//! assert!(octree.is_empty());
//! ```
//!
//! <details>
//! <summary><h4>Advanced usage</h4></summary>
//!
//! #### Custom traversals
//!
//! [`Octree::node_iter`] returns a [`NodeIterator`] that only visits the children explicitly
//! pushed while visiting their parent. Combined with [`NodeContext`], which derives the loose
//! bounds of children on the way down, it allows traversals with any culling test.
//!
//! ```
//! use loose_octree::prelude::*;
//! use glam::Vec3;
//!
//! let mut octree = Octree::<BoxCenterAndExtent, BoundedSemantics<2, 8>>::new(Vec3::ZERO, 64.0);
//! for x in [-40.0, -20.0, 20.0, 40.0] {
//!     octree.add_element(BoxCenterAndExtent::from_point(Vec3::new(x, 1.0, 1.0)));
//! }
//!
//! // Only visit the children on the positive X side.
//! let mut nodes = octree.node_iter();
//! let mut visited = Vec::new();
//!
//! while let Some((node, context)) = nodes.current() {
//!     visited.extend(node.elements().iter().map(|element| element.center.x));
//!
//!     for (child, _) in node.children() {
//!         if context.child_center(child).x > context.bounds.center.x {
//!             nodes.push_child(child);
//!         }
//!     }
//!     nodes.advance();
//! }
//!
//! visited.sort_by(f32::total_cmp);
//! assert_eq!(visited, vec![20.0, 40.0]);
//! ```
//! </details>

extern crate self as loose_octree;

/// Axis-aligned bounding boxes.
pub mod bounds;
/// Identification of the children of a node.
pub mod child;
/// Bounds of nodes derived during traversals.
pub mod context;
/// Iterators over the nodes and elements of an octree.
pub mod iterator;
/// Nodes of an octree.
pub mod node;
/// The octree itself.
pub mod octree;
/// Batched queries using multiple CPU threads.
#[cfg(feature = "parallel")]
pub mod parallel;
/// Description of how elements are stored.
pub mod semantics;
/// Statistics about the shape of an octree.
pub mod stats;

pub use bounds::BoxCenterAndExtent;
pub use child::{ChildNodeRef, ChildNodeSubset};
pub use context::{NodeContext, LOOSENESS_DENOMINATOR};
pub use iterator::{ElementBoxIterator, NodeIterator, Nodes};
pub use node::{Node, NodeId, NodeRef};
pub use octree::{ElementId, Octree};
pub use semantics::{Bounded, BoundedSemantics, OctreeSemantics};
pub use stats::OctreeStats;

pub use glam;
pub use loose_octree_derive::Bounded;

/// Commonly used types, re-exported.
pub mod prelude {
    // Common traits and the `Bounded` derive macro.
    pub use crate::{Bounded, BoundedSemantics, OctreeSemantics};

    pub use crate::{
        BoxCenterAndExtent, ChildNodeRef, ChildNodeSubset, ElementId, NodeContext, NodeRef, Octree,
    };

    #[cfg(feature = "parallel")]
    pub use rayon::prelude::*;
}
