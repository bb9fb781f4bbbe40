use crate::{
    bounds::BoxCenterAndExtent,
    child::ChildNodeRef,
    context::NodeContext,
    iterator::{ElementBoxIterator, NodeIterator, Nodes},
    node::{Node, NodeId, NodeRef, ROOT},
    semantics::OctreeSemantics,
};
use glam::Vec3;
use std::marker::PhantomData;

/// Identifier of an element in an [`Octree`]: its node and its index in that node.
///
/// Identifiers are reported through [`OctreeSemantics::set_element_id`] and stay valid until
/// the element is removed or moved, in which case a new identifier is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId {
    node: NodeId,
    index: u32,
}

impl ElementId {
    /// Creates a new [`ElementId`] from a node and an index in that node.
    #[inline]
    pub const fn new(node: NodeId, index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self {
            node,
            index: index as u32,
        }
    }

    /// Returns the node the element is stored in.
    #[inline]
    pub const fn node(self) -> NodeId {
        self.node
    }

    /// Returns the index of the element in its node.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

/// A loose octree storing elements of type `E` as described by the semantics `S`.
///
/// Elements are stored in the deepest node whose loose bounds entirely contain them. Loose
/// bounds extend past the tight half of the parent by `1 / 16` of the child's extent, so that
/// elements close to a split plane can still sink into a single child.
///
/// The tree isn't internally synchronised, mutations require exclusive access.
pub struct Octree<E, S> {
    nodes: Vec<Node<E>>,
    free_nodes: Vec<NodeId>,
    root_context: NodeContext,
    min_leaf_extent: f32,
    semantics: PhantomData<fn() -> S>,
}

impl<E, S> Octree<E, S>
where
    S: OctreeSemantics<E>,
{
    /// Creates a new empty [`Octree`] covering the cube of the given center and half-extent.
    pub fn new(origin: Vec3, extent: f32) -> Self {
        let root_context = NodeContext::new(BoxCenterAndExtent::new(origin, Vec3::splat(extent)));
        // Extent of a node at the maximum depth, derived exactly like the nodes' own.
        let min_leaf_extent =
            (0..S::MAX_NODE_DEPTH).fold(extent, |extent, _| NodeContext::loose_child_extent(extent));

        Self {
            nodes: vec![Node::new(None)],
            free_nodes: Vec::new(),
            root_context,
            min_leaf_extent,
            semantics: PhantomData,
        }
    }

    /// Adds an element to the octree and returns its identifier.
    ///
    /// Never fails: elements that don't fit in any child, including those outside of the root
    /// bounds, are stored in the root.
    ///
    /// The returned identifier is only valid until the element is moved: a later `add_element`
    /// may subdivide its node, and a removal may swap it into another slot or collapse its
    /// subtree. Every move is reported through [`OctreeSemantics::set_element_id`], which always
    /// receives the current identifier.
    pub fn add_element(&mut self, element: E) -> ElementId {
        let context = self.root_context;
        self.add_element_to_node(element, ROOT, context)
    }

    /// Removes the element with the given identifier and returns it.
    ///
    /// The last element of the node takes the place of the removed one and its new identifier
    /// is reported through [`OctreeSemantics::set_element_id`]. When
    /// [`OctreeSemantics::MIN_INCLUSIVE_ELEMENTS_PER_NODE`] is set, the largest subtree pushed
    /// under that count is collapsed into a leaf and the identifiers of its elements are
    /// reported again.
    ///
    /// # Panics
    ///
    /// May panic if the identifier doesn't refer to an element of this tree. Identifiers of
    /// removed or moved elements must not be reused.
    pub fn remove_element(&mut self, id: ElementId) -> E {
        let node = &mut self.nodes[id.node as usize];
        debug_assert!(id.index() < node.elements.len(), "stale element id {id:?}");

        let element = node.elements.swap_remove(id.index());
        if let Some(swapped) = node.elements.get_mut(id.index()) {
            S::set_element_id(swapped, id);
        }

        // Update the counts up to the root, remembering the highest node to collapse.
        let mut collapse = None;
        let mut current = Some(id.node);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id as usize];
            node.inclusive_num_elements -= 1;

            if node.inclusive_element_count() < S::MIN_INCLUSIVE_ELEMENTS_PER_NODE {
                collapse = Some(node_id);
            }
            current = node.parent;
        }

        if let Some(node_id) = collapse.filter(|&node_id| !self.nodes[node_id as usize].is_leaf) {
            self.collapse(node_id);
        }

        element
    }

    /// Returns the element with the given identifier.
    ///
    /// # Panics
    ///
    /// May panic if the identifier doesn't refer to an element of this tree.
    #[inline]
    pub fn element_by_id(&self, id: ElementId) -> &E {
        &self.nodes[id.node as usize].elements[id.index()]
    }

    /// Returns a mutable reference to the element with the given identifier.
    ///
    /// The bounding box of the element must not be changed through this reference; remove and
    /// add the element again instead.
    ///
    /// # Panics
    ///
    /// May panic if the identifier doesn't refer to an element of this tree.
    #[inline]
    pub fn element_by_id_mut(&mut self, id: ElementId) -> &mut E {
        &mut self.nodes[id.node as usize].elements[id.index()]
    }

    /// Returns the element with the given identifier, or `None` if the identifier doesn't point
    /// to a stored element.
    #[inline]
    pub fn try_element_by_id(&self, id: ElementId) -> Option<&E> {
        self.nodes.get(id.node as usize)?.elements.get(id.index())
    }

    /// Returns an iterator over the elements whose bounding box intersects the given box.
    #[inline]
    pub fn iter_box(&self, query: BoxCenterAndExtent) -> ElementBoxIterator<'_, E, S> {
        ElementBoxIterator::new(self, query)
    }

    /// Returns a [`NodeIterator`] starting at the root of the octree.
    #[inline]
    pub fn node_iter(&self) -> NodeIterator<'_, E> {
        NodeIterator::with_capacity(
            self.root(),
            self.root_context,
            NodeIterator::<E>::stack_capacity(S::MAX_NODE_DEPTH),
        )
    }

    fn add_element_to_node(
        &mut self,
        element: E,
        mut node_id: NodeId,
        mut context: NodeContext,
    ) -> ElementId {
        let bounds = S::bounding_box(&element);

        loop {
            let node = &mut self.nodes[node_id as usize];
            node.inclusive_num_elements += 1;

            if node.is_leaf {
                let is_full = node.elements.len() >= S::MAX_ELEMENTS_PER_LEAF;
                if !is_full || context.bounds.extent.x <= self.min_leaf_extent {
                    return self.push_element(node_id, element);
                }

                // Resets the node's count, which the loop increments again for this element.
                self.subdivide(node_id, context);
                continue;
            }

            match context.containing_child(&bounds) {
                Some(child) => {
                    node_id = self.get_or_create_child(node_id, child);
                    context = context.child_context(child);
                }
                None => return self.push_element(node_id, element),
            }
        }
    }

    /// Turns a full leaf into an internal node, pushing its elements down where possible.
    fn subdivide(&mut self, node_id: NodeId, context: NodeContext) {
        let node = &mut self.nodes[node_id as usize];
        let elements = std::mem::take(&mut node.elements);
        node.inclusive_num_elements = 0;
        node.is_leaf = false;

        log::trace!(
            "subdividing node {node_id} with {} elements, extent {}",
            elements.len(),
            context.bounds.extent.x
        );

        for element in elements {
            self.add_element_to_node(element, node_id, context);
        }
    }

    /// Gathers all the elements of a subtree into its root and frees its descendants.
    fn collapse(&mut self, node_id: NodeId) {
        let node = &mut self.nodes[node_id as usize];
        let mut elements = std::mem::take(&mut node.elements);
        let mut pending = std::mem::take(&mut node.children)
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        while let Some(child_id) = pending.pop() {
            let child = std::mem::replace(&mut self.nodes[child_id as usize], Node::new(None));
            elements.extend(child.elements);
            pending.extend(child.children.into_iter().flatten());
            self.free_nodes.push(child_id);
        }

        log::trace!("collapsing node {node_id} with {} elements", elements.len());

        for (index, element) in elements.iter_mut().enumerate() {
            S::set_element_id(element, ElementId::new(node_id, index));
        }

        let node = &mut self.nodes[node_id as usize];
        debug_assert_eq!(node.inclusive_element_count(), elements.len());
        node.elements = elements;
        node.is_leaf = true;
    }

    fn push_element(&mut self, node_id: NodeId, element: E) -> ElementId {
        let elements = &mut self.nodes[node_id as usize].elements;
        let id = ElementId::new(node_id, elements.len());

        elements.push(element);
        S::set_element_id(&mut elements[id.index()], id);

        id
    }

    fn get_or_create_child(&mut self, node_id: NodeId, child: ChildNodeRef) -> NodeId {
        if let Some(child_id) = self.nodes[node_id as usize].child_id(child) {
            return child_id;
        }

        let child_id = match self.free_nodes.pop() {
            Some(child_id) => {
                self.nodes[child_id as usize] = Node::new(Some(node_id));
                child_id
            }
            None => {
                self.nodes.push(Node::new(Some(node_id)));
                (self.nodes.len() - 1) as NodeId
            }
        };

        self.nodes[node_id as usize].children[child.index()] = Some(child_id);
        child_id
    }
}

impl<E, S> Octree<E, S> {
    /// Returns the number of elements in the octree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes[ROOT as usize].inclusive_element_count()
    }

    /// Returns `true` if the octree contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the root node of the octree.
    #[inline]
    pub fn root(&self) -> NodeRef<'_, E> {
        NodeRef::new(&self.nodes, ROOT)
    }

    /// Returns the context of the root node.
    #[inline]
    pub const fn root_context(&self) -> &NodeContext {
        &self.root_context
    }

    /// Returns the extent under which leaves are no longer subdivided.
    #[inline]
    pub const fn min_leaf_extent(&self) -> f32 {
        self.min_leaf_extent
    }

    /// Returns an iterator over the root and every node containing elements, along with their
    /// contexts.
    #[inline]
    pub fn iter_nodes(&self) -> Nodes<'_, E> {
        Nodes(NodeIterator::new(self.root(), self.root_context))
    }

    /// Returns an iterator over all the elements of the octree, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.nodes.iter().flat_map(Node::elements)
    }
}

impl<E: Clone, S> Clone for Octree<E, S> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            free_nodes: self.free_nodes.clone(),
            root_context: self.root_context,
            min_leaf_extent: self.min_leaf_extent,
            semantics: PhantomData,
        }
    }
}

impl<E: std::fmt::Debug, S> std::fmt::Debug for Octree<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Octree")
            .field("nodes", &self.nodes)
            .field("free_nodes", &self.free_nodes)
            .field("root_context", &self.root_context)
            .field("min_leaf_extent", &self.min_leaf_extent)
            .finish()
    }
}
