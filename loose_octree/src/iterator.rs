use crate::{
    bounds::BoxCenterAndExtent,
    child::ChildNodeRef,
    context::NodeContext,
    node::NodeRef,
    octree::Octree,
    semantics::OctreeSemantics,
};
use std::marker::PhantomData;

/// Stack-based octree node visitor.
///
/// The iterator starts at a node and only visits the nodes explicitly pushed with
/// [`NodeIterator::push_child`], in last-in first-out order. Contexts are derived on the way
/// down, so nodes are visited along with their bounds.
#[derive(Debug)]
pub struct NodeIterator<'a, E> {
    current: Option<(NodeRef<'a, E>, NodeContext)>,
    stack: Vec<(NodeRef<'a, E>, NodeContext)>,
}

impl<'a, E> NodeIterator<'a, E> {
    /// Starts iterating at the given node.
    #[inline]
    pub fn new(node: NodeRef<'a, E>, context: NodeContext) -> Self {
        Self::with_capacity(node, context, 0)
    }

    /// Starts iterating at the given node, with room for `capacity` pending nodes.
    #[inline]
    pub fn with_capacity(node: NodeRef<'a, E>, context: NodeContext, capacity: usize) -> Self {
        Self {
            current: Some((node, context)),
            stack: Vec::with_capacity(capacity),
        }
    }

    /// Returns a stack capacity large enough for a path from the root to a leaf at `max_depth`
    /// along with the siblings of every node on that path.
    #[inline]
    pub const fn stack_capacity(max_depth: usize) -> usize {
        7 * max_depth + 8
    }

    /// Pushes a child of the current node onto the stack of nodes to visit.
    ///
    /// Children that were never allocated are skipped.
    #[inline]
    pub fn push_child(&mut self, child: ChildNodeRef) {
        if let Some((node, context)) = self.current {
            if let Some(child_node) = node.child(child) {
                self.stack.push((child_node, context.child_context(child)));
            }
        }
    }

    /// Moves on to the most recently pushed node.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.stack.pop();
    }

    /// Returns `true` if there is a node being visited.
    #[inline]
    pub fn has_pending_nodes(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the node being visited and its context.
    #[inline]
    pub fn current(&self) -> Option<(NodeRef<'a, E>, NodeContext)> {
        self.current
    }

    /// Returns the node being visited.
    #[inline]
    pub fn current_node(&self) -> Option<NodeRef<'a, E>> {
        self.current.map(|(node, _)| node)
    }

    /// Returns the context of the node being visited.
    #[inline]
    pub fn current_context(&self) -> Option<&NodeContext> {
        self.current.as_ref().map(|(_, context)| context)
    }
}

/// Iterator over every node of an octree that contains elements, and the root.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct Nodes<'a, E>(pub(crate) NodeIterator<'a, E>);

impl<'a, E> Iterator for Nodes<'a, E> {
    type Item = (NodeRef<'a, E>, NodeContext);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (node, context) = self.0.current()?;

        for (child, _) in node.children() {
            self.0.push_child(child);
        }
        self.0.advance();

        Some((node, context))
    }
}

impl<E> std::iter::FusedIterator for Nodes<'_, E> {}

/// Iterator over the elements of an octree whose bounding box intersects a query box.
///
/// Subtrees are culled with the loose bounds of their nodes, then every element of a visited
/// node is tested against its own bounding box. Elements are yielded exactly once each, in no
/// particular order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug)]
pub struct ElementBoxIterator<'a, E, S> {
    query: BoxCenterAndExtent,
    nodes: NodeIterator<'a, E>,
    elements: std::slice::Iter<'a, E>,
    semantics: PhantomData<fn() -> S>,
}

impl<'a, E, S> ElementBoxIterator<'a, E, S>
where
    S: OctreeSemantics<E>,
{
    /// Starts iterating over the elements of the octree intersecting the given box.
    pub fn new(octree: &'a Octree<E, S>, query: BoxCenterAndExtent) -> Self {
        let mut result = Self {
            query,
            nodes: octree.node_iter(),
            elements: octree.root().elements().iter(),
            semantics: PhantomData,
        };
        result.process_children();
        result
    }

    /// Returns the box elements are tested against.
    #[inline]
    pub const fn query(&self) -> &BoxCenterAndExtent {
        &self.query
    }

    /// Pushes the non-empty children of the current node that intersect the query.
    #[inline]
    fn process_children(&mut self) {
        if let Some((node, context)) = self.nodes.current() {
            for child in context.intersecting_children(&self.query).iter() {
                if node.has_child(child) {
                    self.nodes.push_child(child);
                }
            }
        }
    }
}

impl<'a, E, S> Iterator for ElementBoxIterator<'a, E, S>
where
    S: OctreeSemantics<E>,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        while self.nodes.has_pending_nodes() {
            match self.elements.next() {
                Some(element) => {
                    if S::bounding_box(element).intersects(&self.query) {
                        return Some(element);
                    }
                }
                None => {
                    self.nodes.advance();
                    if let Some(node) = self.nodes.current_node() {
                        self.process_children();
                        self.elements = node.elements().iter();
                    }
                }
            }
        }

        None
    }
}

impl<E, S> std::iter::FusedIterator for ElementBoxIterator<'_, E, S> where S: OctreeSemantics<E> {}
