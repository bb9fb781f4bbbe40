use crate::child::{ChildNodeRef, CHILD_COUNT};

/// Index of a [`Node`] in an [`Octree`](crate::Octree).
pub type NodeId = u32;

/// Identifier of the root node.
pub(crate) const ROOT: NodeId = 0;

/// A node of an [`Octree`](crate::Octree).
///
/// A node holds the elements that don't fit entirely in any of its children and owns up to eight
/// child nodes. Internal nodes can still hold elements: those that straddle the loose bounds of
/// their children.
#[derive(Clone, Debug)]
pub struct Node<E> {
    pub(crate) elements: Vec<E>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: [Option<NodeId>; CHILD_COUNT],
    pub(crate) inclusive_num_elements: u32,
    pub(crate) is_leaf: bool,
}

impl<E> Node<E> {
    /// Creates a new empty leaf node.
    #[inline]
    pub(crate) const fn new(parent: Option<NodeId>) -> Self {
        Self {
            elements: Vec::new(),
            parent,
            children: [None; CHILD_COUNT],
            inclusive_num_elements: 0,
            is_leaf: true,
        }
    }

    /// Returns the elements stored directly in this node.
    #[inline]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Returns the number of elements stored directly in this node.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns the number of elements in this node and all of its descendants.
    #[inline]
    pub const fn inclusive_element_count(&self) -> usize {
        self.inclusive_num_elements as usize
    }

    /// Returns `true` if new elements are added directly to this node rather than to its
    /// children.
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Returns the identifier of the parent node, `None` for the root.
    #[inline]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the identifier of the given child if it has been allocated, even when empty.
    #[inline]
    pub const fn child_id(&self, child: ChildNodeRef) -> Option<NodeId> {
        self.children[child.index()]
    }
}

/// A borrowed [`Node`] along with the nodes of its tree, allowing navigation.
pub struct NodeRef<'a, E> {
    nodes: &'a [Node<E>],
    id: NodeId,
}

impl<'a, E> NodeRef<'a, E> {
    #[inline]
    pub(crate) fn new(nodes: &'a [Node<E>], id: NodeId) -> Self {
        Self { nodes, id }
    }

    /// Returns the identifier of the node.
    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the referenced node.
    #[inline]
    pub fn node(&self) -> &'a Node<E> {
        &self.nodes[self.id as usize]
    }

    /// Returns the elements stored directly in the node.
    #[inline]
    pub fn elements(&self) -> &'a [E] {
        &self.node().elements
    }

    /// Returns the number of elements stored directly in the node.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.node().element_count()
    }

    /// Returns the number of elements in the node and all of its descendants.
    #[inline]
    pub fn inclusive_element_count(&self) -> usize {
        self.node().inclusive_element_count()
    }

    /// Returns `true` if the node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Returns the parent of the node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| Self::new(self.nodes, id))
    }

    /// Returns the number of ancestors of the node.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), NodeRef::parent).count()
    }

    /// Returns the given child if it has been allocated, even when empty.
    #[inline]
    pub fn child(&self, child: ChildNodeRef) -> Option<Self> {
        self.node()
            .child_id(child)
            .map(|id| Self::new(self.nodes, id))
    }

    /// Returns `true` if the given child exists and contains elements.
    ///
    /// Children emptied by removals are kept allocated but are treated as absent.
    #[inline]
    pub fn has_child(&self, child: ChildNodeRef) -> bool {
        self.child(child)
            .is_some_and(|child| child.inclusive_element_count() > 0)
    }

    /// Returns an iterator over the children that exist and contain elements.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = (ChildNodeRef, Self)> + 'a {
        let node = *self;
        ChildNodeRef::all().filter_map(move |child| {
            node.child(child)
                .filter(|node| node.inclusive_element_count() > 0)
                .map(|node| (child, node))
        })
    }
}

impl<E> Clone for NodeRef<'_, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for NodeRef<'_, E> {}

impl<E> std::fmt::Debug for NodeRef<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node();
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("element_count", &node.element_count())
            .field("inclusive_element_count", &node.inclusive_element_count())
            .field("is_leaf", &node.is_leaf)
            .finish()
    }
}
