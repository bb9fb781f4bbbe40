//! Bit-level references to the eight children of an octree node.
//!
//! A child is identified by a 3-bit index where bit 0 is the X side, bit 1 the Y side and bit 2
//! the Z side (`1` meaning the positive half of the parent). Bit 3 marks the null reference
//! produced once iteration has gone past the last child.

/// Number of children of an octree node.
pub const CHILD_COUNT: usize = 8;

const INDEX_MASK: u8 = 0b0111;
const NULL_BIT: u8 = 0b1000;

/// A reference to one of the eight children of an octree node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChildNodeRef(u8);

impl ChildNodeRef {
    /// The null reference, which doesn't refer to any child.
    pub const NULL: Self = Self(NULL_BIT);

    /// Creates a reference from the side of the child on each axis.
    #[inline]
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self(x as u8 | (y as u8) << 1 | (z as u8) << 2)
    }

    /// Creates a reference from a child index in `0..8`.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < CHILD_COUNT);
        Self(index as u8 & INDEX_MASK)
    }

    /// Returns the index of the child in `0..8`.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    /// Returns `true` if the child is on the positive side of the X split.
    #[inline]
    pub const fn x(self) -> bool {
        self.0 & 0b001 != 0
    }

    /// Returns `true` if the child is on the positive side of the Y split.
    #[inline]
    pub const fn y(self) -> bool {
        self.0 & 0b010 != 0
    }

    /// Returns `true` if the child is on the positive side of the Z split.
    #[inline]
    pub const fn z(self) -> bool {
        self.0 & 0b100 != 0
    }

    /// Returns the side of the child on each axis as an array.
    #[inline]
    pub const fn sides(self) -> [bool; 3] {
        [self.x(), self.y(), self.z()]
    }

    /// Advances the reference to the next child. Past the last child, the reference becomes
    /// null instead of wrapping around.
    #[inline]
    pub fn advance(&mut self) {
        if self.index() < CHILD_COUNT - 1 {
            self.0 += 1;
        } else {
            self.0 |= NULL_BIT;
        }
    }

    /// Returns `true` if the reference doesn't refer to any child.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 & NULL_BIT != 0
    }

    /// Returns an iterator over the eight children in index order.
    #[inline]
    pub const fn all() -> ChildNodeRefs {
        ChildNodeRefs(Self(0))
    }
}

/// Iterator over the eight children of a node in index order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Debug)]
pub struct ChildNodeRefs(ChildNodeRef);

impl Iterator for ChildNodeRefs {
    type Item = ChildNodeRef;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.0;
        (!current.is_null()).then(|| {
            self.0.advance();
            current
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.0.is_null() {
            0
        } else {
            CHILD_COUNT - self.0.index()
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildNodeRefs {}

impl std::iter::FusedIterator for ChildNodeRefs {}

/// A subset of the children of an octree node.
///
/// Stores, for each axis, whether the children on the positive side and the children on the
/// negative side belong to the subset. Bits `0..3` hold the positive sides and bits `3..6` the
/// negative sides, both in X, Y, Z order. A child belongs to the subset if, on every axis, the
/// side it lies on is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChildNodeSubset(u8);

impl ChildNodeSubset {
    /// The empty subset.
    pub const EMPTY: Self = Self(0);

    /// The subset of all eight children.
    pub const ALL: Self = Self::from_bits(INDEX_MASK, INDEX_MASK);

    /// Creates a subset from its positive and negative side bits.
    #[inline]
    pub const fn from_bits(positive: u8, negative: u8) -> Self {
        Self((positive & INDEX_MASK) | (negative & INDEX_MASK) << 3)
    }

    /// Creates a subset that contains a single child.
    #[inline]
    pub const fn single(child: ChildNodeRef) -> Self {
        let index = child.index() as u8;
        Self::from_bits(index, !index)
    }

    /// Returns the bits of the positive sides.
    #[inline]
    pub const fn positive_bits(self) -> u8 {
        self.0 & INDEX_MASK
    }

    /// Returns the bits of the negative sides.
    #[inline]
    pub const fn negative_bits(self) -> u8 {
        self.0 >> 3 & INDEX_MASK
    }

    /// Returns `true` if the subset contains the given child.
    #[inline]
    pub const fn contains(self, child: ChildNodeRef) -> bool {
        let single = Self::single(child).0;
        self.0 & single == single
    }

    /// Returns `true` if no child belongs to the subset.
    #[inline]
    pub const fn is_empty(self) -> bool {
        // Empty as soon as one axis has neither side set.
        self.positive_bits() | self.negative_bits() != INDEX_MASK
    }

    /// Returns an iterator over the children of the subset in index order.
    #[inline]
    pub fn iter(self) -> impl Iterator<Item = ChildNodeRef> {
        ChildNodeRef::all().filter(move |&child| self.contains(child))
    }
}
