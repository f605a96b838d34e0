use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    /// Single-letter tag used by the tree dump.
    pub(crate) const fn symbol(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

/// Which child slot of a node to look at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// One stored key. Absent links stand for the shared nil leaf: black, size zero.
pub(crate) struct Node<K> {
    pub(crate) key: K,
    // Number of nodes in the subtree rooted here, this one included.
    pub(crate) size: usize,
    pub(crate) color: Color,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K> Node<K> {
    /// A freshly inserted node: red, a leaf, and counting only itself.
    pub(crate) const fn new(key: K, parent: Option<Handle>) -> Self {
        Self {
            key,
            size: 1,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
