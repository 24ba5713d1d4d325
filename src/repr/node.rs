//! Recursive sum-product network nodes.

/// Identifier assigned to every node by [`assign_ids`](super::assign_ids).
pub type NodeId = usize;

/// A node of a sum-product network.
///
/// Ownership is strictly parent to child: the network is a tree, never a
/// DAG. The leaf payload `L` is opaque to this crate; the surrounding
/// [`LeafNode`] carries the bookkeeping (id, scope) the structure needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<L> {
    /// Weighted mixture of children sharing the same scope.
    Sum(SumNode<L>),
    /// Independent combination of children over disjoint scopes.
    Product(ProductNode<L>),
    /// Terminal distribution over the leaf's scope.
    Leaf(LeafNode<L>),
}

/// Mixture node: children share the parent's scope, one weight per child.
///
/// Weights are kept in split order and are not normalized here.
#[derive(Debug, Clone, PartialEq)]
pub struct SumNode<L> {
    pub id: NodeId,
    /// Original dataset column ids this node is responsible for.
    pub scope: Vec<usize>,
    /// One weight per child, aligned by position.
    pub weights: Vec<f64>,
    pub children: Vec<Node<L>>,
}

/// Factorization node: children cover disjoint parts of the parent's scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNode<L> {
    pub id: NodeId,
    /// Original dataset column ids this node is responsible for.
    pub scope: Vec<usize>,
    pub children: Vec<Node<L>>,
}

/// Leaf wrapper around an opaque distribution model.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode<L> {
    pub id: NodeId,
    /// Original dataset column ids this leaf models.
    pub scope: Vec<usize>,
    /// The fitted distribution, created by the leaf factory collaborator.
    pub model: L,
}

impl<L> Node<L> {
    /// Node identifier (0 until [`assign_ids`](super::assign_ids) runs).
    pub fn id(&self) -> NodeId {
        match self {
            Node::Sum(n) => n.id,
            Node::Product(n) => n.id,
            Node::Leaf(n) => n.id,
        }
    }

    /// Scope of this node: original dataset column ids.
    pub fn scope(&self) -> &[usize] {
        match self {
            Node::Sum(n) => &n.scope,
            Node::Product(n) => &n.scope,
            Node::Leaf(n) => &n.scope,
        }
    }

    /// Children of this node (empty for leaves).
    pub fn children(&self) -> &[Node<L>] {
        match self {
            Node::Sum(n) => &n.children,
            Node::Product(n) => &n.children,
            Node::Leaf(_) => &[],
        }
    }

    /// Whether this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn n_nodes(&self) -> usize {
        1 + self.children().iter().map(Node::n_nodes).sum::<usize>()
    }

    /// Number of leaves in this subtree.
    pub fn n_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children().iter().map(Node::n_leaves).sum()
        }
    }
}
