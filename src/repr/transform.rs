//! Post-construction transforms: ID assignment and pruning.

use std::collections::VecDeque;

use super::node::{Node, NodeId, ProductNode, SumNode};

/// Assign a unique id to every node, breadth-first from the root.
///
/// The root gets id 0; children are numbered in discovery order.
pub fn assign_ids<L>(root: &mut Node<L>) {
    let mut next: NodeId = 0;
    let mut queue: VecDeque<&mut Node<L>> = VecDeque::new();
    queue.push_back(root);

    while let Some(node) = queue.pop_front() {
        match node {
            Node::Sum(n) => {
                n.id = next;
                queue.extend(n.children.iter_mut());
            }
            Node::Product(n) => {
                n.id = next;
                queue.extend(n.children.iter_mut());
            }
            Node::Leaf(n) => n.id = next,
        }
        next += 1;
    }
}

/// Compact a network by removing redundant structure.
///
/// Two rewrites are applied bottom-up until neither matches:
/// - a Sum or Product with a single child is replaced by that child
/// - a child of the same type as its parent is inlined into the parent;
///   for sums, the inner weights are multiplied through by the child's
///   own mixture weight
///
/// Ids are left untouched; rerun [`assign_ids`] if contiguous ids are
/// needed after pruning.
pub fn prune<L>(node: Node<L>) -> Node<L> {
    match node {
        Node::Leaf(_) => node,
        Node::Product(mut p) => {
            let mut children: Vec<Node<L>> = p.children.drain(..).map(prune).collect();
            if children.len() == 1 {
                return children.swap_remove(0);
            }

            let mut flat = Vec::with_capacity(children.len());
            for child in children {
                match child {
                    Node::Product(inner) => flat.extend(inner.children),
                    other => flat.push(other),
                }
            }
            Node::Product(ProductNode {
                id: p.id,
                scope: p.scope,
                children: flat,
            })
        }
        Node::Sum(mut s) => {
            let mut children: Vec<Node<L>> = s.children.drain(..).map(prune).collect();
            if children.len() == 1 {
                return children.swap_remove(0);
            }

            let mut flat = Vec::with_capacity(children.len());
            let mut weights = Vec::with_capacity(children.len());
            for (child, weight) in children.into_iter().zip(s.weights) {
                match child {
                    Node::Sum(inner) => {
                        for (grandchild, inner_weight) in
                            inner.children.into_iter().zip(inner.weights)
                        {
                            flat.push(grandchild);
                            weights.push(weight * inner_weight);
                        }
                    }
                    other => {
                        flat.push(other);
                        weights.push(weight);
                    }
                }
            }
            Node::Sum(SumNode {
                id: s.id,
                scope: s.scope,
                weights,
                children: flat,
            })
        }
    }
}
