use super::tree::{Branch, BspLeaf, BspNode, BspTree, Child, LeafId, NodeId, Segment, SegmentId};
use log::warn;
use math::Line2d;

pub trait TreeVisitor: Sized {
    fn visit_root(&mut self, _root: Child) {
        // Default impl is empty to allow visitors to mix and match.
    }

    fn visit_node(&mut self, _id: NodeId, _node: &BspNode, _branch: Option<Branch>) {
        // Default impl is empty to allow visitors to mix and match.
    }

    /// `half_spaces` are the partitions above the leaf, each oriented so the
    /// leaf lies on its right.
    fn visit_leaf(
        &mut self,
        _id: LeafId,
        _leaf: &BspLeaf,
        _branch: Option<Branch>,
        _half_spaces: &[Line2d],
    ) {
        // Default impl is empty to allow visitors to mix and match.
    }

    fn visit_segment(&mut self, _id: SegmentId, _segment: &Segment) {
        // Default impl is empty to allow visitors to mix and match.
    }

    fn visit_leaf_end(&mut self) {
        // Default impl is empty to allow visitors to mix and match.
    }

    fn visit_node_end(&mut self) {
        // Default impl is empty to allow visitors to mix and match.
    }

    fn chain<'a, 'b, V: TreeVisitor>(
        &'a mut self,
        other: &'b mut V,
    ) -> VisitorChain<'a, 'b, Self, V> {
        VisitorChain {
            first: self,
            second: other,
        }
    }
}

/// Depth-first walk of a built tree: each node's right child before its left.
pub struct TreeWalker<'a, V: TreeVisitor + 'a> {
    tree: &'a BspTree,
    visitor: &'a mut V,
    half_spaces: Vec<Line2d>,
}

impl<'a, V: TreeVisitor> TreeWalker<'a, V> {
    pub fn new(tree: &'a BspTree, visitor: &'a mut V) -> TreeWalker<'a, V> {
        TreeWalker {
            tree,
            visitor,
            half_spaces: Vec::with_capacity(32),
        }
    }

    pub fn walk(&mut self) {
        self.visitor.visit_root(self.tree.root);
        self.child(self.tree.root, None);
    }

    fn child(&mut self, child: Child, branch: Option<Branch>) {
        match child {
            Child::Leaf(id) => self.leaf(id, branch),
            Child::Node(id) => self.node(id, branch),
        }
    }

    fn node(&mut self, id: NodeId, branch: Option<Branch>) {
        let tree = self.tree;
        let node = if let Some(node) = tree.node(id) {
            node
        } else {
            warn!("Missing node with id {}, skipping.", id);
            return;
        };
        self.visitor.visit_node(id, node, branch);

        self.half_spaces.push(node.partition);
        self.child(node.right, Some(Branch::Right));
        self.half_spaces.pop();

        self.half_spaces.push(node.partition.inverted_halfspaces());
        self.child(node.left, Some(Branch::Left));
        self.half_spaces.pop();

        self.visitor.visit_node_end();
    }

    fn leaf(&mut self, id: LeafId, branch: Option<Branch>) {
        let tree = self.tree;
        let leaf = if let Some(leaf) = tree.leaf(id) {
            leaf
        } else {
            warn!("Missing leaf with id {}, skipping.", id);
            return;
        };
        self.visitor.visit_leaf(id, leaf, branch, &self.half_spaces);
        for (offset, segment) in tree.leaf_segments(id).iter().enumerate() {
            self.visitor.visit_segment(leaf.first_segment + offset, segment);
        }
        self.visitor.visit_leaf_end();
    }
}

pub struct VisitorChain<'a, 'b, A: TreeVisitor + 'a, B: TreeVisitor + 'b> {
    first: &'a mut A,
    second: &'b mut B,
}

impl<'a, 'b, A: TreeVisitor, B: TreeVisitor> TreeVisitor for VisitorChain<'a, 'b, A, B> {
    fn visit_root(&mut self, root: Child) {
        self.first.visit_root(root);
        self.second.visit_root(root);
    }

    fn visit_node(&mut self, id: NodeId, node: &BspNode, branch: Option<Branch>) {
        self.first.visit_node(id, node, branch);
        self.second.visit_node(id, node, branch);
    }

    fn visit_leaf(
        &mut self,
        id: LeafId,
        leaf: &BspLeaf,
        branch: Option<Branch>,
        half_spaces: &[Line2d],
    ) {
        self.first.visit_leaf(id, leaf, branch, half_spaces);
        self.second.visit_leaf(id, leaf, branch, half_spaces);
    }

    fn visit_segment(&mut self, id: SegmentId, segment: &Segment) {
        self.first.visit_segment(id, segment);
        self.second.visit_segment(id, segment);
    }

    fn visit_leaf_end(&mut self) {
        self.first.visit_leaf_end();
        self.second.visit_leaf_end();
    }

    fn visit_node_end(&mut self) {
        self.first.visit_node_end();
        self.second.visit_node_end();
    }
}
