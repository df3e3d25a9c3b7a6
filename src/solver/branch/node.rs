use crate::solver::core::NodeModes;
use crate::solver::model::Basis;

/// Bounds of one column in a subproblem, replacing those of its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundChange {
    pub col: usize,
    pub lower: f64,
    pub upper: f64,
}

/// The branching decision that created a node, kept for pseudo-cost
/// updates once the node is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BranchRecord {
    pub col: usize,
    pub up: bool,
    /// distance the column value was pushed by the branch
    pub distance: f64,
}

/// An open subproblem of the branch-and-bound tree.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// bound changes from the root, applied in order
    pub bounds: Vec<BoundChange>,
    pub depth: u32,
    /// relaxation objective of the parent, a lower bound for this node
    pub estimate: f64,
    /// final basis of the parent, used as warm start
    pub basis: Option<Basis>,
    pub branch: Option<BranchRecord>,
}

impl Node {
    pub fn root() -> Self {
        Self {
            bounds: Vec::new(),
            depth: 0,
            estimate: f64::NEG_INFINITY,
            basis: None,
            branch: None,
        }
    }

    /// current bounds of `col` in this node, if they were changed
    pub fn bounds_of(&self, col: usize) -> Option<(f64, f64)> {
        self.bounds
            .iter()
            .rev()
            .find(|b| b.col == col)
            .map(|b| (b.lower, b.upper))
    }
}

/// Collection of open nodes.  The node modes decide which one is
/// explored next: the newest (depth first, the default), the oldest
/// (breadth first) or the one with the best bound (greedy).
#[derive(Debug)]
pub(crate) struct NodeQueue {
    open: Vec<Node>,
    modes: NodeModes,
}

impl NodeQueue {
    pub fn new(modes: NodeModes) -> Self {
        Self {
            open: Vec::new(),
            modes,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.open.push(node);
    }

    pub fn pop(&mut self) -> Option<Node> {
        if self.open.is_empty() {
            return None;
        }
        let k = if self.modes.contains(NodeModes::GREEDY) {
            // best bound; the deeper node on ties
            let mut best = 0;
            for (k, node) in self.open.iter().enumerate() {
                let b = &self.open[best];
                if node.estimate < b.estimate
                    || (node.estimate == b.estimate && node.depth > b.depth)
                {
                    best = k;
                }
            }
            best
        } else if self.modes.contains(NodeModes::BREADTHFIRST) {
            0
        } else {
            self.open.len() - 1
        };
        Some(self.open.remove(k))
    }

    /// Drop the nodes whose bound can no longer beat `cutoff`.   Returns
    /// the number of nodes dropped.
    pub fn prune(&mut self, cutoff: f64) -> usize {
        let before = self.open.len();
        self.open.retain(|n| n.estimate < cutoff);
        before - self.open.len()
    }

    /// smallest bound over the open nodes
    pub fn best_estimate(&self) -> Option<f64> {
        self.open.iter().map(|n| n.estimate).reduce(f64::min)
    }
}

#[test]
fn test_node_queue_order() {
    let node = |estimate: f64, depth: u32| Node {
        estimate,
        depth,
        ..Node::root()
    };

    let mut queue = NodeQueue::new(NodeModes::empty());
    queue.push(node(1.0, 1));
    queue.push(node(0.0, 2));
    queue.push(node(2.0, 3));
    assert_eq!(queue.pop().unwrap().depth, 3);

    let mut queue = NodeQueue::new(NodeModes::BREADTHFIRST);
    queue.push(node(1.0, 1));
    queue.push(node(0.0, 2));
    assert_eq!(queue.pop().unwrap().depth, 1);

    let mut queue = NodeQueue::new(NodeModes::GREEDY);
    queue.push(node(1.0, 1));
    queue.push(node(0.0, 2));
    queue.push(node(0.0, 4));
    queue.push(node(2.0, 3));
    assert_eq!(queue.best_estimate(), Some(0.0));
    assert_eq!(queue.pop().unwrap().depth, 4);

    assert_eq!(queue.prune(1.0), 2);
    assert_eq!(queue.len(), 1);
    assert!(!queue.is_empty());
}
