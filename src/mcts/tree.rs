//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous `Vec` and referenced by [`NodeId`]
//! indices; the parent link is an index too, so nothing points back into the
//! arena. Advancing the tree copies the kept subtree into a fresh arena and
//! drops the old one in bulk.

use crate::game::{Move, Position, Side};
use crate::mcts::hyperparameters::MCTSHyperparameters;
use crate::mcts::make_rng;
use crate::mcts::node::{NodeId, NodeStats, SearchNode};
use crate::mcts::rollout::{self, RolloutOutcome};
use crate::mcts::selection::{select_best_child, ScoringPolicy};
use crate::{Error, Result};
use rand::rngs::StdRng;

#[derive(Debug)]
pub struct SearchTree<P: Position> {
    nodes: Vec<SearchNode<P>>,
    root: NodeId,
    /// Side every reward is measured for; fixed for the tree's lifetime.
    perspective: Side,
    pub(crate) params: MCTSHyperparameters,
    rng: StdRng,
}

impl<P: Position> SearchTree<P> {
    /// Tree optimizing for `side`, which is also the side to move at the root.
    pub fn new(position: P, side: Side, params: MCTSHyperparameters) -> Self {
        let seed = params.seed;
        Self::with_seed(position, side, params, seed)
    }

    pub fn with_seed(position: P, side: Side, params: MCTSHyperparameters, seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let prior = NodeStats::with_rave_prior(params.rave_prior_visits, params.rave_prior_reward);
        let root = SearchNode::new(None, position, None, side, prior, &mut rng);
        SearchTree {
            nodes: vec![root],
            root: NodeId(0),
            perspective: side,
            params,
            rng,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn root_node(&self) -> &SearchNode<P> {
        self.node(self.root)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode<P> {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SearchNode<P> {
        &mut self.nodes[id.0]
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn perspective(&self) -> Side {
        self.perspective
    }

    pub fn params(&self) -> &MCTSHyperparameters {
        &self.params
    }

    /// True when the root position has no legal move.
    pub fn is_terminal(&self) -> bool {
        self.root_node().is_terminal()
    }

    /// Subtree-size counter of the root.
    pub fn size(&self) -> u32 {
        self.root_node().size()
    }

    fn prior(&self) -> NodeStats {
        NodeStats::with_rave_prior(self.params.rave_prior_visits, self.params.rave_prior_reward)
    }

    fn allocate(&mut self, node: SearchNode<P>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Expands one untried move of `id`, then runs a rollout from the new
    /// child and backpropagates it. Returns `None` for terminal or fully
    /// expanded nodes.
    ///
    /// An untried move that no longer applies means the position's legality
    /// checks are inconsistent; the search is aborted with
    /// [`Error::InvariantViolation`].
    pub fn expand(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        if self.node(id).is_fully_expanded() {
            return Ok(None);
        }
        let Some(mv) = self.node_mut(id).untried.pop() else {
            return Ok(None);
        };

        let mut next_position = self.node(id).position.clone();
        let outcome = next_position.apply(mv);
        if !outcome.is_legal() {
            log::error!("untried move {} rejected during expansion: {:?}", mv, outcome);
            return Err(Error::InvariantViolation {
                cell: mv.cell,
                reason: format!("pre-validated move rejected with {:?}", outcome),
            });
        }

        let next_side = self.node(id).to_move.opponent();
        let prior = self.prior();
        let child = SearchNode::new(Some(id), next_position, Some(mv), next_side, prior, &mut self.rng);
        let child_id = self.allocate(child);

        let parent = self.node_mut(id);
        if let Some(slot) = parent.child_by_cell.get_mut(mv.cell) {
            *slot = Some(child_id);
        }
        parent.children.push(child_id);

        let outcome = self.simulate_from(child_id)?;
        self.backpropagate(child_id, outcome.reward, outcome.history);

        Ok(Some(child_id))
    }

    /// Random playout from `id`'s position. Zero plies for a terminal node.
    pub fn simulate_from(&mut self, id: NodeId) -> Result<RolloutOutcome> {
        let node = &self.nodes[id.0];
        rollout::simulate(node.position.clone(), node.to_move, self.perspective, &mut self.rng)
    }

    /// Adds `reward` and one visit to `from` and every ancestor up to the
    /// root. With RAVE enabled, each ancestor also credits the RAVE
    /// statistics of any child whose move appears in `history`, played by
    /// the ancestor's side to move. The tree path below each ancestor is
    /// appended to `history` on the way up.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64, mut history: Vec<Move>) {
        let rave = self.params.rave_enabled;
        let mut current = Some(from);
        let mut is_origin = true;

        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.stats.record(reward);
            if !is_origin {
                node.size += 1;
            }
            is_origin = false;

            if rave {
                let side = node.to_move;
                let credited: Vec<NodeId> = history
                    .iter()
                    .filter(|mv| mv.side == side)
                    .filter_map(|mv| node.child_for_cell(mv.cell))
                    .collect();
                for child in credited {
                    self.nodes[child.0].stats.record_rave(reward);
                }
            }

            let node = &self.nodes[id.0];
            if let Some(mv) = node.last_move {
                history.push(mv);
            }
            current = node.parent;
        }
    }

    /// Visit count of the root child reached by playing at `cell`; 0 when
    /// that child was never expanded.
    pub fn visit_count_for(&self, cell: usize) -> u32 {
        self.root_node()
            .child_for_cell(cell)
            .map(|child| self.node(child).stats().visits)
            .unwrap_or(0)
    }

    /// Per-cell visit counts of the root's children.
    pub fn visit_counts(&self) -> Vec<u32> {
        (0..self.root_node().position().cell_count())
            .map(|cell| self.visit_count_for(cell))
            .collect()
    }

    /// Best root move by exploitation alone (`c = 0`, RAVE off); an
    /// unvisited child is returned first. `None` if nothing was expanded.
    pub fn best_move(&self) -> Option<Move> {
        let policy = ScoringPolicy::greedy(self.perspective);
        match select_best_child(self, self.root, &policy) {
            Some(child) => self.node(child).last_move(),
            None => {
                log::warn!("tree root has no children, possibly a terminal position");
                None
            }
        }
    }

    /// Re-roots the tree at `position`. A root child with an equal position
    /// is kept with all its statistics; otherwise a fresh node is built.
    /// Every other subtree is freed. Node ids issued before are invalid.
    pub fn advance(&mut self, position: P, to_move: Side) {
        let root = self.root_node();
        if root.position == position && root.to_move == to_move {
            return;
        }

        let kept = root
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).position == position);

        let freed_before = self.nodes.len();
        match kept {
            Some(child) => self.retain_subtree(child),
            None => {
                let prior = self.prior();
                let fresh = SearchNode::new(None, position, None, to_move, prior, &mut self.rng);
                self.nodes = vec![fresh];
                self.root = NodeId(0);
            }
        }
        log::debug!(
            "advanced tree: kept {} of {} nodes (reused: {})",
            self.nodes.len(),
            freed_before,
            kept.is_some()
        );
    }

    /// Applies `mv` to the root position and advances onto the result.
    pub fn play(&mut self, mv: Move) -> Result<()> {
        let mut next = self.root_node().position.clone();
        if !next.apply(mv).is_legal() {
            return Err(Error::IllegalMove(mv));
        }
        self.advance(next, mv.side.opponent());
        Ok(())
    }

    /// Nodes in the subtree rooted at `id`, breadth first, `id` first.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = vec![id];
        let mut i = 0;
        while i < order.len() {
            order.extend_from_slice(&self.nodes[order[i].0].children);
            i += 1;
        }
        order
    }

    /// Moves the subtree under `keep` into a new arena with `keep` as root.
    fn retain_subtree(&mut self, keep: NodeId) {
        let order = self.subtree(keep);
        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (new_index, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new_index));
        }

        let mut slots: Vec<Option<SearchNode<P>>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for old in order {
            if let Some(mut node) = slots[old.0].take() {
                node.parent = node.parent.and_then(|p| remap[p.0]);
                node.children = node.children.iter().filter_map(|c| remap[c.0]).collect();
                for slot in node.child_by_cell.iter_mut() {
                    *slot = slot.and_then(|c| remap[c.0]);
                }
                nodes.push(node);
            }
        }

        self.nodes = nodes;
        self.root = NodeId(0);
    }
}
