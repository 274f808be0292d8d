//! Search tree vertices.
//!
//! Nodes live in the arena owned by [`SearchTree`](crate::mcts::tree::SearchTree)
//! and refer to each other by [`NodeId`]. A node owns its position snapshot and
//! the moves not yet expanded; its children and parent are arena indices.

use crate::game::get_legal_moves::get_legal_moves;
use crate::game::{Move, Position, Side};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Index of a node inside its tree's arena.
///
/// Ids are only meaningful for the tree that issued them and are invalidated
/// by [`SearchTree::advance`](crate::mcts::tree::SearchTree::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Simulation statistics of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStats {
    /// Rollouts that passed through or ended at this node
    pub visits: u32,
    /// Sum of rollout rewards, each in {0, 1}
    pub total_reward: f64,
    /// All-moves-as-first visit count, seeded with a prior
    pub rave_visits: u32,
    pub rave_reward: f64,
}

impl NodeStats {
    pub fn with_rave_prior(rave_visits: u32, rave_reward: f64) -> Self {
        NodeStats {
            visits: 0,
            total_reward: 0.0,
            rave_visits,
            rave_reward,
        }
    }

    pub fn record(&mut self, reward: f64) {
        self.visits += 1;
        self.total_reward += reward;
    }

    pub fn record_rave(&mut self, reward: f64) {
        self.rave_visits += 1;
        self.rave_reward += reward;
    }

    /// `total_reward / (visits + 1)`
    pub fn winrate(&self) -> f64 {
        self.total_reward / (self.visits as f64 + 1.0)
    }

    /// `rave_reward / (rave_visits + 1)`
    pub fn rave_winrate(&self) -> f64 {
        self.rave_reward / (self.rave_visits as f64 + 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct SearchNode<P> {
    pub(crate) position: P,
    pub(crate) to_move: Side,
    pub(crate) last_move: Option<Move>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) untried: Vec<Move>,
    pub(crate) child_by_cell: Vec<Option<NodeId>>,
    pub(crate) terminal: bool,
    pub(crate) stats: NodeStats,
    /// Number of backpropagations that passed up through this node from below.
    pub(crate) size: u32,
}

impl<P: Position> SearchNode<P> {
    /// Tries every cell against a copy of `position`, keeps the legal moves
    /// for `to_move` in a shuffled order, and marks the node terminal when
    /// none exist. Nothing here is recomputed later.
    pub fn new(
        parent: Option<NodeId>,
        position: P,
        last_move: Option<Move>,
        to_move: Side,
        prior: NodeStats,
        rng: &mut StdRng,
    ) -> Self {
        let mut untried = get_legal_moves(&position, to_move);
        untried.shuffle(rng);
        let terminal = untried.is_empty();
        let child_by_cell = vec![None; position.cell_count()];

        SearchNode {
            position,
            to_move,
            last_move,
            parent,
            children: Vec::new(),
            untried,
            child_by_cell,
            terminal,
            stats: prior,
            size: 0,
        }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// The move that produced this node; `None` at the root of a fresh tree.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn untried_moves(&self) -> &[Move] {
        &self.untried
    }

    pub fn child_for_cell(&self, cell: usize) -> Option<NodeId> {
        self.child_by_cell.get(cell).copied().flatten()
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.terminal || self.untried.is_empty()
    }
}
