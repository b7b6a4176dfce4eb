//! Determinized MCTS search.
//!
//! Each iteration runs four phases:
//! 1. Selection: descend by UCT until a node with untried actions, a
//!    terminal node, or a dead end
//! 2. Expansion: decode and apply one untried legal action
//! 3. Simulation: play out from the new node against the current
//!    determinized view of the hidden decks
//! 4. Backpropagation: add the playout score along the path to the root
//!
//! Before the first iteration and every `reshuffle_interval` iterations after
//! it, the hidden deck orders are resampled. Only playouts see the
//! resampled order; statistics gathered so far are kept.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine_core::{ActionCodec, ActionId, Position, RuleEngine, RuleError};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::determinize::Determinizer;
use crate::node::NodeId;
use crate::policy::PlayoutPolicy;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The rule engine offered no legal action, not even pass.
    #[error("Search contract violation: {0}")]
    ContractViolation(String),

    #[error("Rule engine error: {0}")]
    Rule(#[from] RuleError),
}

/// The recommended action at the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub action: ActionId,
    /// Mean playout score of the action's subtree.
    pub value: f32,
    pub visits: u32,
}

/// Counters for one search invocation.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub iterations: u32,
    pub expansions: u32,
    /// Legal ids that failed to decode during expansion or playout.
    pub decode_anomalies: u32,
    /// Decoded moves the rule engine rejected.
    pub apply_anomalies: u32,
    pub terminal_hits: u32,
    pub playout_steps: u64,
    pub resample_iterations: Vec<u32>,
    pub tree_nodes: usize,
    pub max_depth: u32,
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// None when no iteration ran, or every root action failed to expand.
    pub recommendation: Option<Recommendation>,
    pub stats: SearchStats,
}

/// MCTS search state for one position.
pub struct MctsSearch<'a> {
    tree: MctsTree,
    rules: &'a dyn RuleEngine,
    codec: &'a ActionCodec,
    playout: Box<dyn PlayoutPolicy>,
    config: MctsConfig,
    cancel: Option<Arc<AtomicBool>>,
    stats: SearchStats,
}

impl<'a> MctsSearch<'a> {
    /// Create a new search rooted at `position`.
    ///
    /// Fails with [`RuleError::GameOver`] on a finished position and with a
    /// contract violation when the mask offers no legal action.
    pub fn new(
        rules: &'a dyn RuleEngine,
        codec: &'a ActionCodec,
        config: MctsConfig,
        position: &Position,
    ) -> Result<Self, SearchError> {
        if rules.terminal_score(position).is_some() {
            return Err(RuleError::GameOver.into());
        }
        let legal = codec.legality_mask(position).legal_ids();
        if legal.is_empty() {
            return Err(SearchError::ContractViolation(format!(
                "no legal actions at the root (ship on cell {}, round {})",
                position.ship, position.round
            )));
        }

        Ok(Self {
            tree: MctsTree::new(position.clone(), legal),
            rules,
            codec,
            playout: config.playout.build(),
            config,
            cancel: None,
            stats: SearchStats::default(),
        })
    }

    /// Stop between iterations once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Replace the playout policy chosen by the config.
    pub fn with_playout(mut self, playout: Box<dyn PlayoutPolicy>) -> Self {
        self.playout = playout;
        self
    }

    /// Run the search for the configured number of iterations.
    ///
    /// All randomness (playout choices, stochastic rule effects and the
    /// determinization seed) comes from `rng`.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchOutcome, SearchError> {
        let start = Instant::now();
        let root = self.tree.root();
        if !self.tree.get(root).is_expanded() {
            // The tree must not learn the true order of the hidden cards.
            self.tree.get_mut(root).position.resample_hidden(rng);
        }
        let root_position = self.tree.get(root).position.clone();
        let mut determinizer =
            Determinizer::new(&root_position, self.config.reshuffle_interval, rng.gen());

        for iteration in 0..self.config.iterations {
            if self.is_cancelled() {
                self.stats.cancelled = true;
                debug!(iteration, "MCTS search cancelled");
                break;
            }
            determinizer.begin_iteration(iteration);
            self.iterate(&determinizer, rng)?;
            self.stats.iterations += 1;
        }

        let tree_stats = self.tree.stats();
        self.stats.resample_iterations = determinizer.resample_iterations().to_vec();
        self.stats.tree_nodes = tree_stats.total_nodes;
        self.stats.max_depth = tree_stats.max_depth;
        self.stats.elapsed = start.elapsed();

        let recommendation = self.tree.best_action().map(|(action, id)| {
            let node = self.tree.get(id);
            Recommendation {
                action,
                value: node.mean_value(),
                visits: node.visit_count,
            }
        });

        debug!(
            iterations = self.stats.iterations,
            nodes = tree_stats.total_nodes,
            depth = tree_stats.max_depth,
            root_value = tree_stats.root_value,
            action = recommendation.map(|r| r.action.0),
            "MCTS search complete"
        );

        Ok(SearchOutcome {
            recommendation,
            stats: self.stats.clone(),
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(
        &mut self,
        determinizer: &Determinizer,
        rng: &mut ChaCha20Rng,
    ) -> Result<(), SearchError> {
        let (leaf_id, depth) = self.select();

        let (node_id, value) = match self.tree.get(leaf_id).terminal {
            Some(score) => {
                self.stats.terminal_hits += 1;
                (leaf_id, score)
            }
            None => {
                let node_id = self.expand(leaf_id, rng).unwrap_or(leaf_id);
                let value = self.simulate(node_id, determinizer, rng)?;
                (node_id, value)
            }
        };

        self.tree.backpropagate(node_id, value);

        trace!(
            leaf = node_id.0,
            depth,
            value,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Descend by UCT until a node that still has untried actions, a
    /// terminal node, or a node with no children.
    fn select(&self) -> (NodeId, u32) {
        let mut current = self.tree.root();
        let mut depth = 0;

        while !self.tree.get(current).is_leaf() {
            match self.tree.select_child(current, self.config.exploration) {
                Some(child_id) => {
                    current = child_id;
                    depth += 1;
                }
                None => break,
            }
        }

        (current, depth)
    }

    /// Expand one untried action of `node_id`, chosen at random.
    ///
    /// Actions that fail to decode or apply are dropped and another is tried.
    /// Returns None when no untried action could be expanded.
    fn expand(&mut self, node_id: NodeId, rng: &mut ChaCha20Rng) -> Option<NodeId> {
        loop {
            let node = self.tree.get_mut(node_id);
            if node.untried.is_empty() {
                return None;
            }
            let pick = rng.gen_range(0..node.untried.len());
            let action = node.untried.swap_remove(pick);
            let position = &self.tree.get(node_id).position;

            let mv = match self.codec.decode(action, position) {
                Ok(mv) => mv,
                Err(error) => {
                    self.stats.decode_anomalies += 1;
                    warn!(action = action.0, %error, "Legal action failed to decode; skipping");
                    continue;
                }
            };
            let next = match self.rules.apply(position, &mv, rng) {
                Ok(next) => next,
                Err(error) => {
                    self.stats.apply_anomalies += 1;
                    warn!(action = action.0, %mv, %error, "Legal action rejected by rules; skipping");
                    continue;
                }
            };

            let terminal = self.rules.terminal_score(&next);
            let untried = if terminal.is_some() {
                Vec::new()
            } else {
                self.codec.legality_mask(&next).legal_ids()
            };
            self.stats.expansions += 1;
            return Some(self.tree.add_child(node_id, action, next, terminal, untried));
        }
    }

    /// Play out from `node_id` against the current determinized view.
    fn simulate(
        &mut self,
        node_id: NodeId,
        determinizer: &Determinizer,
        rng: &mut ChaCha20Rng,
    ) -> Result<f32, SearchError> {
        let mut position = determinizer.determinize(&self.tree.get(node_id).position);

        for _ in 0..self.config.max_playout_depth {
            if let Some(score) = self.rules.terminal_score(&position) {
                return Ok(score);
            }

            let legal = self.codec.legality_mask(&position).legal_ids();
            if legal.is_empty() {
                return Err(SearchError::ContractViolation(format!(
                    "no legal actions during playout (ship on cell {}, round {})",
                    position.ship, position.round
                )));
            }
            let Some(action) = self
                .playout
                .choose(self.rules, self.codec, &position, &legal, rng)
            else {
                break;
            };

            let mv = match self.codec.decode(action, &position) {
                Ok(mv) => mv,
                Err(error) => {
                    self.stats.decode_anomalies += 1;
                    warn!(action = action.0, %error, "Playout action failed to decode");
                    break;
                }
            };
            match self.rules.apply(&position, &mv, rng) {
                Ok(next) => position = next,
                Err(error) => {
                    self.stats.apply_anomalies += 1;
                    warn!(action = action.0, %mv, %error, "Playout action rejected by rules");
                    break;
                }
            }
            self.stats.playout_steps += 1;
        }

        Ok(self
            .rules
            .terminal_score(&position)
            .unwrap_or_else(|| self.rules.heuristic(&position)))
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Recommend an action for `position`.
///
/// Runs `iteration_budget` iterations with exploration constant
/// `exploration`, resampling hidden deck order every `reshuffle_interval`
/// iterations, and returns the most visited root action with its mean
/// value. A budget of zero yields `Ok(None)`.
pub fn recommend(
    rules: &dyn RuleEngine,
    codec: &ActionCodec,
    position: &Position,
    iteration_budget: u32,
    exploration: f32,
    reshuffle_interval: u32,
    rng: &mut ChaCha20Rng,
) -> Result<Option<Recommendation>, SearchError> {
    let config = MctsConfig::default()
        .with_iterations(iteration_budget)
        .with_exploration(exploration)
        .with_reshuffle_interval(reshuffle_interval);
    let mut search = MctsSearch::new(rules, codec, config, position)?;
    Ok(search.run(rng)?.recommendation)
}
