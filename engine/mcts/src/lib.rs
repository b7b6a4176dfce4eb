//! Determinized Monte Carlo Tree Search (MCTS) over the hex action space.
//!
//! This crate recommends one action for a known position of any game
//! implementing the `engine-core` [`RuleEngine`](engine_core::RuleEngine)
//! trait, using the [`ActionCodec`](engine_core::ActionCodec) for legal
//! action ids and move decoding.
//!
//! # Overview
//!
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: descend the tree with UCT
//!    (`mean + c * sqrt(ln(N_parent) / N_child)`) until a node that still
//!    has untried legal actions, or a terminal node
//! 2. **Expansion**: decode and apply one untried action to add a child
//! 3. **Simulation**: play out from the child with a [`PlayoutPolicy`]
//!    until the game ends or the depth cap hands over to the heuristic
//! 4. **Backpropagation**: add the score to every node on the path
//!
//! Deck order below each visible top card is hidden. The [`Determinizer`]
//! resamples it every `reshuffle_interval` iterations and playouts run
//! against the current sample; the tree statistics are kept across
//! resamples. The final pick is the most visited root action.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::ActionCodec;
//! use games_voyage::{RulesConfig, Voyage};
//! use hex_grid::HexGrid;
//! use mcts::recommend;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use std::sync::Arc;
//!
//! let grid = Arc::new(HexGrid::generate().unwrap());
//! let voyage = Voyage::new(grid.clone(), RulesConfig::default());
//! let codec = ActionCodec::new(grid);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let position = voyage.new_game(&mut rng).unwrap();
//!
//! let rec = recommend(&voyage, &codec, &position, 50, 1.41, 20, &mut rng)
//!     .unwrap()
//!     .expect("a positive budget always recommends");
//! assert!(codec.legality_mask(&position).is_legal(rec.action));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: iterations per search (default: 400)
//! - `exploration`: UCT constant `c` (default: sqrt 2)
//! - `reshuffle_interval`: iterations between hidden-order resamples (default: 20)
//! - `max_playout_depth`: playout steps before the heuristic (default: 48)
//! - `playout`: [`PlayoutKind::Uniform`] or [`PlayoutKind::Greedy`]

pub mod config;
pub mod determinize;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, PlayoutKind};
pub use determinize::{DeterminizationEpoch, Determinizer};
pub use node::{MctsNode, NodeId};
pub use policy::{GreedyPlayout, PlayoutPolicy, UniformPlayout};
pub use search::{recommend, MctsSearch, Recommendation, SearchError, SearchOutcome, SearchStats};
pub use tree::{MctsTree, TreeStats};
