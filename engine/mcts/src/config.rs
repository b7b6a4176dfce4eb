//! MCTS configuration parameters.

/// How playout actions are chosen below the expanded node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayoutKind {
    /// Uniform over the legality mask.
    Uniform,
    /// One-step lookahead on the rule engine's heuristic, with a uniform
    /// pick at probability `epsilon`.
    Greedy { epsilon: f64 },
}

impl Default for PlayoutKind {
    fn default() -> Self {
        Self::Uniform
    }
}

/// Configuration for determinized Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of iterations to run per search.
    pub iterations: u32,

    /// Exploration constant `c` in `mean + c * sqrt(ln(N_parent) / N_child)`.
    /// Higher values spread visits wider.
    pub exploration: f32,

    /// Iterations between resamples of the hidden deck orders (`K`).
    /// Zero is treated as one.
    pub reshuffle_interval: u32,

    /// Playout steps before the heuristic stands in for a terminal score.
    pub max_playout_depth: u32,

    pub playout: PlayoutKind,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 400,
            exploration: std::f32::consts::SQRT_2,
            reshuffle_interval: 20,
            max_playout_depth: 48,
            playout: PlayoutKind::Uniform,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 60,
            max_playout_depth: 12,
            ..Self::default()
        }
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the reshuffle interval.
    pub fn with_reshuffle_interval(mut self, k: u32) -> Self {
        self.reshuffle_interval = k;
        self
    }

    /// Builder pattern: set the playout depth cap.
    pub fn with_max_playout_depth(mut self, depth: u32) -> Self {
        self.max_playout_depth = depth;
        self
    }

    /// Builder pattern: set the playout policy.
    pub fn with_playout(mut self, playout: PlayoutKind) -> Self {
        self.playout = playout;
        self
    }
}
