//! Episode controller: turn alternation, observations, seeding.
//!
//! One [`Episode`] owns one [`Board`] plus a timestep counter and RNG. Turns
//! alternate strictly: on an agent turn the caller observes the board with a
//! 4-wide legality mask and applies a [`Direction`]; on a spawn turn it
//! observes the board with the 32-wide emptiness mask and places a tile (or
//! lets the episode draw one from its own RNG). Even timesteps are agent
//! turns, odd timesteps are spawn turns; the current kind is carried
//! explicitly as a [`TurnKind`] so callers never reason about parity.

use crate::engine::{Board, Direction, GameError, CELLS};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Number of tiles placed by `reset`.
pub const INITIAL_TILES: usize = 2;
/// Seed value meaning "draw fresh entropy".
pub const NO_SEED: u64 = 0;
/// Per-step cost yielded for every agent action. Disincentivizes long
/// episodes; a policy constant, overridable via [`Episode::with_step_reward`].
pub const DEFAULT_STEP_REWARD: f32 = -1.0;

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Agent,
    Spawn,
}

/// Result of applying an agent action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub reward: f32,
    pub terminal: bool,
}

/// Agent-turn observation: board snapshot plus per-direction legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentObservation {
    pub board: [u8; CELLS],
    /// `legal_mask[d]` is true iff sliding direction `d` would change the
    /// board, indexed by [`Direction::index`].
    pub legal_mask: [bool; 4],
}

/// Spawn-turn observation: board snapshot plus emptiness mask.
///
/// The 16-cell mask is duplicated to width 32 so one mask can gate both the
/// cell choice and the choice between the two spawn values. Only the first
/// 16 entries carry information the engine itself uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnObservation {
    pub board: [u8; CELLS],
    pub empty_mask: [bool; 2 * CELLS],
}

/// A single play-through of the game, from `reset` to terminal.
///
/// ```
/// use rl_2048::episode::{Episode, TurnKind};
///
/// let mut ep = Episode::new();
/// ep.reset(1234);
/// assert_eq!(ep.timestep(), 0);
/// assert_eq!(ep.turn(), TurnKind::Agent);
/// // reset places exactly two tiles
/// assert_eq!(ep.board().count_empty(), 14);
/// ```
pub struct Episode {
    board: Board,
    timestep: u32,
    turn: TurnKind,
    rng: StdRng,
    step_reward: f32,
}

impl Episode {
    /// New episode with an entropy-seeded RNG. Call [`Episode::reset`] before
    /// playing.
    pub fn new() -> Self {
        Episode {
            board: Board::EMPTY,
            timestep: 0,
            turn: TurnKind::Agent,
            rng: StdRng::from_entropy(),
            step_reward: DEFAULT_STEP_REWARD,
        }
    }

    /// Override the fixed per-step reward.
    pub fn with_step_reward(mut self, reward: f32) -> Self {
        self.step_reward = reward;
        self
    }

    /// Start a fresh episode: clear the board, place [`INITIAL_TILES`] tiles
    /// on distinct random cells (exponent 1 with p = 0.9, else 2), reset the
    /// timestep, hand the first turn to the agent.
    ///
    /// A nonzero `seed` makes the reset and every subsequent random draw of
    /// this episode reproducible; [`NO_SEED`] draws fresh entropy.
    pub fn reset(&mut self, seed: u64) {
        self.rng = if seed != NO_SEED {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };
        self.board.clear();
        for _ in 0..INITIAL_TILES {
            if let Some((cell, exponent)) = self.board.random_spawn(&mut self.rng) {
                self.board
                    .place(cell, exponent)
                    .expect("random_spawn returned an occupied cell");
            }
        }
        self.timestep = 0;
        self.turn = TurnKind::Agent;
    }

    /// Observation for the agent turn.
    pub fn agent_turn_observe(&self) -> AgentObservation {
        AgentObservation {
            board: self.board.cells(),
            legal_mask: self.board.legal_mask(),
        }
    }

    /// Apply the agent's chosen slide. Sliding an immovable direction is a
    /// silent no-op but still consumes the turn; mask-respecting agents never
    /// do it. Returns the per-step reward and whether the episode is over.
    pub fn apply_agent_action(&mut self, dir: Direction) -> Transition {
        self.board.slide(dir);
        self.timestep += 1;
        self.turn = TurnKind::Spawn;
        Transition {
            reward: self.step_reward,
            terminal: self.board.is_game_over(),
        }
    }

    /// Observation for the spawn turn.
    pub fn spawn_turn_observe(&self) -> SpawnObservation {
        let cells = self.board.cells();
        let mut empty_mask = [false; 2 * CELLS];
        for (idx, &c) in cells.iter().enumerate() {
            if c == 0 {
                empty_mask[idx] = true;
                empty_mask[idx + CELLS] = true;
            }
        }
        SpawnObservation {
            board: cells,
            empty_mask,
        }
    }

    /// Apply an externally chosen spawn. On [`GameError::OccupiedCellSpawn`]
    /// or [`GameError::IndexOutOfRange`] the board, timestep and turn are
    /// untouched; the caller may log the error and re-query
    /// [`Episode::is_game_over`]. Returns whether the episode is over.
    pub fn apply_spawn(&mut self, cell: usize, exponent: u8) -> Result<bool, GameError> {
        self.board.place(cell, exponent)?;
        self.timestep += 1;
        self.turn = TurnKind::Agent;
        Ok(self.board.is_game_over())
    }

    /// Spawn turn driven by the episode's own RNG: uniform empty cell,
    /// exponent 1 with p = 0.9 else 2. On a full board nothing is placed and
    /// the turn does not advance; the current game-over status is returned
    /// either way.
    pub fn apply_random_spawn(&mut self) -> bool {
        if let Some((cell, exponent)) = self.board.random_spawn(&mut self.rng) {
            self.board
                .place(cell, exponent)
                .expect("random_spawn returned an occupied cell");
            self.timestep += 1;
            self.turn = TurnKind::Agent;
        }
        self.board.is_game_over()
    }

    /// True iff no direction can slide.
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Turns played so far. Step caps are caller policy; compare against
    /// this counter to enforce one.
    pub fn timestep(&self) -> u32 {
        self.timestep
    }

    /// Whose turn it is.
    pub fn turn(&self) -> TurnKind {
        self.turn
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Default for Episode {
    fn default() -> Self {
        Self::new()
    }
}
