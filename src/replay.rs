//! Seed-based trajectory records.
//!
//! A [`Replay`] is the minimal save format the environment supports: the
//! episode seed plus the agent's action sequence. Spawn turns are drawn from
//! the episode RNG, so a nonzero seed and the actions fully determine the
//! trajectory.

use crate::engine::{Board, Direction};
use crate::episode::Episode;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Episode seed. Nonzero by construction; the entropy sentinel would not
    /// reproduce anything.
    pub seed: NonZeroU64,
    /// Agent actions in order, one per agent turn.
    pub actions: Vec<Direction>,
}

impl Replay {
    pub fn new(seed: NonZeroU64, actions: Vec<Direction>) -> Self {
        Replay { seed, actions }
    }

    /// Re-run the trajectory: reset with the recorded seed, then alternate
    /// recorded agent actions with RNG-driven spawns until the actions run
    /// out or the episode terminates. Returns the final board.
    pub fn run(&self) -> Board {
        let mut ep = Episode::new();
        ep.reset(self.seed.get());
        for &dir in &self.actions {
            if ep.apply_agent_action(dir).terminal {
                break;
            }
            if ep.apply_random_spawn() {
                break;
            }
        }
        *ep.board()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
