//! rl-2048: a deterministic 2048 environment for turn-alternating RL
//!
//! This crate provides:
//! - A 4x4 exponent `Board` with the slide/merge rules, legality checks and
//!   tile spawning (`engine` module)
//! - An `Episode` controller alternating agent turns and spawn turns, with
//!   masked observations and seeded determinism (`episode` module)
//! - A seed + action-sequence `Replay` record (`replay` module)
//!
//! Quick start:
//! ```
//! use rl_2048::engine::Direction;
//! use rl_2048::episode::Episode;
//!
//! let mut ep = Episode::new();
//! ep.reset(42);
//!
//! let obs = ep.agent_turn_observe();
//! let dir = Direction::ALL
//!     .into_iter()
//!     .find(|d| obs.legal_mask[d.index()])
//!     .expect("a fresh board always has a legal slide");
//! let t = ep.apply_agent_action(dir);
//! assert!(!t.terminal);
//!
//! let over = ep.apply_random_spawn();
//! assert!(!over);
//! assert_eq!(ep.timestep(), 2);
//! ```
//!
//! The learning agent (network, optimizer, checkpoints) lives outside this
//! crate; it only consumes observations and masks, and produces `Direction`
//! actions.

pub mod engine;
pub mod episode;
pub mod replay;
