//! # ML Minesweeper
//!
//! A Minesweeper mine predictor: a single-hidden-layer sigmoid network is
//! trained by self-play to reproduce the deductions of a deterministic
//! constraint solver, then evaluated by playing games on its own.
//!
//! ## Modules
//!
//! - [`game`] — Board engine: reveal, flags, constraint deductions
//! - [`ai`] — Feed-forward network: inference, backprop, persistence
//! - [`training`] — Self-play trainer, evaluator, outcome tally
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
