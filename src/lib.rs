//! # Memory Match
//!
//! A memory card-matching game: flip two cards, keep them if they pair up.
//! The core is a match-resolution and scoring state machine with combo
//! streaks, timing bonuses and star ratings, driven by a terminal UI built
//! with Ratatui. Supports single-player with a per-difficulty leaderboard
//! and local hot-seat multiplayer.
//!
//! ## Modules
//!
//! - [`game`] — Cards, deck building, board resolution, players
//! - [`scoring`] — Score engine, final breakdown, star rating, game timer
//! - [`session`] — Round orchestration, delayed steps, clock and notifications
//! - [`storage`] — Key-value stores, settings and leaderboard persistence
//! - [`symbols`] — Symbol themes for card faces
//! - [`ui`] — Terminal UI: board, stats, name entry
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod symbols;
pub mod ui;
