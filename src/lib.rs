//! Icebreak (workspace facade crate).
//!
//! This package exposes `icebreak::{core,engine,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use icebreak_core as core;
pub use icebreak_engine as engine;
pub use icebreak_types as types;
