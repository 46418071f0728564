// src/engine/mod.rs
//! Per-page pipeline: locate → decode (×3) → reconcile.
mod engine;
mod reconcile;
mod types;

pub use engine::process_page;
pub use reconcile::reconcile;
pub use types::*;
