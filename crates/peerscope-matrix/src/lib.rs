//! Peering graph transforms
//!
//! ```text
//! raw dataset ──► symmetrize ──► symmetric dataset ──► MatrixProjector ──► MatrixView
//!                                                          ▲
//!                                                     MatrixConfig
//!                                               (focus list, regions, palette)
//! ```
//!
//! Both transforms are pure: they borrow their input and return new values.

pub mod config;
pub mod project;
pub mod symmetrize;

pub use config::{CellColours, ConfigError, FocusEntity, MatrixConfig, Palette};
pub use project::{
    classify, project, role_text, Classification, FocusTable, MatrixProjector, MatrixView,
    TableBundle, LABEL_HEADING, SKIP_TEXT,
};
pub use symmetrize::{symmetrize, symmetrize_with_stats, MirrorStats};
