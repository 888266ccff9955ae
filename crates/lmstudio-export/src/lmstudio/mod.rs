//! LM Studio target documents and the mappers that build them from a parsed
//! Modelfile.
//!
//! Two shapes are produced:
//! - [`LmStudioConfig`]: flat prediction/load field lists with a Jinja template.
//! - [`LmStudioPreset`]: a named preset with a manually segmented template.

pub mod flat;
pub mod preset;
pub mod tokens;
pub mod types;

pub use flat::to_lmstudio_config;
pub use preset::to_lmstudio_preset;
pub use types::*;
