//! Convert Ollama Modelfile configuration into LM Studio config and preset
//! JSON.
//!
//! The conversion core ([`parser`], [`template`], [`lmstudio`]) is pure and
//! synchronous. Network and filesystem access sit behind [`source`] and
//! [`sink`], and [`export`] wires the pieces together.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod lmstudio;
pub mod model;
pub mod parser;
pub mod sink;
pub mod source;
pub mod template;

pub use error::{ExportError, Result};
