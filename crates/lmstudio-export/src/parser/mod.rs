//! Parsers for source configuration dialects.
//!
//! Only the Ollama Modelfile dialect is supported. Parsing never fails: the
//! result holds whatever could be extracted.

pub mod modelfile;

pub use modelfile::parse_modelfile;
