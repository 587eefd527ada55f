//! cvtex renders a LaTeX CV from a YAML description, an optional BibTeX
//! bibliography and a Jinja template.

/// BibTeX parsing and publication records
pub mod bibliography;

/// Command-line interface module for cvtex
pub mod cli;

/// Configuration loading (YAML or JSON)
pub mod config;

/// Shared names and keys
pub mod constants;

/// Error types and handling for cvtex
pub mod error;

/// Inline markup to LaTeX conversion
pub mod markup;

/// Orchestration of the whole generation run
pub mod pipeline;

/// Template rendering with MiniJinja
pub mod renderer;

/// Output file writing
pub mod writer;
