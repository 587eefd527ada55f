//! Error handling for cvtex.
//! Defines the error type and result alias used throughout the pipeline.

use std::io;
use thiserror::Error;

/// Every failure that can abort a cvtex run.
///
/// Each variant is fatal: the run stops at the first error and nothing is
/// written to the output path.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document could not be read, parsed or lacks
    /// the structure later stages rely on.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The bibliography could not be read, is malformed, or one of its
    /// entries lacks a required field.
    #[error("Bibliography error: {0}.")]
    BibliographyError(String),

    /// A `publications` section is declared but no bibliography was given.
    #[error("Section 'publications' found in the config but BibTeX file not provided.")]
    MissingBibliography,

    /// The named template does not exist in the template directory.
    #[error("Template '{name}' not found in '{dir}'.")]
    TemplateNotFound { name: String, dir: String },

    /// MiniJinja failed to compile or render the template.
    #[error("Render error: {0}.")]
    RenderError(#[from] minijinja::Error),

    /// The rendered document could not be written.
    #[error("Failed to write '{path}': {source}.")]
    OutputWriteError {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
