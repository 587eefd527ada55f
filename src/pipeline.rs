//! End-to-end CV generation.
//! Loads the configuration, injects publications when a section needs them,
//! converts inline markup, renders the template and writes the result.

use crate::bibliography::load_bibliography;
use crate::cli::Args;
use crate::config::{has_publications_section, load_config};
use crate::constants::PUBLICATIONS_KEY;
use crate::error::{Error, Result};
use crate::markup::transform;
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::writer::write_output;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Splits a template path into the directory templates are loaded from and
/// the template's name within it.
///
/// A bare file name resolves against the current directory.
pub fn split_template_path<P: AsRef<Path>>(template: P) -> Result<(PathBuf, String)> {
    let template = template.as_ref();
    let name = template
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::TemplateNotFound {
            name: template.display().to_string(),
            dir: String::new(),
        })?;
    let dir = match template.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_string()))
}

/// Sets `publications` on the configuration when a section asks for it.
///
/// # Errors
/// * `Error::MissingBibliography` if a `publications` section exists and no
///   bibliography was given
pub fn inject_publications(config: &mut Value, bibtex: Option<&Path>) -> Result<()> {
    if !has_publications_section(config)? {
        if let Some(path) = bibtex {
            debug!("No publications section, ignoring {}", path.display());
        }
        return Ok(());
    }

    let path = bibtex.ok_or(Error::MissingBibliography)?;
    let publications = load_bibliography(path)?;
    debug!("Loaded {} publications", publications.len());

    let publications = serde_json::to_value(publications)
        .map_err(|e| Error::BibliographyError(e.to_string()))?;
    if let Some(root) = config.as_object_mut() {
        root.insert(PUBLICATIONS_KEY.to_string(), publications);
    }
    Ok(())
}

/// Renders the CV described by `args` and returns the rendered text.
///
/// Nothing is written; see [`run`].
pub fn generate(args: &Args) -> Result<String> {
    let mut config = load_config(&args.config)?;
    inject_publications(&mut config, args.bibtex.as_deref())?;

    let context = transform(&config);

    let (template_dir, template_name) = split_template_path(&args.template)?;
    let renderer = MiniJinjaRenderer::new(template_dir).strict(args.strict);
    renderer.render(&template_name, &context)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the configuration
/// 2. Loads the bibliography if a `publications` section needs it
/// 3. Converts inline markup in every configuration string
/// 4. Renders the template
/// 5. Writes the output file
///
/// Any failure before step 5 leaves the output path untouched.
pub fn run(args: &Args) -> Result<()> {
    let document = generate(args)?;
    write_output(&args.output, &document)
}
