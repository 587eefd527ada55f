//! Template rendering for cvtex.
//! Loads Jinja templates by name from a directory with MiniJinja, so a
//! template can include or extend its siblings.
use crate::constants::LATEX_FILTER;
use crate::error::{Error, Result};
use crate::markup::to_latex;
use log::debug;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::path::{Path, PathBuf};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the named template with the given context.
    ///
    /// # Arguments
    /// * `name` - Template name, relative to the engine's template directory
    /// * `context` - Context whose top-level keys become template variables
    ///
    /// # Returns
    /// * `Result<String>` - Rendered document
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// Directory templates are resolved from
    dir: PathBuf,
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer loading templates from `dir`.
    ///
    /// Output is never auto-escaped and undefined variables render empty.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&dir));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter(LATEX_FILTER, |value: String| to_latex(&value));
        Self { dir, env }
    }

    /// Makes undefined variables a render error.
    pub fn strict(mut self, strict: bool) -> Self {
        if strict {
            self.env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        self
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template from the template directory using MiniJinja.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if the named template does not exist
    /// * `Error::RenderError` if compilation or rendering fails, including
    ///   a missing included template
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        debug!("Rendering template '{}' from {}", name, self.dir.display());
        let tmpl = self.env.get_template(name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                Error::TemplateNotFound {
                    name: name.to_string(),
                    dir: self.dir.display().to_string(),
                }
            } else {
                Error::RenderError(e)
            }
        })?;
        tmpl.render(context).map_err(Error::RenderError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn template_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_render_top_level_keys() {
        let dir = template_dir(&[(
            "cv.tex",
            "{% for s in sections %}[{{ s.type }}]{% endfor %} {{ name }}",
        )]);
        let renderer = MiniJinjaRenderer::new(dir.path());
        let context = json!({"name": "Ada", "sections": [{"type": "a"}, {"type": "b"}]});

        assert_eq!(renderer.render("cv.tex", &context).unwrap(), "[a][b] Ada");
    }

    #[test]
    fn test_no_escaping() {
        let dir = template_dir(&[("cv.html", "{{ text }}")]);
        let renderer = MiniJinjaRenderer::new(dir.path());
        let context = json!({"text": r"\textbf{<b>&}"});

        assert_eq!(renderer.render("cv.html", &context).unwrap(), r"\textbf{<b>&}");
    }

    #[test]
    fn test_include_sibling() {
        let dir = template_dir(&[
            ("main.tex", "begin {% include 'part.tex' %} end"),
            ("part.tex", "{{ name }}"),
        ]);
        let renderer = MiniJinjaRenderer::new(dir.path());

        let out = renderer.render("main.tex", &json!({"name": "Ada"})).unwrap();
        assert_eq!(out, "begin Ada end");
    }

    #[test]
    fn test_latex_filter() {
        let dir = template_dir(&[("cv.tex", "{{ ('**' ~ name ~ '**') | latex }}")]);
        let renderer = MiniJinjaRenderer::new(dir.path());

        let out = renderer.render("cv.tex", &json!({"name": "Ada"})).unwrap();
        assert_eq!(out, r"\textbf{Ada}");
    }

    #[test]
    fn test_template_not_found() {
        let dir = template_dir(&[]);
        let renderer = MiniJinjaRenderer::new(dir.path());

        match renderer.render("missing.tex", &json!({})) {
            Err(Error::TemplateNotFound { name, .. }) => assert_eq!(name, "missing.tex"),
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_filter() {
        let dir = template_dir(&[("cv.tex", "{{ name | shout }}")]);
        let renderer = MiniJinjaRenderer::new(dir.path());

        assert!(matches!(
            renderer.render("cv.tex", &json!({"name": "Ada"})),
            Err(Error::RenderError(_))
        ));
    }

    #[test]
    fn test_undefined_variables() {
        let dir = template_dir(&[("cv.tex", "[{{ nope }}]")]);

        let lenient = MiniJinjaRenderer::new(dir.path());
        assert_eq!(lenient.render("cv.tex", &json!({})).unwrap(), "[]");

        let strict = MiniJinjaRenderer::new(dir.path()).strict(true);
        assert!(matches!(
            strict.render("cv.tex", &json!({})),
            Err(Error::RenderError(_))
        ));
    }
}
