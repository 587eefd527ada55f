//! Inline markup conversion.
//! Rewrites the small Markdown-like syntax used in configuration strings
//! (`**bold**`, `*italic*`, `[label](url)`, newlines, runs of spaces) into
//! LaTeX, and applies that rewrite to every string of a configuration tree.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex pattern for bold"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("Invalid regex pattern for italic"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid regex pattern for links"));
static QUAD_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {4}").expect("Invalid regex pattern for quad spacing"));
static TAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t").expect("Invalid regex pattern for tabs"));
static HALF_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2}").expect("Invalid regex pattern for half spacing"));

/// Converts inline markup in `text` to LaTeX.
///
/// Rules run in a fixed order, each over the output of the previous one:
/// bold, italic, links, line breaks, then four spaces, tabs and two spaces.
/// The conversion is not idempotent; feeding it LaTeX it produced is
/// unsupported.
///
/// ```
/// use cvtex::markup::to_latex;
///
/// assert_eq!(to_latex("**a** *b*"), r"\textbf{a} \textit{b}");
/// assert_eq!(to_latex("[Site](http://x)"), r"\href{http://x}{Site}");
/// ```
pub fn to_latex(text: &str) -> String {
    let text = BOLD.replace_all(text, r"\textbf{${1}}");
    let text = ITALIC.replace_all(&text, r"\textit{${1}}");
    let text = LINK.replace_all(&text, r"\href{${2}}{${1}}");
    let text = text.replace('\n', r"\\");
    let text = QUAD_SPACE.replace_all(&text, r"\quad ");
    let text = TAB.replace_all(&text, r"\quad ");
    HALF_SPACE.replace_all(&text, r"\ ").into_owned()
}

/// Returns a copy of `value` with [`to_latex`] applied to every string.
///
/// Mapping keys and sequence order are kept; numbers, booleans and null are
/// copied unchanged.
pub fn transform(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(to_latex(s)),
        Value::Array(arr) => Value::Array(arr.iter().map(transform).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), transform(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
