//! Bibliography loading.
//! Reads a BibTeX file and normalizes each entry into a [`Publication`]
//! ready to be injected into the template context.

use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;
use std::path::Path;

pub mod parser;
pub mod person;

pub use parser::{Bibliography, Entry};
pub use person::Person;

/// A bibliography entry as the template sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    /// Formatted author list, e.g. `A, B and C`.
    pub authors: String,
    pub title: String,
    /// Journal, or book title for proceedings, or empty.
    pub venue: String,
    pub year: String,
    /// URL, or empty.
    pub link: String,
}

impl Publication {
    /// Builds a publication from a parsed entry.
    ///
    /// # Errors
    /// * `Error::BibliographyError` if `title` or `year` is missing
    pub fn from_entry(entry: &Entry) -> Result<Self> {
        debug!("Normalizing @{} entry '{}'", entry.entry_type, entry.key);
        let authors: Vec<String> = entry.persons("author").iter().map(Person::formatted).collect();

        Ok(Self {
            authors: join_authors(authors.as_slice()),
            title: required_field(entry, "title")?.to_string(),
            venue: venue(entry).to_string(),
            year: required_field(entry, "year")?.to_string(),
            link: entry.field("url").unwrap_or_default().to_string(),
        })
    }
}

/// Loads the BibTeX file at `path` as publications, in file order.
///
/// # Errors
/// * `Error::BibliographyError` if the file cannot be read or parsed, or an
///   entry lacks a required field
pub fn load_bibliography<P: AsRef<Path>>(path: P) -> Result<Vec<Publication>> {
    let path = path.as_ref();
    debug!("Loading bibliography from {}", path.display());

    let source = std::fs::read_to_string(path).map_err(|e| {
        Error::BibliographyError(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let bibliography = parser::parse(&source)
        .map_err(|e| Error::BibliographyError(format!("{}: {}", path.display(), e)))?;

    bibliography.entries().map(Publication::from_entry).collect()
}

/// Joins names as `A`, `A and B`, `A, B and C`.
pub fn join_authors<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(|name| name.as_ref()).collect();
            format!("{} and {}", init.join(", "), last.as_ref())
        }
    }
}

/// Journal if present and non-empty, then book title, then empty.
fn venue(entry: &Entry) -> &str {
    entry
        .field("journal")
        .filter(|journal| !journal.is_empty())
        .or_else(|| entry.field("booktitle"))
        .unwrap_or_default()
}

fn required_field<'e>(entry: &'e Entry, name: &str) -> Result<&'e str> {
    entry.field(name).ok_or_else(|| {
        Error::BibliographyError(format!(
            "entry '{}' is missing required field '{}'",
            entry.key, name
        ))
    })
}
