//! Common constants used throughout cvtex.

/// Top-level configuration key holding the list of sections.
pub const SECTIONS_KEY: &str = "sections";

/// Section field naming the section's kind.
pub const SECTION_TYPE_KEY: &str = "type";

/// Section type that requires a bibliography.
pub const PUBLICATIONS_SECTION: &str = "publications";

/// Top-level configuration key the publication records are injected under.
pub const PUBLICATIONS_KEY: &str = "publications";

/// Name of the template filter applying the inline markup conversion.
pub const LATEX_FILTER: &str = "latex";
