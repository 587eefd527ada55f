//! A small BibTeX reader.
//!
//! Handles `@type{key, field = value}` entries with brace or parenthesis
//! delimiters, braced, quoted, numeric and macro values joined with `#`,
//! `@string` definitions, and skips `@comment` and `@preamble`.

use super::person::{parse_persons, Person};
use indexmap::IndexMap;
use log::{debug, warn};
use std::fmt;

/// Field holding a person list instead of plain text.
const AUTHOR_FIELD: &str = "author";

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Malformed BibTeX input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// One bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub entry_type: String,
    pub key: String,
    fields: IndexMap<String, String>,
    persons: IndexMap<String, Vec<Person>>,
}

impl Entry {
    /// Returns a field by case-insensitive name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns the persons for a role such as `author`, empty if absent.
    pub fn persons(&self, role: &str) -> &[Person] {
        self.persons
            .get(&role.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Entries of a BibTeX file in declaration order.
#[derive(Debug, Default)]
pub struct Bibliography {
    entries: IndexMap<String, Entry>,
}

impl Bibliography {
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Parses BibTeX source text.
pub fn parse(source: &str) -> Result<Bibliography, ParseError> {
    Parser::new(source).parse()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    macros: IndexMap<String, String>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let macros = MONTHS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { src, pos: 0, line: 1, macros }
    }

    fn parse(mut self) -> Result<Bibliography, ParseError> {
        let mut bibliography = Bibliography::default();

        while self.skip_to_command() {
            self.bump();
            self.skip_whitespace();
            let command = self.identifier()?.to_lowercase();
            self.skip_whitespace();

            match command.as_str() {
                "comment" => self.skip_comment()?,
                "preamble" => self.skip_group()?,
                "string" => self.string_definition()?,
                _ => {
                    let entry = self.entry(command)?;
                    let id = entry.key.to_lowercase();
                    if bibliography.entries.contains_key(&id) {
                        return Err(self.error(format!("repeated entry key '{}'", entry.key)));
                    }
                    bibliography.entries.insert(id, entry);
                }
            }
        }

        debug!("Parsed {} BibTeX entries", bibliography.len());
        Ok(bibliography)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { line: self.line, message: message.into() }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Moves to the next `@`, returning false at end of input.
    fn skip_to_command(&mut self) -> bool {
        while let Some(c) = self.peek() {
            if c == '@' {
                return true;
            }
            self.bump();
        }
        false
    }

    fn identifier(&mut self) -> Result<&'a str, ParseError> {
        let src = self.src;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !"{}(),=\"#%@".contains(c))
        {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected a name"));
        }
        Ok(&src[start..self.pos])
    }

    /// Consumes the opening delimiter and returns the matching closing one.
    fn open(&mut self) -> Result<char, ParseError> {
        match self.bump() {
            Some('{') => Ok('}'),
            Some('(') => Ok(')'),
            Some(c) => Err(self.error(format!("expected '{{' or '(', found '{c}'"))),
            None => Err(self.error("expected '{' or '(', found end of input")),
        }
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        if matches!(self.peek(), Some('{') | Some('(')) {
            self.skip_group()?;
        }
        Ok(())
    }

    /// Skips a delimited group, honoring nested delimiters of the same kind.
    fn skip_group(&mut self) -> Result<(), ParseError> {
        let start_line = self.line;
        let close = self.open()?;
        let open = if close == '}' { '{' } else { '(' };
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(ParseError {
                        line: start_line,
                        message: "unterminated group".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    fn string_definition(&mut self) -> Result<(), ParseError> {
        let close = self.open()?;
        self.skip_whitespace();
        let name = self.identifier()?.to_lowercase();
        self.skip_whitespace();
        self.expect('=')?;
        let value = self.value()?;
        self.skip_whitespace();
        self.expect(close)?;
        self.macros.insert(name, value);
        Ok(())
    }

    fn entry(&mut self, entry_type: String) -> Result<Entry, ParseError> {
        let close = self.open()?;
        self.skip_whitespace();

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c != ',' && c != close && !c.is_whitespace())
        {
            self.bump();
        }
        let key = self.src[start..self.pos].to_string();
        if key.is_empty() {
            return Err(self.error(format!("@{entry_type} entry without a key")));
        }

        let mut fields = IndexMap::new();
        let mut persons = IndexMap::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            self.expect(',')?;
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }

            let name = self.identifier()?.to_lowercase();
            self.skip_whitespace();
            self.expect('=')?;
            let value = self.value()?;

            if name == AUTHOR_FIELD {
                if persons.contains_key(&name) {
                    warn!("Entry '{key}': repeated field '{name}' ignored");
                } else {
                    persons.insert(name, parse_persons(&value));
                }
            } else if fields.contains_key(&name) {
                warn!("Entry '{key}': repeated field '{name}' ignored");
            } else {
                fields.insert(name, value);
            }
        }

        Ok(Entry { entry_type, key, fields, persons })
    }

    /// Reads a field value: pieces joined with `#`, whitespace collapsed.
    fn value(&mut self) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => {
                    self.bump();
                    value.push_str(self.delimited('}')?);
                }
                Some('"') => {
                    self.bump();
                    value.push_str(self.delimited('"')?);
                }
                Some(c) if c.is_ascii_digit() => {
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                    value.push_str(&self.src[start..self.pos]);
                }
                Some(_) => {
                    let name = self.identifier()?;
                    let expansion = self
                        .macros
                        .get(&name.to_lowercase())
                        .ok_or_else(|| self.error(format!("undefined macro '{name}'")))?;
                    value.push_str(expansion);
                }
                None => return Err(self.error("expected a value, found end of input")),
            }

            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.bump();
            } else {
                break;
            }
        }

        Ok(value.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Reads up to `close` at brace depth zero; the opening character has
    /// already been consumed. Inner braces are kept.
    fn delimited(&mut self, close: char) -> Result<&'a str, ParseError> {
        let src = self.src;
        let start_line = self.line;
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            let end = self.pos;
            match self.bump() {
                Some(c) if c == close && depth == 0 => return Ok(&src[start..end]),
                Some('{') => depth += 1,
                Some('}') => depth = depth.saturating_sub(1),
                Some(_) => {}
                None => {
                    return Err(ParseError {
                        line: start_line,
                        message: "unterminated value".to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry<'b>(bib: &'b Bibliography, key: &str) -> &'b Entry {
        bib.entries.get(key).unwrap()
    }

    #[test]
    fn test_parse_entry() {
        let bib = parse(
            r#"
            @Article{knuth84,
              Author = {Donald E. Knuth},
              title  = {Literate {P}rogramming},
              journal = "The Computer Journal",
              year = 1984,
            }
            "#,
        )
        .unwrap();

        assert_eq!(bib.len(), 1);
        let entry = entry(&bib, "knuth84");
        assert_eq!(entry.entry_type, "article");
        assert_eq!(entry.key, "knuth84");
        assert_eq!(entry.field("TITLE"), Some("Literate {P}rogramming"));
        assert_eq!(entry.field("journal"), Some("The Computer Journal"));
        assert_eq!(entry.field("year"), Some("1984"));
        assert_eq!(entry.field("author"), None);
        assert_eq!(entry.persons("author")[0].formatted(), "Donald E. Knuth");
        assert!(entry.persons("editor").is_empty());
    }

    #[test]
    fn test_entries_keep_file_order() {
        let bib = parse("@misc{zeta, title={Z}} @misc{alpha, title={A}} @misc{mid, title={M}}")
            .unwrap();
        let keys: Vec<_> = bib.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parentheses_and_no_trailing_comma() {
        let bib = parse("@book(b1, title = {Book (2nd ed.)}, year = {2001})").unwrap();
        let entry = entry(&bib, "b1");
        assert_eq!(entry.field("title"), Some("Book (2nd ed.)"));
        assert_eq!(entry.field("year"), Some("2001"));
    }

    #[test]
    fn test_macros_and_concatenation() {
        let bib = parse(
            r#"
            @String{acm = "ACM Press"}
            @STRING(pub = acm # { Books})
            @inproceedings{p1, publisher = pub, month = jan, note = "a " # 42}
            "#,
        )
        .unwrap();
        let entry = entry(&bib, "p1");
        assert_eq!(entry.field("publisher"), Some("ACM Press Books"));
        assert_eq!(entry.field("month"), Some("January"));
        assert_eq!(entry.field("note"), Some("a 42"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let bib = parse("@misc{w, title = {A   long\n      title}}").unwrap();
        assert_eq!(entry(&bib, "w").field("title"), Some("A long title"));
    }

    #[test]
    fn test_quoted_value_with_braces() {
        let bib = parse(r#"@misc{q, title = "Say {"}hi{"}"}"#).unwrap();
        assert_eq!(entry(&bib, "q").field("title"), Some(r#"Say {"}hi{"}"#));
    }

    #[test]
    fn test_comments_and_preamble_skipped() {
        let bib = parse(
            r#"
            Free text is ignored.
            @comment{this is {nested} junk}
            @preamble{"\newcommand{\x}{y}"}
            @misc{c, title={Kept}}
            "#,
        )
        .unwrap();
        assert_eq!(bib.len(), 1);
        assert_eq!(entry(&bib, "c").field("title"), Some("Kept"));
    }

    #[test]
    fn test_repeated_key() {
        let err = parse("@misc{a, title={1}}\n@misc{A, title={2}}").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("repeated entry key"));
    }

    #[test]
    fn test_undefined_macro() {
        let err = parse("@misc{a,\n title = nowhere}").unwrap_err();
        assert_eq!(err.to_string(), "line 2: undefined macro 'nowhere'");
    }

    #[test]
    fn test_unterminated_value() {
        let err = parse("@misc{a,\n title = {open").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "unterminated value");
    }

    #[test]
    fn test_missing_key() {
        assert!(parse("@misc{, title={x}}").is_err());
    }

    #[test]
    fn test_lineage_without_first_name() {
        let bib = parse("@misc{k, author = {Doe, Jr., } , title={T}, year=2020}").unwrap();
        let authors = entry(&bib, "k").persons("author");
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].lineage_names, ["Jr."]);
        assert_eq!(authors[0].formatted(), "Doe");
    }

    #[test]
    fn test_editor_is_plain_text() {
        let bib = parse("@book{e, editor = {Jane Roe and John Doe}}").unwrap();
        let entry = entry(&bib, "e");
        assert_eq!(entry.field("editor"), Some("Jane Roe and John Doe"));
        assert!(entry.persons("editor").is_empty());
    }

    #[test]
    fn test_at_sign_between_entries() {
        // Free text is skipped, but an `@` always starts a command.
        let err = parse("Contact me@example.org\n@misc{a, title={x}}").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "expected '{' or '(', found '@'");
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse("").unwrap().len(), 0);
    }
}
