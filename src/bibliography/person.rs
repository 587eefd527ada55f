//! BibTeX person names.
//!
//! Splits a name such as `Ludwig van Beethoven`, `van Beethoven, Ludwig` or
//! `Ford, Jr., Henry` into its parts, following the classic BibTeX rules.

/// A single author name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub first_names: Vec<String>,
    pub middle_names: Vec<String>,
    pub prelast_names: Vec<String>,
    pub last_names: Vec<String>,
    pub lineage_names: Vec<String>,
}

impl Person {
    /// Parses a single name.
    pub fn parse(name: &str) -> Self {
        // Empty comma parts still count, so `Doe, Jr., ` keeps its two commas.
        let parts: Vec<Vec<String>> = split_top_level(name, |c| c == ',')
            .into_iter()
            .map(|part| split_words(&part))
            .collect();

        let (first, von_last, lineage) = match parts.as_slice() {
            [] => (Vec::new(), Vec::new(), Vec::new()),
            [whole] => split_first_von_last(whole),
            [von_last, first] => (first.clone(), von_last.clone(), Vec::new()),
            [von_last, lineage, first, ..] => (first.clone(), von_last.clone(), lineage.clone()),
        };
        let (prelast, last) = split_von_last(&von_last);

        let mut first = first.into_iter();
        Person {
            first_names: first.next().into_iter().collect(),
            middle_names: first.collect(),
            prelast_names: prelast,
            last_names: last,
            lineage_names: lineage,
        }
    }

    /// Returns first, middle and last names joined by single spaces.
    ///
    /// Empty parts are skipped, so a person with only a last name formats to
    /// exactly that name and an empty person formats to `""`.
    pub fn formatted(&self) -> String {
        [&self.first_names, &self.middle_names, &self.last_names]
            .into_iter()
            .flatten()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Splits an `author` field into names on the word `and`.
pub fn parse_persons(value: &str) -> Vec<Person> {
    let mut names: Vec<Vec<String>> = vec![Vec::new()];
    for word in split_words(value) {
        if word.eq_ignore_ascii_case("and") {
            names.push(Vec::new());
        } else if let Some(current) = names.last_mut() {
            current.push(word);
        }
    }

    names
        .into_iter()
        .filter(|words| !words.is_empty())
        .map(|words| Person::parse(&words.join(" ")))
        .collect()
}

/// Splits `First von Last` with no commas.
fn split_first_von_last(words: &[String]) -> (Vec<String>, Vec<String>, Vec<String>) {
    let Some((_, body)) = words.split_last() else {
        return (Vec::new(), Vec::new(), Vec::new());
    };
    match body.iter().position(|word| is_von(word)) {
        Some(start) => (words[..start].to_vec(), words[start..].to_vec(), Vec::new()),
        None => (body.to_vec(), words[body.len()..].to_vec(), Vec::new()),
    }
}

/// Splits `von Last`: the von part ends at the last lowercase word before the
/// final word.
fn split_von_last(words: &[String]) -> (Vec<String>, Vec<String>) {
    let Some((_, body)) = words.split_last() else {
        return (Vec::new(), Vec::new());
    };
    match body.iter().rposition(|word| is_von(word)) {
        Some(end) => (words[..=end].to_vec(), words[end + 1..].to_vec()),
        None => (Vec::new(), words.to_vec()),
    }
}

/// A word belongs to the von part when its first letter outside braces is
/// lowercase. Words starting with a brace group count as uppercase.
fn is_von(word: &str) -> bool {
    if word.starts_with('{') {
        return false;
    }
    let mut depth = 0usize;
    for c in word.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

/// Splits on whitespace and `~` outside braces.
fn split_words(text: &str) -> Vec<String> {
    split_top_level(text, |c| c.is_whitespace() || c == '~')
        .into_iter()
        .filter(|word| !word.is_empty())
        .collect()
}

/// Splits `text` at separator characters that are not inside braces.
/// Pieces are trimmed; empty ones are kept.
fn split_top_level(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && is_separator(c) => {
                pieces.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    pieces.push(current.trim().to_string());
    pieces
}
