//! Case-insensitive name matching.

/// True when `term` occurs in `name`, ignoring case. An empty term matches
/// every name.
pub fn matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Lower-cased search term, reused across many names.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.needle.is_empty() || name.to_lowercase().contains(&self.needle)
    }
}
