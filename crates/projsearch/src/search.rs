//! Query term compilation and conjunctive matching.

use regex::{Regex, RegexBuilder};

use crate::index::ProjectIndex;

/// A single compiled query term.
#[derive(Debug)]
enum TermPattern {
    /// A valid case-insensitive pattern.
    Pattern(Regex),
    /// Fallback for terms that do not compile (say, an unbalanced `(` typed
    /// mid-query): matched as a lowercased literal substring.
    Literal(String),
}

impl TermPattern {
    fn compile(term: &str) -> Self {
        match RegexBuilder::new(term).case_insensitive(true).build() {
            Ok(pattern) => Self::Pattern(pattern),
            Err(_) => Self::Literal(term.to_lowercase()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(name),
            Self::Literal(literal) => name.to_lowercase().contains(literal),
        }
    }
}

/// A set of query terms compiled once per search call.
///
/// A project matches only if its name matches every term; an empty term
/// set matches everything.
#[derive(Debug)]
pub struct QueryTerms {
    patterns: Vec<TermPattern>,
}

impl QueryTerms {
    pub fn compile(terms: &[String]) -> Self {
        Self {
            patterns: terms.iter().map(|term| TermPattern::compile(term)).collect(),
        }
    }

    /// Checks whether `name` matches every term, short-circuiting on the
    /// first failing term.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().all(|pattern| pattern.matches(name))
    }
}

/// Returns the names of all projects matching every term, in index
/// iteration order. No scoring; matching is pass/fail.
pub fn search_projects(index: &ProjectIndex, terms: &[String]) -> Vec<String> {
    let query = QueryTerms::compile(terms);
    index
        .projects()
        .filter(|project| query.matches(&project.name))
        .map(|project| project.name.clone())
        .collect()
}
