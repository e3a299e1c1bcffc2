//! Query - search expressions over machine documents.
//!
//! A [`MachineFilter`](crate::MachineFilter) is translated into a
//! [`SearchQuery`]: a list of clauses plus paging. The clause list renders to
//! a secondary-index query string:
//!
//! - numeric fields use an inclusive range, `@floor:[2 2]`
//! - tag fields use an exact match, `@type:dryer`
//! - clauses are space separated (implicit AND)
//! - no clauses renders the match-all wildcard `*`
//!
//! Stores that execute the query themselves parse the string back with
//! [`parse_clauses`] and test documents with [`Clause::matches`].

mod parse;
mod translate;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub use parse::parse_clauses;
pub use translate::translate;

/// Query string that matches every document.
pub const MATCH_ALL: &str = "*";

/// Fixed paging applied to every search.
pub const PAGE_OFFSET: usize = 0;
pub const PAGE_LIMIT: usize = 20;

/// Error produced when a query string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unexpected input at byte {at}: {reason}")]
    Syntax { at: usize, reason: String },

    #[error("invalid range bound '{0}'")]
    Bound(String),
}

/// One end of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    NegInfinity,
    Value(i64),
    PosInfinity,
}

impl Bound {
    fn admits_from_below(&self, n: f64) -> bool {
        match self {
            Bound::NegInfinity => true,
            Bound::Value(v) => n >= *v as f64,
            Bound::PosInfinity => false,
        }
    }

    fn admits_from_above(&self, n: f64) -> bool {
        match self {
            Bound::NegInfinity => false,
            Bound::Value(v) => n <= *v as f64,
            Bound::PosInfinity => true,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInfinity => f.write_str("-inf"),
            Bound::Value(v) => write!(f, "{}", v),
            Bound::PosInfinity => f.write_str("+inf"),
        }
    }
}

/// A single predicate on one document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Inclusive numeric range.
    Range { field: String, min: Bound, max: Bound },
    /// Exact tag match.
    Tag { field: String, value: String },
}

impl Clause {
    /// Point lookup on a numeric field, expressed as a degenerate range.
    pub fn point(field: impl Into<String>, value: i64) -> Self {
        Clause::Range {
            field: field.into(),
            min: Bound::Value(value),
            max: Bound::Value(value),
        }
    }

    pub fn range(field: impl Into<String>, min: Bound, max: Bound) -> Self {
        Clause::Range {
            field: field.into(),
            min,
            max,
        }
    }

    pub fn tag(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Tag {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Clause::Range { field, .. } | Clause::Tag { field, .. } => field,
        }
    }

    /// Test the clause against a JSON document. Missing or mistyped fields
    /// never match.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Clause::Range { field, min, max } => match doc.get(field).and_then(Value::as_f64) {
                Some(n) => min.admits_from_below(n) && max.admits_from_above(n),
                None => false,
            },
            Clause::Tag { field, value } => {
                doc.get(field).and_then(Value::as_str) == Some(value.as_str())
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Range { field, min, max } => write!(f, "@{}:[{} {}]", field, min, max),
            Clause::Tag { field, value } => write!(f, "@{}:{}", field, value),
        }
    }
}

/// True when every clause matches. An empty clause list matches everything.
pub fn matches_all(clauses: &[Clause], doc: &Value) -> bool {
    clauses.iter().all(|clause| clause.matches(doc))
}

/// A translated search: clauses plus paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub clauses: Vec<Clause>,
    pub offset: usize,
    pub limit: usize,
}

impl SearchQuery {
    /// A query with the fixed page window.
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            clauses,
            offset: PAGE_OFFSET,
            limit: PAGE_LIMIT,
        }
    }

    pub fn match_all() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the clause list as a query string.
    pub fn query_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str(MATCH_ALL);
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}
