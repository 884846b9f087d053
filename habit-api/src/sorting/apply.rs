//! Sort expression parsing and composite ordering

use std::cmp::Ordering;
use std::fmt;

use super::mapping::{sort_terms, KeyFn, SortKey, SortMapping};
use crate::error::{Error, Result};
use crate::repository::OrderDirection;

/// One parsed term of a sort expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    pub field: String,
    pub descending: bool,
}

impl SortTerm {
    /// Parse a single term such as `"date"` or `"date DESC"`
    ///
    /// Returns `None` for a blank term. Any trailing token other than a
    /// case-insensitive `desc` is read as ascending.
    pub fn parse(term: &str) -> Option<Self> {
        let mut tokens = term.split_whitespace();
        let field = tokens.next()?;
        let descending = tokens
            .next()
            .is_some_and(|marker| marker.eq_ignore_ascii_case("desc"));

        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// Parse every term of a comma-separated expression, in priority order
    pub fn parse_all(sort: &str) -> Vec<Self> {
        sort_terms(sort).filter_map(Self::parse).collect()
    }
}

/// One level of a composite ordering
pub struct OrderTerm<S> {
    pub storage_path: &'static str,
    pub key: KeyFn<S>,
    pub direction: OrderDirection,
}

impl<S> OrderTerm<S> {
    fn compare(&self, a: &S, b: &S) -> Ordering {
        let ordering = (self.key)(a).cmp(&(self.key)(b));
        if self.direction.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl<S> Clone for OrderTerm<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for OrderTerm<S> {}

impl<S> fmt::Debug for OrderTerm<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.storage_path, self.direction)
    }
}

/// Ordered list of storage keys with directions; the first term is primary
pub struct OrderBy<S> {
    terms: Vec<OrderTerm<S>>,
}

impl<S> OrderBy<S> {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Append a lower-priority term
    pub fn then(mut self, key: SortKey<S>, direction: OrderDirection) -> Self {
        self.terms.push(OrderTerm {
            storage_path: key.storage_path,
            key: key.key,
            direction,
        });
        self
    }

    pub fn terms(&self) -> &[OrderTerm<S>] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compare two records term by term until one differs
    pub fn compare(&self, a: &S, b: &S) -> Ordering {
        self.terms
            .iter()
            .map(|term| term.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort; records equal on every term keep their order
    pub fn sort_slice(&self, records: &mut [S]) {
        if !self.terms.is_empty() {
            records.sort_by(|a, b| self.compare(a, b));
        }
    }
}

impl<S> Default for OrderBy<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for OrderBy<S> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
        }
    }
}

impl<S> fmt::Debug for OrderBy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.terms).finish()
    }
}

/// Build the composite ordering for a sort expression
///
/// An absent or blank expression orders ascending by `default_key`.
/// Each term's storage direction is the requested direction flipped when
/// its mapping is reversed. A term naming an unmapped field is a wiring bug
/// (the expression should have been validated first) and fails with
/// [`Error::Configuration`].
pub fn apply_sort<S>(
    sort: Option<&str>,
    mappings: &[SortMapping<S>],
    default_key: SortKey<S>,
) -> Result<OrderBy<S>> {
    let terms = sort.map(SortTerm::parse_all).unwrap_or_default();

    if terms.is_empty() {
        return Ok(OrderBy::new().then(default_key, OrderDirection::Ascending));
    }

    terms.iter().try_fold(OrderBy::new(), |order, term| {
        let mapping = mappings
            .iter()
            .find(|m| m.matches(&term.field))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "no sort mapping for field '{}' reached the sort applier",
                    term.field
                ))
            })?;

        let direction = OrderDirection::from_descending(term.descending ^ mapping.reverse);
        Ok(order.then(mapping.storage, direction))
    })
}
