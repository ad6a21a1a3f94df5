use crate::config::SortConfig;
use std::fmt;

/// Sort direction for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort specification: one field plus a direction. The wire encoding is the
/// bare field name, prefixed with `-` for descending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse a raw `sort` query value. A single leading `-` marks descending
    /// order; everything after it is the field name, taken verbatim.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix('-')
            .map_or_else(|| Self::ascending(raw), Self::descending)
    }

    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            write!(f, "-{}", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Resolve the effective sort for one request.
///
/// A requested field outside a non-empty allow-list falls back to the
/// configured default, discarding the requested direction as well - a
/// disallowed field is never applied. An empty allow-list means any field is
/// accepted verbatim.
#[must_use]
pub fn resolve_sort(requested: Option<&str>, config: &SortConfig) -> SortSpec {
    let Some(raw) = requested else {
        return config.default.clone();
    };
    let spec = SortSpec::parse(raw);
    if !config.allowed.is_empty() && !config.allowed.contains(&spec.field) {
        return config.default.clone();
    }
    spec
}
