//! Filter expression builders.
//!
//! A filter expression is a short string in the matcher's micro-grammar:
//!
//! | form                           | meaning                         |
//! |--------------------------------|---------------------------------|
//! | `eq=v`                         | exact match                     |
//! | `oneof=a b`                    | any of the space-separated list |
//! | `oneof!=a b`                   | none of the list                |
//! | `ne=a,ne=b`                    | none of (bot exclusion only)    |
//! | `gt=<ts>,lt=<ts>`              | time range                      |
//! | `contains=a`                   | substring match                 |
//! | `or contains=a contains=b`     | any substring                   |
//! | empty                          | unconstrained                   |
//!
//! The two exclusion spellings are both consumed downstream and are kept
//! as they are.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Accounts whose activity counts as bot activity.
pub const BOT_IDENTITIES: &[&str] = &[
    "ci-robot",
    "openeuler-ci-bot",
    "openeuler-sync-bot",
    "openeuler-bot",
];

/// The universal repository wildcard.
pub const WILDCARD: &str = "*";

/// Timestamp layout used inside time-range expressions.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%z";

/// A single filter expression. Empty means "matches everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpr(String);

impl FilterExpr {
    /// The unconstrained expression.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this expression leaves the field unconstrained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the expression text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for FilterExpr {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Split a comma-separated request field into trimmed, non-empty values.
pub fn split_values(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty<S: AsRef<str>>(values: &[S]) -> Vec<&str> {
    values
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Exact match for one value, `oneof` for several, empty for none.
///
/// Empty strings are dropped before the arity check.
pub fn build_set_filter<S: AsRef<str>>(values: &[S]) -> FilterExpr {
    match non_empty(values).as_slice() {
        [] => FilterExpr::empty(),
        [single] => FilterExpr(format!("eq={single}")),
        many => FilterExpr(format!("oneof={}", many.join(" "))),
    }
}

/// Closed time range; both bounds are required.
pub fn build_time_range_filter(
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
) -> FilterExpr {
    match (start, end) {
        (Some(start), Some(end)) => FilterExpr(format!(
            "gt={},lt={}",
            start.format(TIME_FORMAT),
            end.format(TIME_FORMAT)
        )),
        _ => FilterExpr::empty(),
    }
}

/// `true` keeps only bot activity, `false` drops it, `None` ignores bots.
pub fn build_bot_filter(is_bot: Option<bool>) -> FilterExpr {
    match is_bot {
        Some(true) => FilterExpr(format!("oneof={}", BOT_IDENTITIES.join(" "))),
        Some(false) => FilterExpr(
            BOT_IDENTITIES
                .iter()
                .map(|bot| format!("ne={bot}"))
                .collect::<Vec<_>>()
                .join(","),
        ),
        None => FilterExpr::empty(),
    }
}

/// Membership pair: `mine` is an inclusion list, `others` an exclusion list.
///
/// Both arguments are comma-separated lists.
pub fn build_membership_filter(
    mine: Option<&str>,
    others: Option<&str>,
) -> (FilterExpr, FilterExpr) {
    let list = |raw: Option<&str>, op: &str| {
        let values = split_values(raw);
        if values.is_empty() {
            FilterExpr::empty()
        } else {
            FilterExpr(format!("{op}={}", values.join(" ")))
        }
    };
    (list(mine, "oneof"), list(others, "oneof!"))
}

/// Substring match on any term, always in the `or` form.
pub fn build_contains_any<S: AsRef<str>>(values: &[S]) -> FilterExpr {
    let values = non_empty(values);
    if values.is_empty() {
        return FilterExpr::empty();
    }
    FilterExpr(format!("or {}", contains_terms(&values)))
}

/// Substring match; a single term is emitted bare, two or more get `or`.
pub fn build_contains_filter<S: AsRef<str>>(values: &[S]) -> FilterExpr {
    match non_empty(values).as_slice() {
        [] => FilterExpr::empty(),
        [single] => FilterExpr(format!("contains={single}")),
        many => FilterExpr(format!("or {}", contains_terms(many))),
    }
}

fn contains_terms(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("contains={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimal repository constraint set produced by [`build_path_merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMerge {
    /// Full `namespace/repo` paths, `namespace/*` entries, or exactly `["*"]`.
    pub repo_names: Vec<String>,
    /// Namespaces covered by a `namespace/*` entry.
    pub namespaces: Vec<String>,
}

impl PathMerge {
    /// Whether the merge covers every repository.
    pub fn is_universal(&self) -> bool {
        self.repo_names.len() == 1 && self.repo_names[0] == WILDCARD
    }
}

/// Merge `namespace/repo` paths into the smallest equivalent set.
///
/// Wildcard entries are processed first so that `ns/*` suppresses any
/// `ns/repo` regardless of input order, and `*` collapses everything.
pub fn build_path_merge<S: AsRef<str>>(paths: &[S]) -> PathMerge {
    let mut sorted: Vec<&str> = paths
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect();
    sorted.sort_by_key(|p| !p.contains(WILDCARD));

    let mut merged = PathMerge::default();
    for path in sorted {
        if path == WILDCARD {
            return PathMerge {
                repo_names: vec![WILDCARD.to_string()],
                namespaces: Vec::new(),
            };
        }

        match path.split_once('/') {
            Some((namespace, WILDCARD)) => {
                if !merged.namespaces.iter().any(|n| n == namespace) {
                    merged.namespaces.push(namespace.to_string());
                    merged.repo_names.push(format!("{namespace}/{WILDCARD}"));
                }
            }
            Some((namespace, _)) if merged.namespaces.iter().any(|n| n == namespace) => {}
            _ => {
                if !merged.repo_names.iter().any(|r| r == path) {
                    merged.repo_names.push(path.to_string());
                }
            }
        }
    }
    merged
}

/// Repository field for the Gitee schemas.
///
/// A universal wildcard leaves the field unconstrained.
pub fn build_repo_filter<S: AsRef<str>>(paths: &[S]) -> FilterExpr {
    let merged = build_path_merge(paths);
    if merged.is_universal() {
        return FilterExpr::empty();
    }
    build_set_filter(&merged.repo_names)
}
