//! Ordered fallback chains for locating a field in a loosely shaped row.
//!
//! Sheets behind the endpoint rename their headers freely, so every field is
//! looked up through a list of rules tried in order: a canonical key, then
//! header spellings seen in the wild, then a fixed column.

use serde_json::Value;

use crate::row::{present_text, RawRow};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// Exact header key.
    Key(&'static str),
    /// First header among the variants that carries a value.
    AnyKey(&'static [&'static str]),
    /// N-th cell in delivery order.
    Position(usize),
    /// `col_N` keyed cell of a horizontal row.
    ColumnKey(usize),
}

impl FieldRule {
    fn cells<'a>(self, row: &'a RawRow) -> Vec<&'a Value> {
        match self {
            Self::Key(key) => row.get(key).into_iter().collect(),
            Self::AnyKey(keys) => keys.iter().filter_map(|key| row.get(key)).collect(),
            Self::Position(index) => row.position(index).into_iter().collect(),
            Self::ColumnKey(index) => row.column(index).into_iter().collect(),
        }
    }
}

/// First-matching-rule resolver.
#[derive(Clone, Copy)]
pub struct FieldResolver {
    rules: &'static [FieldRule],
    accept: fn(&str) -> bool,
    strings_only: bool,
}

impl std::fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldResolver")
            .field("rules", &self.rules)
            .field("strings_only", &self.strings_only)
            .finish_non_exhaustive()
    }
}

fn accept_any(_: &str) -> bool {
    true
}

impl FieldResolver {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self {
            rules,
            accept: accept_any,
            strings_only: false,
        }
    }

    /// Only text cells match; numbers and booleans are skipped.
    pub const fn strings_only(mut self) -> Self {
        self.strings_only = true;
        self
    }

    /// Values failing `accept` do not match; resolution moves on.
    pub const fn accepting(mut self, accept: fn(&str) -> bool) -> Self {
        self.accept = accept;
        self
    }

    pub fn resolve(&self, row: &RawRow) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            rule.cells(row)
                .into_iter()
                .filter(|cell| !self.strings_only || cell.is_string())
                .filter_map(present_text)
                .find(|value| (self.accept)(value))
        })
    }
}

pub const PARTY_HEADERS_SCAN: &[&str] = &[
    "Party Name",
    "party",
    "Party",
    "PARTY NAME",
    "PartyName",
    "party_name",
    "Party_Name",
];

pub const PARTY_HEADERS: &[&str] = &["Party Name", "party", "Party", "PARTY NAME", "party_name"];

/// Party lookup used when scanning every stage for distinct names.
pub const PARTY_SCAN: FieldResolver = FieldResolver::new(&[
    FieldRule::Position(2),
    FieldRule::AnyKey(PARTY_HEADERS_SCAN),
])
.accepting(is_party_name)
.strings_only();

/// Party lookup used when filtering a stage's rows for one party.
pub const PARTY_FILTER: FieldResolver = FieldResolver::new(&[
    FieldRule::Key("PartyName"),
    FieldRule::AnyKey(PARTY_HEADERS),
    FieldRule::Position(2),
]);

pub const STATUS: FieldResolver = FieldResolver::new(&[
    FieldRule::AnyKey(&["Status", "Azure Status", "status"]),
    FieldRule::Position(10),
]);

pub const STATUS_LENIENT: FieldResolver = FieldResolver::new(&[
    FieldRule::AnyKey(&[
        "Status", "status", "STATUS", "State", "state", "Progress", "progress", "Complete",
        "complete", "Done", "done",
    ]),
    FieldRule::Position(10),
]);

pub const DRAFT_CATEGORY: FieldResolver = FieldResolver::new(&[
    FieldRule::AnyKey(&["DraftCategory", "Draft Category"]),
    FieldRule::Position(5),
]);

pub const DRAFT_NAME: FieldResolver = FieldResolver::new(&[
    FieldRule::AnyKey(&["DraftName", "Draft Name"]),
    FieldRule::Position(6),
]);

pub const PLANNED: FieldResolver =
    FieldResolver::new(&[FieldRule::Key("Planned"), FieldRule::Position(7)]);

pub const ACTUAL: FieldResolver =
    FieldResolver::new(&[FieldRule::Key("Actual"), FieldRule::Position(8)]);

pub const DELAY: FieldResolver =
    FieldResolver::new(&[FieldRule::Key("Delay"), FieldRule::Position(9)]);

pub const TASK_STATUS: FieldResolver = FieldResolver::new(&[
    FieldRule::AnyKey(&["Status", "Azure Status"]),
    FieldRule::Position(10),
]);

/// Rejects header echoes and `D/M/YYYY` dates that land in the party column.
pub fn is_party_name(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && !trimmed.eq_ignore_ascii_case("party name")
        && !trimmed.contains("Party Name")
        && !starts_with_date(trimmed)
}

/// Matches a leading `D/M/YYYY` (one or two digit day and month).
pub fn starts_with_date(value: &str) -> bool {
    let mut parts = value.splitn(3, '/');
    let (Some(day), Some(month), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let short_digits = |part: &str| {
        (1..=2).contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
    };

    short_digits(day)
        && short_digits(month)
        && rest.len() >= 4
        && rest.bytes().take(4).all(|byte| byte.is_ascii_digit())
}

/// Trim- and case-insensitive party comparison.
pub fn same_party(candidate: &str, party: &str) -> bool {
    candidate.trim().to_lowercase() == party.trim().to_lowercase()
}
