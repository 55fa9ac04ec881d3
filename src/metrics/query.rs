//! Per-query records fed into the collector

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// SQL statement category tracked by the per-type counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    /// Anything else (DDL, PRAGMA, transaction control, ...)
    #[default]
    Other,
}

impl StatementType {
    /// The four statement types with dedicated counters
    pub const COUNTED: [Self; 4] = [Self::Select, Self::Insert, Self::Update, Self::Delete];

    /// Parse a statement type name, ignoring case and surrounding whitespace
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("select") {
            Self::Select
        } else if name.eq_ignore_ascii_case("insert") {
            Self::Insert
        } else if name.eq_ignore_ascii_case("update") {
            Self::Update
        } else if name.eq_ignore_ascii_case("delete") {
            Self::Delete
        } else {
            Self::Other
        }
    }

    /// Classify SQL text by its leading keyword
    ///
    /// A leading `WITH` clause is a common-table-expression prefix; the
    /// statement is classified by the first keyword outside the CTE bodies.
    #[must_use]
    pub fn from_sql(sql: &str) -> Self {
        let first = sql
            .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
            .find(|w| !w.is_empty());

        match first {
            Some(word) if word.eq_ignore_ascii_case("with") => top_level_words(sql)
                .into_iter()
                .skip(1)
                .map(Self::parse)
                .find(|kind| *kind != Self::Other)
                .unwrap_or(Self::Other),
            Some(word) => Self::parse(word),
            None => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        }
    }
}

/// Words of `sql` that sit outside any parentheses
fn top_level_words(sql: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in sql.char_indices() {
        if c.is_whitespace() || matches!(c, '(' | ')' | ';' | ',') {
            if let Some(s) = start.take()
                && depth == 0
            {
                words.push(&sql[s..i]);
            }
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start
        && depth == 0
    {
        words.push(&sql[s..]);
    }
    words
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StatementType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// One completed query, as reported by the data-store adaptor
///
/// Consumed by `Collector::record` and folded into cumulative counters;
/// individual records are not retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// SQL text, when the caller chose to keep it
    pub query: Option<String>,
    pub started_at: SystemTime,
    pub duration: Duration,
    /// Rows returned (SELECT) or modified (DML)
    pub rows_affected: u64,
    /// Error message when the query failed
    pub error: Option<String>,
    pub statement_type: StatementType,
}

impl QueryMetrics {
    /// Record for a successful query of the given type
    #[must_use]
    pub fn new(statement_type: StatementType, duration: Duration) -> Self {
        Self {
            query: None,
            started_at: SystemTime::now()
                .checked_sub(duration)
                .unwrap_or(SystemTime::UNIX_EPOCH),
            duration,
            rows_affected: 0,
            error: None,
            statement_type,
        }
    }

    /// Record for a query identified only by its SQL text
    #[must_use]
    pub fn from_sql(sql: impl Into<String>, duration: Duration) -> Self {
        let sql = sql.into();
        Self {
            statement_type: StatementType::from_sql(&sql),
            query: Some(sql),
            ..Self::new(StatementType::Other, duration)
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Effective statement type, falling back to the SQL text when untyped
    #[must_use]
    pub fn statement_type(&self) -> StatementType {
        match (self.statement_type, &self.query) {
            (StatementType::Other, Some(sql)) => StatementType::from_sql(sql),
            (kind, _) => kind,
        }
    }

    #[must_use]
    #[inline]
    pub fn was_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether this query exceeded the slow-query threshold
    #[must_use]
    #[inline]
    pub fn is_slow(&self, threshold: Duration) -> bool {
        self.duration > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(StatementType::parse("select"), StatementType::Select);
        assert_eq!(StatementType::parse(" INSERT "), StatementType::Insert);
        assert_eq!(StatementType::parse("Update"), StatementType::Update);
        assert_eq!(StatementType::parse("DELETE"), StatementType::Delete);
        assert_eq!(StatementType::parse("vacuum"), StatementType::Other);
        assert_eq!(StatementType::parse(""), StatementType::Other);
    }

    #[test]
    fn test_from_sql() {
        assert_eq!(
            StatementType::from_sql("  select * from users"),
            StatementType::Select
        );
        assert_eq!(
            StatementType::from_sql("INSERT INTO t VALUES (1)"),
            StatementType::Insert
        );
        assert_eq!(
            StatementType::from_sql("(SELECT 1) UNION (SELECT 2)"),
            StatementType::Select
        );
        assert_eq!(
            StatementType::from_sql("WITH recent AS (SELECT id FROM t) DELETE FROM t"),
            StatementType::Delete
        );
        assert_eq!(
            StatementType::from_sql("WITH x AS (VALUES (1)) UPDATE t SET a = 1"),
            StatementType::Update
        );
        assert_eq!(StatementType::from_sql("PRAGMA page_count"), StatementType::Other);
        assert_eq!(StatementType::from_sql("   "), StatementType::Other);
    }

    #[test]
    fn test_is_slow_is_strict() {
        let threshold = Duration::from_millis(100);
        let at = QueryMetrics::new(StatementType::Select, threshold);
        let over = QueryMetrics::new(StatementType::Select, threshold + Duration::from_nanos(1));
        assert!(!at.is_slow(threshold));
        assert!(over.is_slow(threshold));
    }

    #[test]
    fn test_statement_type_falls_back_to_sql() {
        let query = QueryMetrics::from_sql("delete from sessions", Duration::from_millis(3));
        assert_eq!(query.statement_type(), StatementType::Delete);

        let mut typed = QueryMetrics::new(StatementType::Insert, Duration::ZERO);
        typed.query = Some("SELECT 1".to_string());
        assert_eq!(typed.statement_type(), StatementType::Insert);
    }

    #[test]
    fn test_builders() {
        let query = QueryMetrics::new(StatementType::Update, Duration::from_millis(12))
            .with_rows(4)
            .with_error("deadlock detected");
        assert_eq!(query.rows_affected, 4);
        assert!(query.was_error());
        assert_eq!(query.error.as_deref(), Some("deadlock detected"));
    }
}
