//! Table Extractor Module
//!
//! Recovers the tables a statement touches by scanning for table-introducing
//! keywords. This is a lexical scanner, not a parser: aliases, schema
//! qualifiers, subqueries and CTEs are not resolved. Callers treat an empty
//! result as "unknown tables" and fall back to a full invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use regex::Regex;

/// Keyword followed by an optionally quoted identifier.
static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        r"FROM",
        r"|(?:(?:INNER|LEFT|RIGHT|CROSS|OUTER)\s+)?JOIN",
        r"|UPDATE",
        r"|(?:INSERT|REPLACE)\s+INTO",
        r"|DELETE\s+FROM",
        r"|TRUNCATE(?:\s+TABLE)?",
        r"|ALTER\s+TABLE",
        r"|DROP\s+TABLE(?:\s+IF\s+EXISTS)?",
        r#")\s+[`"\[]?([a-zA-Z0-9_]+)[`"\]]?"#,
    ))
    .expect("table pattern must compile")
});

// == Scan ==
/// Scans `sql` for table references without consulting any memo.
///
/// Returns each identifier once, in order of first appearance.
pub fn scan_tables(sql: &str) -> Vec<String> {
    let mut tables: Vec<String> = Vec::new();

    for captures in TABLE_PATTERN.captures_iter(sql) {
        if let Some(name) = captures.get(1) {
            let name = name.as_str();
            if !tables.iter().any(|t| t == name) {
                tables.push(name.to_string());
            }
        }
    }

    tables
}

// == Table Extractor ==
/// Memoizing table extractor.
///
/// The memo lives for one processing cycle. Long-lived hosts call
/// [`TableExtractor::reset`] at every cycle boundary.
#[derive(Debug, Default)]
pub struct TableExtractor {
    /// Extracted tables keyed by the exact SQL text
    memo: Mutex<HashMap<String, Vec<String>>>,
    /// Number of scans that actually ran the pattern
    scans: AtomicU64,
}

impl TableExtractor {
    // == Constructor ==
    /// Creates an extractor with an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    // == Extract ==
    /// Returns the tables referenced by `sql`, scanning at most once per
    /// distinct string until the next reset.
    pub fn extract(&self, sql: &str) -> Vec<String> {
        let mut memo = self.lock_memo();

        if let Some(tables) = memo.get(sql) {
            return tables.clone();
        }

        let tables = scan_tables(sql);
        self.scans.fetch_add(1, Ordering::Relaxed);
        memo.insert(sql.to_string(), tables.clone());
        tables
    }

    // == Reset ==
    /// Drops every memoized result. Returns how many were dropped.
    pub fn reset(&self) -> usize {
        let mut memo = self.lock_memo();
        let dropped = memo.len();
        memo.clear();
        dropped
    }

    /// Number of memoized statements.
    pub fn memo_len(&self) -> usize {
        self.lock_memo().len()
    }

    /// Number of real scans performed since creation.
    pub fn scan_count(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    // A panic while holding the memo cannot leave it half-written.
    fn lock_memo(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tables(sql: &str) -> Vec<String> {
        TableExtractor::new().extract(sql)
    }

    #[test]
    fn test_extract_simple_select() {
        assert_eq!(tables("SELECT * FROM users"), vec!["users"]);
    }

    #[test]
    fn test_extract_join() {
        assert_eq!(
            tables("SELECT u.*, o.total FROM users u JOIN orders o ON o.user_id = u.id"),
            vec!["users", "orders"]
        );
    }

    #[test]
    fn test_extract_qualified_joins() {
        let sql = "SELECT o.*, c.name FROM orders o LEFT JOIN customers c ON o.customer_id = c.id \
                   RIGHT JOIN shipments s ON o.id = s.order_id CROSS JOIN regions";
        assert_eq!(
            tables(sql),
            vec!["orders", "customers", "shipments", "regions"]
        );
    }

    #[test]
    fn test_extract_left_outer_join() {
        assert_eq!(
            tables("SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.a_id"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_extract_insert() {
        assert_eq!(
            tables("INSERT INTO orders (id, user_id) VALUES (?, ?)"),
            vec!["orders"]
        );
    }

    #[test]
    fn test_extract_replace_into() {
        assert_eq!(tables("REPLACE INTO settings VALUES (1, 'x')"), vec!["settings"]);
    }

    #[test]
    fn test_extract_update() {
        assert_eq!(tables("UPDATE users SET name = ? WHERE id = ?"), vec!["users"]);
    }

    #[test]
    fn test_extract_delete() {
        assert_eq!(
            tables("DELETE FROM sessions WHERE last_activity < ?"),
            vec!["sessions"]
        );
    }

    #[test]
    fn test_extract_ddl() {
        assert_eq!(tables("TRUNCATE TABLE logs"), vec!["logs"]);
        assert_eq!(tables("TRUNCATE logs"), vec!["logs"]);
        assert_eq!(tables("ALTER TABLE users ADD COLUMN age INT"), vec!["users"]);
        assert_eq!(tables("DROP TABLE IF EXISTS temp_import"), vec!["temp_import"]);
        assert_eq!(tables("DROP TABLE temp_import"), vec!["temp_import"]);
    }

    #[test]
    fn test_extract_quoted_identifiers() {
        assert_eq!(
            tables("SELECT * FROM `t1` INNER JOIN `t2` ON `t1`.id = `t2`.t1_id"),
            vec!["t1", "t2"]
        );
        assert_eq!(tables(r#"SELECT * FROM "accounts""#), vec!["accounts"]);
        assert_eq!(tables("SELECT * FROM [ledger]"), vec!["ledger"]);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        assert_eq!(
            tables("select * from Users inner join orders on 1 = 1"),
            vec!["Users", "orders"]
        );
    }

    #[test]
    fn test_extract_deduplicates_in_order() {
        assert_eq!(
            tables("SELECT * FROM users WHERE id IN (SELECT user_id FROM orders JOIN users ON 1 = 1)"),
            vec!["users", "orders"]
        );
    }

    #[test]
    fn test_extract_unknown_returns_empty() {
        assert!(tables("SELECT 1").is_empty());
        assert!(tables("").is_empty());
        assert!(tables("BEGIN").is_empty());
    }

    #[test]
    fn test_extract_memoizes() {
        let extractor = TableExtractor::new();
        let sql = "SELECT * FROM users WHERE id = ?";

        let first = extractor.extract(sql);
        let second = extractor.extract(sql);

        assert_eq!(first, second);
        assert_eq!(extractor.scan_count(), 1);
        assert_eq!(extractor.memo_len(), 1);
    }

    #[test]
    fn test_reset_clears_memo() {
        let extractor = TableExtractor::new();
        extractor.extract("SELECT * FROM users");
        extractor.extract("SELECT * FROM orders");

        assert_eq!(extractor.reset(), 2);
        assert_eq!(extractor.memo_len(), 0);

        extractor.extract("SELECT * FROM users");
        assert_eq!(extractor.scan_count(), 3);
    }

    #[test]
    fn test_scan_tables_bypasses_memo() {
        assert_eq!(scan_tables("SELECT * FROM users"), vec!["users"]);
    }
}
