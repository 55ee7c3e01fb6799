//! Best-effort structural scan of dbt SQL
//!
//! This is pattern matching over semi-structured text, not a SQL parser.
//! Ambiguous aliasing, nested subqueries and commented-out code can all
//! produce false positives or misses. The compliance rules depend on this
//! exact behavior, so it must not be upgraded to a real grammar.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Marker of the final projection CTE. Only text after its last occurrence is scanned for columns.
pub const FINAL_PROJECTION_MARKER: &str = "final as (";

/// `{{ ref('model') }}` with single or double quotes
fn ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{\{\s*ref\(['"](\w+)['"]\)\s*\}\}"#).expect("Invalid regex")
    })
}

/// An identifier after `select` or a comma, optionally after an `... as`
/// alias clause, followed by a comma, `from`, or end of text.
///
/// The trailing context is consumed here; callers restart the search at the
/// end of the captured identifier so the next match can begin on that comma.
fn column_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:select|,)\s+(?:.*?\s+as\s+)?([a-zA-Z_][a-zA-Z0-9_]*)\s*(?:,|from|$)")
            .expect("Invalid regex")
    })
}

/// Structural scanner for model SQL
pub struct StructuralScan;

impl StructuralScan {
    /// Names of all models referenced through `ref()`
    ///
    /// Duplicates collapse; the set carries no source order.
    pub fn references(sql: &str) -> BTreeSet<String> {
        ref_pattern()
            .captures_iter(sql)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Text searched for projected columns
    ///
    /// Everything after the last [`FINAL_PROJECTION_MARKER`] if present,
    /// otherwise the whole text.
    pub fn projection_scope(sql: &str) -> &str {
        sql.rsplit_once(FINAL_PROJECTION_MARKER)
            .map(|(_, after)| after)
            .unwrap_or(sql)
    }

    /// Projected column names in first-seen order
    ///
    /// Not deduplicated: a name selected twice appears twice.
    pub fn columns(sql: &str) -> Vec<String> {
        let scope = Self::projection_scope(sql);
        let pattern = column_pattern();

        let mut names = Vec::new();
        let mut start = 0;

        while let Some(caps) = pattern.captures_at(scope, start) {
            let Some(name) = caps.get(1) else {
                break;
            };
            names.push(name.as_str().to_string());
            start = name.end();
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn references_deduplicate() {
        let sql = r#"
            with orders as (select * from {{ ref('stg_orders') }}),
            customers as (select * from {{ref("dim_customers")}}),
            again as (select * from {{ ref('stg_orders') }})
            select * from orders
        "#;

        let refs = StructuralScan::references(sql);
        assert_eq!(refs.len(), 2);
        assert!(refs.contains("stg_orders"));
        assert!(refs.contains("dim_customers"));
    }

    #[test]
    fn references_ignore_sources() {
        let sql = "select * from {{ source('raw', 'orders') }}";
        assert!(StructuralScan::references(sql).is_empty());
    }

    #[test]
    fn columns_in_order() {
        let sql = "select\n    order_id,\n    customer_key,\n    amount\nfrom {{ ref('stg_sales') }}\n";
        assert_eq!(StructuralScan::columns(sql), vec!["order_id", "customer_key", "amount"]);
    }

    #[test]
    fn columns_through_alias() {
        let sql = "select\n    id as order_id,\n    cast(amt as numeric) as amount\nfrom raw\n";
        assert_eq!(StructuralScan::columns(sql), vec!["order_id", "amount"]);
    }

    #[test]
    fn columns_case_insensitive() {
        let sql = "SELECT Id,\n    Name\nFROM customers";
        assert_eq!(StructuralScan::columns(sql), vec!["Id", "Name"]);
    }

    #[test]
    fn columns_at_end_of_text() {
        assert_eq!(StructuralScan::columns("select a, b"), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_columns_are_kept() {
        assert_eq!(StructuralScan::columns("select a, a from t"), vec!["a", "a"]);
    }

    #[test]
    fn scope_starts_after_last_marker() {
        let sql = "with final as (select a, b from t), final as (select c, d from t) select * from final";
        assert_eq!(StructuralScan::projection_scope(sql), "select c, d from t) select * from final");
        assert_eq!(StructuralScan::columns(sql), vec!["c", "d"]);
    }

    #[test]
    fn scope_without_marker_is_whole_text() {
        let sql = "select a from t";
        assert_eq!(StructuralScan::projection_scope(sql), sql);
        // Marker match is case-sensitive
        let upper = "with FINAL AS (select x from t) select y from t";
        assert_eq!(StructuralScan::projection_scope(upper), upper);
    }

    #[test]
    fn comma_without_whitespace_is_missed() {
        // Known imprecision: a comma must be followed by whitespace
        assert_eq!(StructuralScan::columns("select a,b from t"), vec!["a"]);
    }
}
