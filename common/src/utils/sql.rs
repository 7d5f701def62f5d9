//! SQL text utilities.
//!
//! Normalizes free-text SQL before execution and classifies statements
//! as read (rows come back) or write (an affected-rows summary comes
//! back). This is keyword sniffing, not parsing.

/// First keywords of statements that return rows.
const READ_KEYWORDS: [&str; 7] = [
    "SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN", "TABLE", "WITH",
];

/// Normalizes a SQL statement: line breaks and runs of whitespace
/// collapse to single spaces, leading/trailing whitespace is trimmed.
pub fn clean_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the statement should be executed as a read, answering rows
/// rather than an affected-rows summary.
pub fn is_read_statement(sql: &str) -> bool {
    let Some(first) = sql.split_whitespace().next() else {
        return false;
    };
    READ_KEYWORDS
        .iter()
        .any(|keyword| first.eq_ignore_ascii_case(keyword))
}
