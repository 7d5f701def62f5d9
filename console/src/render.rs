//! HTML table rendering.
//!
//! Turns a row sequence into table markup. The column set is the union
//! of keys across all row objects, in first-seen order; rows that are
//! not objects contribute no columns and render empty cells.

use serde_json::Value;

/// Placeholder shown when the result has no rows.
pub const NO_ROWS_PLACEHOLDER: &str = "No hay filas.";

/// Renders a row sequence as an HTML table.
///
/// Empty input renders the placeholder and no table element. Null and
/// absent cell values render as empty strings; everything else renders
/// as its string form. Never fails.
pub fn render_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return format!("<div class=\"no-rows\">{NO_ROWS_PLACEHOLDER}</div>");
    }

    let columns = column_set(rows);

    let mut html = String::from("<table class=\"query-result\"><thead><tr>");
    for column in &columns {
        html.push_str("<th>");
        html.push_str(&escape_html(column));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for row in rows {
        html.push_str("<tr>");
        for column in &columns {
            let cell = row.as_object().and_then(|object| object.get(column));
            html.push_str("<td>");
            html.push_str(&escape_html(&cell_text(cell)));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Union of keys across all row objects, each column once, first-seen
/// order.
pub fn column_set(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Some(object) = row.as_object() {
            for key in object.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// String form of one cell. Strings render bare, nested structures as
/// compact JSON.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested) => nested.to_string(),
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
