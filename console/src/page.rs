//! Result document assembly.
//!
//! Produces the final HTML page: the echoed request form, the status
//! line, the table panel, and the collapsible raw-JSON panel. Element
//! ids are the document's contract (`db`, `sql`, `run`, `message`,
//! `tableContainer`, `json`, `jsonDetails`).

use crate::client::ViewState;
use crate::render::escape_html;

/// Renders the complete result document for one query.
pub fn render_page(db: &str, sql: &str, view: &ViewState) -> String {
    let details_open = if view.details_open { " open" } else { "" };
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>gestor - resultado</title>
<style>
body {{ font-family: sans-serif; margin: 1.5rem; }}
table.query-result {{ border-collapse: collapse; }}
table.query-result th, table.query-result td {{ border: 1px solid #999; padding: 0.25rem 0.5rem; }}
.no-rows {{ color: #666; font-style: italic; }}
#message {{ margin: 0.5rem 0; font-weight: bold; }}
</style>
</head>
<body>
<h1>Resultado de la consulta</h1>
<form>
<label>Base de datos <input id="db" value="{db}" readonly></label>
<label>SQL <textarea id="sql" readonly>{sql}</textarea></label>
<button id="run" type="button" disabled>Ejecutar</button>
</form>
<div id="message">{message}</div>
<div id="tableContainer">{table}</div>
<details id="jsonDetails"{details_open}>
<summary>JSON</summary>
<pre id="json">{json}</pre>
</details>
</body>
</html>
"#,
        db = escape_html(db),
        sql = escape_html(sql),
        message = escape_html(&view.message),
        table = view.table_html,
        json = escape_html(&view.json_panel),
    )
}
