//! CSS styles for the mentions viewer.
//!
//! Contains the STYLE constant embedded in every page, including the label
//! colour categories used by snippet highlighting.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
:root {
    --bg: #f7f7f7;
    --fg: #333333;
    --muted: #999999;
    --accent: #d42c2c;
    --alert: #bc0e0e;
    --row-bg: #eeeeee;
    --border: #e2e2e2;
}

* { box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    font-size: 14px;
    line-height: 1.5;
    color: var(--fg);
    background: var(--bg);
    margin: 0;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: #337ab7; text-decoration: none; }
a:hover { text-decoration: underline; }
a.raw-link { color: var(--muted); }

.panel {
    margin-bottom: 20px;
    background-color: #ffffff;
    border: 1px solid var(--border);
    border-radius: 4px;
}

.panel-body { padding: 20px; }

.row { margin: 0; }

.row.centered { text-align: center; }

.mention-row {
    margin-left: 20px;
    margin-right: 20px;
    padding: 5px;
    background-color: var(--row-bg);
}

.mention-gap {
    margin-left: 20px;
    margin-right: 20px;
    padding: 5px;
    background-color: #ffffff;
}

.document-row {
    margin-left: 20px;
    margin-right: 20px;
    padding: 10px;
}

.document-row table { width: 100%; }

.pdf-link {
    width: 150px;
    text-align: center;
    background-color: var(--row-bg);
    border: 1px solid var(--row-bg);
}

.fetching { color: var(--alert); text-align: center; padding: 10px; }

.row-error { color: var(--alert); padding: 5px 20px; }

/* Pager */
.pager {
    list-style: none;
    display: flex;
    justify-content: space-between;
    padding: 0 100px;
}

.pager a { color: var(--accent); }
.pager a.disabled { color: var(--muted); pointer-events: none; }

/* Collapsed mentions */
.panel-group details { margin: 0 20px; }
.panel-group summary {
    cursor: pointer;
    color: #70695c;
    font-size: 13px;
    list-style: none;
}
.panel-title { font-weight: normal; font-size: 13px; margin: 5px 0; }

/* Annotation labels */
.label {
    display: inline;
    padding: 0.2em 0.4em;
    border-radius: 0.25em;
    color: #ffffff;
    font-weight: bold;
}
.label.person { background-color: #c56a3f; }
.label.national { background-color: #6a8e2f; }
.label.administration { background-color: #7b5ea7; }
.label.biology { background-color: #2f7bbf; }
"#;
