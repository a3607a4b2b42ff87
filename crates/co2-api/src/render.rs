//! Server-side HTML: a sidebar with the connection status and mode switch,
//! and a main area with selectors, action buttons and result tables.

use std::fmt::Write;

use co2_dashboard::{Table, ViewState};

use crate::state::Connection;

const STYLE: &str = "\
body{margin:0;font-family:sans-serif;display:flex;min-height:100vh}\
aside{width:18rem;padding:1rem;background:#f0f2f6}\
main{flex:1;padding:1rem 2rem;overflow-x:auto}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:.3rem .5rem;text-align:left;font-size:.9rem}\
th{background:#fafafa}\
.notice{padding:.6rem 1rem;border-radius:.4rem;margin:.8rem 0}\
.info{background:#e8f0fe}.warning{background:#fff4e5}\
.error{background:#fdecea}.success{background:#e6f4ea}\
.mode a{display:block;padding:.2rem 0}.mode a.active{font-weight:bold}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Relations,
    Collections,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Relations, Mode::Collections];

    pub fn path(self) -> &'static str {
        match self {
            Mode::Relations => "/relations",
            Mode::Collections => "/collections",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Relations => "Relationship queries",
            Mode::Collections => "Browse full collections",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
    Error,
    Success,
}

impl Notice {
    fn class(self) -> &'static str {
        match self {
            Notice::Info => "info",
            Notice::Warning => "warning",
            Notice::Error => "error",
            Notice::Success => "success",
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn notice(kind: Notice, text: &str) -> String {
    format!(
        r#"<div class="notice {}">{}</div>"#,
        kind.class(),
        escape(text)
    )
}

/// `<select>` whose options submit their own text as value.
pub fn select<'a>(
    name: &str,
    label: &str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: Option<&str>,
) -> String {
    let mut out = format!(
        r#"<label>{}<br><select name="{}">"#,
        escape(label),
        escape(name)
    );
    for (value, text) in options {
        let marker = if Some(value) == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{marker}>{}</option>"#,
            escape(value),
            escape(text)
        );
    }
    out.push_str("</select></label>");
    out
}

pub fn table(table: &Table) -> String {
    let mut out = String::from("<table><thead><tr>");
    for column in table.columns() {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead><tbody>");
    for row in 0..table.len() {
        out.push_str("<tr>");
        for column in 0..table.columns().len() {
            let _ = write!(out, "<td>{}</td>", escape(&table.cell_text(row, column)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Main-area markup for a view state. `Idle` renders nothing.
pub fn view_state(state: &ViewState, empty_message: &str, error_prefix: &str) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Fetching => notice(Notice::Info, "Loading..."),
        ViewState::Displaying(t) => table(t),
        ViewState::Empty => notice(Notice::Info, empty_message),
        ViewState::Error(message) => notice(Notice::Error, &format!("{error_prefix}{message}")),
    }
}

fn connection_status(connection: &Connection) -> String {
    match connection {
        Connection::Connected { keyspace } => notice(
            Notice::Success,
            &format!("Connected to the Data API (keyspace {keyspace})"),
        ),
        Connection::Failed(message) => {
            notice(Notice::Error, &format!("Connection failed: {message}"))
        }
    }
}

pub struct Page<'a> {
    pub connection: &'a Connection,
    pub mode: Mode,
    /// Mode-specific sidebar controls, already rendered.
    pub sidebar: String,
    pub main: String,
}

impl Page<'_> {
    pub fn render(&self) -> String {
        let mut out = String::from("<!doctype html><html><head><meta charset=\"utf-8\">");
        let _ = write!(
            out,
            "<title>CO2 Management Dashboard</title><style>{STYLE}</style></head><body><aside>"
        );
        out.push_str(&connection_status(self.connection));

        // A failed connection halts everything but the status above.
        if matches!(self.connection, Connection::Connected { .. }) {
            out.push_str("<h3>Mode</h3><nav class=\"mode\">");
            for mode in Mode::ALL {
                let class = if mode == self.mode { " class=\"active\"" } else { "" };
                let _ = write!(
                    out,
                    r#"<a href="{}"{class}>{}</a>"#,
                    mode.path(),
                    escape(mode.label())
                );
            }
            out.push_str("</nav>");
            out.push_str(&self.sidebar);
        }

        out.push_str("</aside><main><h1>CO2 Management Dashboard</h1>");
        if matches!(self.connection, Connection::Connected { .. }) {
            out.push_str(&self.main);
        }
        out.push_str("</main></body></html>");
        out
    }
}
