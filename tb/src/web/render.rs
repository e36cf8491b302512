//! HTML rendering for the single-page UI

use std::fmt::Write;

use textclass::Reply;

use crate::domain::Catalog;
use crate::session::SessionSnapshot;

/// One-off message shown above the page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Info(String),
    Error(String),
}

/// Everything the page needs for one render
pub struct PageView<'a> {
    pub catalog: &'a Catalog,
    pub snapshot: &'a SessionSnapshot,
    pub flash: Option<Flash>,
    pub reply: Option<Reply>,
    /// Last message typed into the chat box
    pub message: &'a str,
}

/// Escape text for HTML body and attribute contexts
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text shown while the rejection counter is at or past the threshold
pub fn warning_text(rejections: u32) -> String {
    format!("Hey, {} rejections in a row? You get a warning!", rejections)
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:18rem;padding:1rem;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:1rem 2rem}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.3rem .8rem}\
progress{width:20rem}pre{background:#fafafa;border:1px solid #eee;padding:.5rem}\
.warning{background:#fff3cd;padding:.5rem}.error{background:#f8d7da;padding:.5rem}\
.info{background:#d1e7dd;padding:.5rem}";

pub fn page(view: &PageView<'_>) -> String {
    let snap = view.snapshot;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    if snap.running {
        html.push_str("<meta http-equiv=\"refresh\" content=\"1\">");
    }
    let _ = write!(html, "<title>Task Scheduler</title><style>{}</style></head><body>", STYLE);

    // Sidebar
    html.push_str("<aside><h2>Instructions</h2><ol>");
    html.push_str("<li><b>Peek Below</b>: the task lineup is ready to roll.</li>");
    html.push_str("<li><b>Manual Jam</b>: pick a task, tick \"Accept Task\" to do it, or untick it to get an AI response back.</li>");
    html.push_str("<li><b>Auto Mode</b>: \"Start Scheduler\" runs the tasks on repeat; \"Stop Scheduler\" ends it.</li>");
    html.push_str("<li><b>Rejection Alert</b>: ditch three tasks in a row and you get a warning.</li></ol>");

    let _ = write!(
        html,
        "<h2>Scheduler Controls</h2><p>Status: <b>{}</b></p>\
         <form method=\"post\" action=\"/scheduler/start\"><button>Start Scheduler</button></form>\
         <form method=\"post\" action=\"/scheduler/stop\"><button>Stop Scheduler</button></form>",
        if snap.running { "running" } else { "stopped" }
    );

    html.push_str("<h2>Manual Execution</h2><form method=\"post\" action=\"/run\">");
    html.push_str("<label>Select Task <select name=\"task\"><option>None</option>");
    for name in view.catalog.names() {
        let _ = write!(html, "<option>{}</option>", escape(name));
    }
    html.push_str("</select></label><br>");
    html.push_str("<label><input type=\"checkbox\" name=\"accept\" value=\"on\" checked> Accept Task</label><br>");
    html.push_str("<button>Run Task Now</button></form></aside>");

    // Main column
    html.push_str("<main><h1>Task Scheduler</h1>");

    if snap.warning {
        let _ = write!(html, "<p class=\"warning\">{}</p>", escape(&warning_text(snap.rejections)));
    }
    match &view.flash {
        Some(Flash::Info(msg)) => {
            let _ = write!(html, "<p class=\"info\">{}</p>", escape(msg));
        }
        Some(Flash::Error(msg)) => {
            let _ = write!(html, "<p class=\"error\">{}</p>", escape(msg));
        }
        None => {}
    }

    html.push_str("<h2>Tasks and Progress</h2><table><tr><th>Task</th><th>Duration</th><th>Progress</th></tr>");
    for task in view.catalog.tasks() {
        let progress = snap.progress_of(&task.name).unwrap_or(0.0);
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td><progress max=\"1\" value=\"{:.3}\"></progress> {:.0}%</td></tr>",
            escape(&task.name),
            task.duration,
            progress,
            progress * 100.0
        );
    }
    html.push_str("</table>");

    html.push_str("<h2>AI Chatbot</h2><form method=\"post\" action=\"/ask\">");
    let _ = write!(
        html,
        "<label>Enter your message: <input name=\"message\" value=\"{}\"></label> <button>Get Response</button></form>",
        escape(view.message)
    );
    if let Some(reply) = &view.reply {
        let _ = write!(html, "<p id=\"reply\">{}</p>", escape(&reply.to_string()));
    }

    let _ = write!(html, "<h2>Logs</h2><pre id=\"logs\">{}</pre>", escape(&snap.log_text()));
    html.push_str("</main></body></html>\n");
    html
}
