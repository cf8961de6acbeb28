//! Server-rendered HTML for the login screen and the incident dashboard.

use std::fmt::Write;

use threatfeed_core::{
    IncidentMetrics, RowBatch, User, INCIDENT_STATUSES, SEVERITY_LEVELS, THREAT_TYPES,
};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
a { color: #38bdf8; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 220px; padding: 24px; background: #1e293b; }
.main { flex: 1; padding: 24px 32px; }
.kpis { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; }
.kpi { background: #1e293b; border-radius: 8px; padding: 16px; }
.kpi .value { font-size: 2em; font-weight: 600; }
.charts { display: grid; grid-template-columns: 2fr 1fr; gap: 16px; margin: 24px 0; }
.panel { background: #1e293b; border-radius: 8px; padding: 16px; }
.bar-row { display: flex; align-items: center; gap: 8px; margin: 6px 0; }
.bar-label { width: 110px; }
.bar { height: 14px; background: #38bdf8; border-radius: 3px; }
.donut { width: 180px; height: 180px; border-radius: 50%; margin: 0 auto; }
.flash { background: #14532d; padding: 12px; border-radius: 6px; }
.warning { background: #78350f; padding: 12px; border-radius: 6px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #334155; }
form label { display: block; margin: 8px 0 4px; }
"#;

const SEVERITY_COLORS: [(&str, &str); 4] = [
    ("Low", "#22c55e"),
    ("Medium", "#eab308"),
    ("High", "#f97316"),
    ("Critical", "#ef4444"),
];
const FALLBACK_COLOR: &str = "#64748b";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|message| format!("<p class=\"warning\">{}</p>", escape_html(message)))
        .unwrap_or_default();
    document(
        "Threatfeed | Login",
        &format!(
            "<div class=\"main\"><h1>Threatfeed</h1>{error}\
             <form method=\"post\" action=\"/login\">\
             <label for=\"username\">Username</label><input id=\"username\" name=\"username\" required>\
             <label for=\"password\">Password</label><input id=\"password\" name=\"password\" type=\"password\" required>\
             <p><button type=\"submit\">Log in</button></p></form></div>"
        ),
    )
}

pub fn restricted_page() -> String {
    document(
        "Threatfeed | Restricted",
        "<div class=\"main\"><p class=\"warning\">Restricted access. Please log in to view the \
         incident dashboard.</p><p><a href=\"/login\">Go to login</a></p></div>",
    )
}

pub fn dashboard_page(
    user: &User,
    metrics: &IncidentMetrics,
    incidents: &RowBatch,
    flash: Option<&str>,
) -> String {
    let mut body = String::new();
    body.push_str("<div class=\"layout\">");
    body.push_str(&sidebar(user));
    body.push_str("<div class=\"main\"><h1>Cyber Incidents Dashboard</h1>");
    if let Some(flash) = flash {
        let _ = write!(body, "<p class=\"flash\">{}</p>", escape_html(flash));
    }
    body.push_str(&kpi_cards(metrics));
    body.push_str("<div class=\"charts\">");
    body.push_str(&category_chart(&metrics.by_category));
    body.push_str(&severity_donut(&metrics.severity_shares()));
    body.push_str("</div>");
    body.push_str(&incident_form());
    body.push_str(&incident_table(incidents));
    body.push_str("</div></div>");

    document("Threatfeed | Dashboard", &body)
}

fn sidebar(user: &User) -> String {
    format!(
        "<aside class=\"sidebar\"><h2>Threatfeed</h2><p>Signed in as <strong>{}</strong></p>\
         <p>Role: {}</p><form method=\"post\" action=\"/logout\">\
         <button type=\"submit\">Log out</button></form></aside>",
        escape_html(&user.username),
        escape_html(&user.role)
    )
}

fn kpi_cards(metrics: &IncidentMetrics) -> String {
    let cards = [
        ("Total Incidents", metrics.total),
        ("Active / Open", metrics.open),
        ("Critical Threats", metrics.critical),
        ("Resolved", metrics.resolved),
    ];

    let mut html = String::from("<section class=\"kpis\">");
    for (label, value) in cards {
        let _ = write!(
            html,
            "<div class=\"kpi\"><div>{label}</div><div class=\"value\">{value}</div></div>"
        );
    }
    html.push_str("</section>");
    html
}

fn category_chart(by_category: &[(String, usize)]) -> String {
    let mut html = String::from("<div class=\"panel\"><h3>Incidents by Category</h3>");
    let max = by_category.iter().map(|(_, count)| *count).max().unwrap_or(0);
    if max == 0 {
        html.push_str("<p>No incidents recorded yet.</p>");
    }
    for (category, count) in by_category {
        let width = *count as f64 / max as f64 * 100.0;
        let _ = write!(
            html,
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <div class=\"bar\" style=\"width: {:.1}%\"></div><span>{}</span></div>",
            escape_html(category),
            width,
            count
        );
    }
    html.push_str("</div>");
    html
}

fn severity_color(severity: &str) -> &'static str {
    SEVERITY_COLORS
        .iter()
        .find(|(level, _)| *level == severity)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Conic-gradient stops for the severity donut, one segment per share.
fn donut_gradient(shares: &[(String, f64)]) -> String {
    let mut start = 0.0;
    let stops: Vec<String> = shares
        .iter()
        .map(|(severity, share)| {
            let end = start + share * 100.0;
            let stop = format!(
                "{} {:.1}% {:.1}%",
                severity_color(severity),
                start,
                end
            );
            start = end;
            stop
        })
        .collect();
    format!("conic-gradient({})", stops.join(", "))
}

fn severity_donut(shares: &[(String, f64)]) -> String {
    let mut html = String::from("<div class=\"panel\"><h3>Severity Distribution</h3>");
    if shares.is_empty() {
        html.push_str("<p>No incidents recorded yet.</p></div>");
        return html;
    }

    let _ = write!(
        html,
        "<div class=\"donut\" style=\"background: radial-gradient(circle, #1e293b 45%, transparent 46%), {}\"></div><ul>",
        donut_gradient(shares)
    );
    for (severity, share) in shares {
        let _ = write!(
            html,
            "<li><span style=\"color: {}\">&#9632;</span> {} {:.1}%</li>",
            severity_color(severity),
            escape_html(severity),
            share * 100.0
        );
    }
    html.push_str("</ul></div>");
    html
}

fn select(name: &str, options: &[&str]) -> String {
    let mut html = format!("<select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let _ = write!(html, "<option>{}</option>", escape_html(option));
    }
    html.push_str("</select>");
    html
}

fn incident_form() -> String {
    format!(
        "<details class=\"panel\"><summary>Log New Incident</summary>\
         <form method=\"post\" action=\"/incidents\">\
         <label for=\"date\">Date</label><input id=\"date\" name=\"date\" type=\"date\" required>\
         <label for=\"category\">Threat Type</label>{}\
         <label for=\"severity\">Severity</label>{}\
         <label for=\"status\">Status</label>{}\
         <label for=\"description\">Description</label><textarea id=\"description\" name=\"description\"></textarea>\
         <p><button type=\"submit\">Submit Incident</button></p></form></details>",
        select("category", &THREAT_TYPES),
        select("severity", &SEVERITY_LEVELS),
        select("status", &INCIDENT_STATUSES)
    )
}

fn incident_table(incidents: &RowBatch) -> String {
    let mut html = String::from("<section><h3>Incident Log</h3><table><thead><tr>");
    for column in incidents.columns() {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr></thead><tbody>");
    for row in incidents.rows() {
        html.push_str("<tr>");
        for value in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&value.to_string()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></section>");
    html
}
