//! Server-rendered HTML pages.
//!
//! - `GET /` -- home page with a single link to the tournaments listing
//! - `GET /tournaments` -- tournaments from the catalog
//! - `GET /sandbox` plus `POST /sandbox/increment` and
//!   `POST /sandbox/decrement` -- a counter for trying the stack out

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use scibowl_core::store::TournamentFilter;
use scibowl_types::TournamentSummary;

use crate::state::AppState;

const STYLE: &str = r"
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }
        h1 { color: #58a6ff; margin-bottom: 0.25rem; }
        .subtitle { color: #8b949e; margin-top: 0; }
        a { color: #58a6ff; text-decoration: none; }
        a:hover { text-decoration: underline; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #30363d; }
        th { color: #8b949e; font-weight: normal; }
        .badge { color: #3fb950; font-size: 0.85rem; }
        .count { font-size: 3rem; color: #58a6ff; font-weight: bold; }
        button {
            background: #161b22;
            color: #c9d1d9;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 0.5rem 1.5rem;
            font-size: 1.25rem;
            cursor: pointer;
        }
        form { display: inline; }
";

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

/// Escape text for an HTML element or quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Markup of the home page. Its only link points at `/tournaments`.
pub fn home_markup() -> String {
    page(
        "SciBowl Arena",
        r#"    <h1>SciBowl Arena</h1>
    <p class="subtitle">Science Bowl tournaments, practice, and live scoring</p>
    <p><a href="/tournaments">Browse tournaments</a></p>"#,
    )
}

/// Serve the home page.
pub async fn home() -> Html<String> {
    Html(home_markup())
}

// ---------------------------------------------------------------------------
// GET /tournaments
// ---------------------------------------------------------------------------

/// Markup of the tournaments listing.
pub fn tournaments_markup(tournaments: &[TournamentSummary]) -> String {
    let mut body = String::from(
        "    <h1>Tournaments</h1>\n    <p class=\"subtitle\"><a href=\"/\">Home</a></p>\n",
    );
    if tournaments.is_empty() {
        body.push_str("    <p>No tournaments yet.</p>");
        return page("Tournaments - SciBowl Arena", &body);
    }

    body.push_str(
        "    <table>\n        <tr><th>Name</th><th>Date</th><th>Location</th><th>Division</th><th>Status</th></tr>\n",
    );
    for t in tournaments {
        let badge = if t.status.is_registration_open() {
            " <span class=\"badge\">open</span>"
        } else {
            ""
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            body,
            "        <tr><td>{name}{badge}</td><td>{date}</td><td>{location}</td><td>{division}</td><td>{status}</td></tr>",
            name = escape_html(&t.name),
            date = t.tournament_date.format("%B %-d, %Y"),
            location = escape_html(&t.location),
            division = t.division.label(),
            status = t.status.label(),
        );
    }
    body.push_str("    </table>");
    page("Tournaments - SciBowl Arena", &body)
}

/// Serve the tournaments listing.
pub async fn tournaments(State(state): State<Arc<AppState>>) -> Html<String> {
    let rows = state
        .catalog
        .read()
        .await
        .list_tournaments(&TournamentFilter::default());
    Html(tournaments_markup(&rows))
}

// ---------------------------------------------------------------------------
// /sandbox
// ---------------------------------------------------------------------------

/// Markup of the sandbox page showing `count`.
pub fn sandbox_markup(count: i64) -> String {
    page(
        "Sandbox - SciBowl Arena",
        &format!(
            r#"    <h1>Sandbox</h1>
    <p class="count" id="count">{count}</p>
    <form method="post" action="/sandbox/decrement"><button type="submit">-</button></form>
    <form method="post" action="/sandbox/increment"><button type="submit">+</button></form>"#
        ),
    )
}

/// Show the counter.
pub async fn sandbox(State(state): State<Arc<AppState>>) -> Html<String> {
    let count = state.sandbox.read().await.value();
    Html(sandbox_markup(count))
}

/// Add one and show the counter.
pub async fn sandbox_increment(State(state): State<Arc<AppState>>) -> Html<String> {
    let count = state.sandbox.write().await.increment();
    Html(sandbox_markup(count))
}

/// Subtract one and show the counter.
pub async fn sandbox_decrement(State(state): State<Arc<AppState>>) -> Html<String> {
    let count = state.sandbox.write().await.decrement();
    Html(sandbox_markup(count))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use scibowl_types::{Division, TournamentFormat, TournamentId, TournamentStatus};

    use super::*;

    fn summary(name: &str, status: TournamentStatus) -> TournamentSummary {
        TournamentSummary {
            id: TournamentId::new(1),
            name: name.to_owned(),
            description: String::new(),
            division: Division::HighSchool,
            format: TournamentFormat::RoundRobin,
            status,
            tournament_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap_or_else(|| Utc::now().date_naive()),
            registration_deadline: None,
            location: String::from("Boston, MA"),
            venue: String::new(),
            host_organization: String::new(),
            max_teams: None,
            current_teams: 0,
            website_url: String::new(),
            registration_url: String::new(),
        }
    }

    #[test]
    fn home_has_exactly_one_link_to_tournaments() {
        let html = home_markup();
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"<a href="/tournaments">"#));
    }

    #[test]
    fn tournament_names_are_escaped() {
        let html = tournaments_markup(&[summary("<script>alert(1)</script>", TournamentStatus::Upcoming)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("February 1, 2025"));
    }

    #[test]
    fn open_registration_is_badged() {
        let html = tournaments_markup(&[summary("Regional", TournamentStatus::Registration)]);
        assert!(html.contains("class=\"badge\""));
        assert!(html.contains("Registration Open"));
    }

    #[test]
    fn empty_listing_says_so() {
        assert!(tournaments_markup(&[]).contains("No tournaments yet."));
    }

    #[test]
    fn sandbox_shows_count_and_both_buttons() {
        let html = sandbox_markup(-1);
        assert!(html.contains(">-1</p>"));
        assert!(html.contains("/sandbox/increment"));
        assert!(html.contains("/sandbox/decrement"));
    }

    #[test]
    fn escape_covers_quotes() {
        assert_eq!(escape_html(r#"a"b'c&"#), "a&quot;b&#39;c&amp;");
    }
}
