// src/fetch/fixtures.rs
//
// Canned pages shaped like the stats site's markup, for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use url::Url;

use super::PageSource;
use crate::error::{Result, ScrapeError};

pub fn base_url() -> Url {
    Url::parse("https://bref.test").expect("test base URL should parse")
}

/// In-memory pages keyed by URL path. Unknown paths fail like a 404 would.
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StaticPages {
    pub fn with(mut self, path: &str, html: impl Into<String>) -> Self {
        self.pages.insert(path.to_string(), html.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageSource for StaticPages {
    fn get(&self, url: &Url) -> Result<String> {
        self.requests.borrow_mut().push(url.path().to_string());
        self.pages
            .get(url.path())
            .cloned()
            .ok_or_else(|| ScrapeError::Transport {
                url: url.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::NotFound, "404 Not Found")),
            })
    }
}

fn cells(tag: &str, values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("<{tag}>{v}</{tag}>"))
        .collect()
}

fn table(id: &str, over_header: Option<&str>, headers: &[&str], body: &[String]) -> String {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let over = over_header
        .map(|o| format!("<tr class=\"over_header\">{o}</tr>"))
        .unwrap_or_default();
    format!(
        "<table class=\"sortable stats_table\" id=\"{id}\"><thead>{over}<tr>{}</tr></thead><tbody>{}</tbody></table>",
        cells("th", &headers),
        body.concat()
    )
}

fn page(tables: &[String]) -> String {
    format!(
        "<html><head><title>fixture</title></head><body><div id=\"content\">{}</div></body></html>",
        tables.concat()
    )
}

const ROY_HEADERS: &[&str] = &[
    "Rank", "Player", "Age", "Tm", "First", "Pts Won", "Pts Max", "Share", "G", "MP", "PTS",
    "TRB", "AST", "FG%", "3P%", "FT%", "WS", "WS/48",
];

/// Rookie-of-the-year voting page; one voting row per `(player, team)`.
pub fn roy_page(rows: &[(&str, &str)]) -> String {
    let body: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, (player, tm))| {
            let vals: Vec<String> = vec![
                (i + 1).to_string(),
                format!("<a href=\"/players/x/{}.html\">{}</a>", i, player),
                "21".into(),
                format!("<a href=\"/teams/{tm}/2000.html\">{tm}</a>"),
                (10 - i).to_string(),
                "100".into(),
                "590".into(),
                ".169".into(),
                "81".into(),
                "30.5".into(),
                "14.2".into(),
                "6.1".into(),
                "2.0".into(),
                ".455".into(),
                String::new(),
                ".780".into(),
                "4.4".into(),
                ".088".into(),
            ];
            format!("<tr>{}</tr>", cells("td", &vals))
        })
        .collect();
    let over = "<th colspan=\"4\"></th><th colspan=\"4\">Voting</th><th colspan=\"6\">Per Game</th><th colspan=\"4\">Shooting</th>";
    page(&[table("roy", Some(over), ROY_HEADERS, &body)])
}

const ADVANCED_HEADERS: &[&str] = &[
    "Rk", "Player", "Pos", "Age", "Tm", "G", "MP", "PER", "TS%", "3PAr", "FTr", "ORB%", "DRB%",
    "TRB%", "AST%", "STL%", "BLK%", "TOV%", "USG%", "", "OWS", "DWS", "WS", "WS/48", "", "OBPM",
    "DBPM", "BPM", "VORP",
];

/// Advanced stats page; rows are `(player, team, PER, 3PAr)`. A repeated
/// header row is inserted after the first player, as the site does.
pub fn advanced_page(rows: &[(&str, &str, f64, Option<f64>)]) -> String {
    let mut body = Vec::new();
    for (i, (player, tm, per, three_par)) in rows.iter().enumerate() {
        let mut vals: Vec<String> = vec![
            (i + 1).to_string(),
            format!("<a href=\"/players/x/{}.html\">{}</a>", i, player),
            "SF".into(),
            "21".into(),
            tm.to_string(),
            "81".into(),
            "2500".into(),
            format!("{:.1}", per),
            ".540".into(),
            three_par.map(|v| format!("{:.3}", v)).unwrap_or_default(),
        ];
        vals.resize(ADVANCED_HEADERS.len(), "1.0".into());
        vals[19] = String::new();
        vals[24] = String::new();
        body.push(format!("<tr>{}</tr>", cells("td", &vals)));
        if i == 0 {
            let repeat: Vec<String> = ADVANCED_HEADERS.iter().map(|h| h.to_string()).collect();
            body.push(format!("<tr class=\"thead\">{}</tr>", cells("th", &repeat)));
        }
    }
    page(&[table("advanced_stats", None, ADVANCED_HEADERS, &body)])
}

const STANDINGS_HEADERS: &[&str] = &["W", "L", "W/L%", "GB", "PS/G", "PA/G", "SRS"];

fn conference(id: &str, title: &str, division: &str, teams: &[(&str, &str, u32, u32)]) -> String {
    let mut body = vec![format!(
        "<tr class=\"thead\"><th colspan=\"8\">{division}</th></tr>"
    )];
    for (name, abbr, w, l) in teams {
        let bare = name.trim_end_matches('*');
        let marker = &name[bare.len()..];
        let pct = *w as f64 / (*w + *l) as f64;
        let vals: Vec<String> = vec![
            w.to_string(),
            l.to_string(),
            format!("{:.3}", pct),
            "—".into(),
            "101.2".into(),
            "99.8".into(),
            "1.25".into(),
        ];
        body.push(format!(
            "<tr class=\"full_table\"><th><a href=\"/teams/{abbr}/2000.html\">{bare}</a>{marker}</th>{}</tr>",
            cells("td", &vals)
        ));
    }
    let mut headers = vec![title];
    headers.extend_from_slice(STANDINGS_HEADERS);
    table(id, None, &headers, &body)
}

/// Division standings page; teams are `(display name, abbreviation, W, L)`.
/// A trailing `*` on the name is rendered outside the link, as on the site.
pub fn standings_page(east: &[(&str, &str, u32, u32)], west: &[(&str, &str, u32, u32)]) -> String {
    page(&[
        conference("divs_standings_E", "Eastern Conference", "Atlantic Division", east),
        conference("divs_standings_W", "Western Conference", "Midwest Division", west),
    ])
}

const ROOKIES_HEADERS: &[&str] = &[
    "Rk", "Player", "Debut", "Age", "Yrs", "G", "MP", "FG", "FGA", "3P", "3PA", "FT", "FTA",
    "ORB", "TRB", "AST", "STL", "BLK", "TOV", "PF", "PTS", "FG%", "3P%", "FT%", "MP", "PTS",
    "TRB", "AST",
];

/// Rookie season stats page; rows are `(player, games)`. Includes a repeated
/// header row and a blank section-break row.
pub fn rookies_page(rows: &[(&str, u32)]) -> String {
    let mut body = Vec::new();
    for (i, (player, games)) in rows.iter().enumerate() {
        let mut vals: Vec<String> = vec![
            (i + 1).to_string(),
            player.to_string(),
            "Nov 2, 1999".into(),
            "21".into(),
            "1".into(),
            games.to_string(),
            "2000".into(),
        ];
        vals.resize(ROOKIES_HEADERS.len() - 4, "10".into());
        vals.extend(["30.5", "14.2", "6.1", "2.0"].map(String::from));
        body.push(format!("<tr>{}</tr>", cells("td", &vals)));
    }
    let repeat: Vec<String> = ROOKIES_HEADERS.iter().map(|h| h.to_string()).collect();
    body.push(format!("<tr class=\"thead\">{}</tr>", cells("th", &repeat)));
    body.push(format!(
        "<tr class=\"spacer\">{}</tr>",
        cells("td", &vec![String::new(); ROOKIES_HEADERS.len()])
    ));
    let over = "<th colspan=\"7\"></th><th colspan=\"17\">Totals</th><th colspan=\"4\">Per Game</th>";
    page(&[table("rookies", Some(over), ROOKIES_HEADERS, &body)])
}
