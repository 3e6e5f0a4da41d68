// src/fetch/html.rs
//
// Table extraction from basketball-reference pages. Column naming follows what a
// dataframe HTML reader produces, since the normalization rules are written
// against those names: blank headers become `Unnamed: <i>` and repeated names get
// `.1`, `.2` suffixes.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::error::{Result, ScrapeError};
use crate::source::TableSpec;
use crate::table::RawTable;

static HEAD_ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead > tr").expect("thead selector should parse"));
static BODY_ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody > tr").expect("tbody selector should parse"));
static STATS_TABLE_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.stats_table a[href]").expect("anchor selector should parse"));

const MAX_COLSPAN: usize = 64;

/// A link found inside one of the page's stats tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// A parsed HTML page.
pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// Extract `table#<id>`; `Ok(None)` when the page has no such table.
    pub fn table(&self, spec: &TableSpec) -> Result<Option<RawTable>> {
        let sel = Selector::parse(&format!("table#{}", spec.id))
            .map_err(|_| ScrapeError::Selector(spec.id.to_string()))?;
        let Some(table) = self.doc.select(&sel).next() else {
            return Ok(None);
        };

        let head: Vec<Vec<String>> = table.select(&HEAD_ROWS).map(expand_cells).collect();
        let header_cells = head.get(spec.header_row).ok_or_else(|| {
            ScrapeError::schema(
                spec.id,
                format!(
                    "header row {} requested, table has {}",
                    spec.header_row,
                    head.len()
                ),
            )
        })?;

        let rows: Vec<Vec<String>> = table.select(&BODY_ROWS).map(expand_cells).collect();
        trace!(table = spec.id, rows = rows.len(), "extracted table");

        Ok(Some(RawTable {
            headers: column_names(header_cells),
            rows,
        }))
    }

    /// Every link inside a `table.stats_table`, in document order.
    pub fn stats_table_anchors(&self) -> Vec<Anchor> {
        self.doc
            .select(&STATS_TABLE_LINKS)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                Some(Anchor {
                    href: href.to_string(),
                    text: cell_text(&a),
                })
            })
            .collect()
    }
}

fn cell_text(el: &ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the row's direct `th`/`td` cells, each repeated `colspan` times.
fn expand_cells(row: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        if !matches!(cell.value().name(), "th" | "td") {
            continue;
        }
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        let text = cell_text(&cell);
        out.extend(std::iter::repeat(text).take(span));
    }
    out
}

/// Name columns: blank → `Unnamed: <i>`, repeats → `<name>.<n>`.
pub fn column_names(cells: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let base = if c.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                c.clone()
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base
            } else {
                format!("{}.{}", base, n)
            };
            *n += 1;
            name
        })
        .collect()
}
