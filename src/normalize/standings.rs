// src/normalize/standings.rs

use tracing::{debug, trace};
use url::Url;

use super::{require, strip_star};
use crate::error::Result;
use crate::fetch::{Anchor, StandingsPage};
use crate::table::{inner_join, JoinKey, RawTable, Table, Value};

pub const TEAM_NAME: &str = "TEAM_NAME";
pub const TEAM_ABBREVIATION: &str = "TEAM_ABBREVIATION";
pub const CONFERENCE: &str = "Conference";

fn conference_table(raw: RawTable, title: &str, label: &str) -> Result<Table> {
    let mut t = Table::from_raw(raw);
    require(&t, "standings", title)?;
    t.rename_columns(&[(title, TEAM_NAME)]);
    t.set_column(CONFERENCE, Value::text(label));
    Ok(t)
}

/// Abbreviation from a team link: the second path segment, so
/// `/teams/BOS/2000.html` gives `BOS`.
pub fn abbreviation_from_href(href: &str) -> Option<String> {
    let base = Url::parse("https://www.basketball-reference.com").ok()?;
    let url = base.join(href).ok()?;
    let abbr = url.path_segments()?.nth(1)?;
    (!abbr.is_empty()).then(|| abbr.to_string())
}

/// Distinct `(TEAM_ABBREVIATION, TEAM_NAME)` pairs from the page's links.
pub fn team_lookup(anchors: &[Anchor]) -> Table {
    let mut t = Table::new(vec![TEAM_ABBREVIATION.to_string(), TEAM_NAME.to_string()]);
    for a in anchors {
        match abbreviation_from_href(&a.href) {
            Some(abbr) => t.push_row(vec![Value::text(abbr), Value::text(a.text.clone())]),
            None => trace!(href = %a.href, "link without an abbreviation segment"),
        }
    }
    t.dedup_rows();
    t
}

/// Union both conferences, clean the team names and attach abbreviations.
/// Rows whose name has no matching link (division banners, for one) are dropped.
pub fn normalize_standings(page: StandingsPage) -> Result<Table> {
    let east = conference_table(page.east, "Eastern Conference", "East")?;
    let west = conference_table(page.west, "Western Conference", "West")?;
    let mut standings = Table::concat([east, west]);

    let name = require(&standings, "standings", TEAM_NAME)?;
    standings.map_column(name, strip_star);

    let lookup = team_lookup(&page.anchors);
    let before = standings.len();
    let joined = inner_join(&standings, &lookup, &[JoinKey::same(TEAM_NAME)])?;
    debug!(
        rows = joined.len(),
        unmapped = before.saturating_sub(joined.len()),
        teams = lookup.len(),
        "standings mapped to abbreviations"
    );
    Ok(joined)
}
