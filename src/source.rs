// src/source.rs

use std::fmt;

/// The pages scraped from basketball-reference, one per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Source {
    /// Rookie-of-the-year voting.
    Roy,
    AdvancedStats,
    /// Division standings for both conferences.
    Standings,
    /// Rookie season stats. Scraped on request only; not part of the master table.
    Rookies,
}

/// Where one table lives on a page and which header row names its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub id: &'static str,
    pub header_row: usize,
}

pub const ROY_TABLE: TableSpec = TableSpec {
    id: "roy",
    header_row: 1,
};
pub const ADVANCED_TABLE: TableSpec = TableSpec {
    id: "advanced_stats",
    header_row: 0,
};
pub const ROOKIES_TABLE: TableSpec = TableSpec {
    id: "rookies",
    header_row: 1,
};
pub const EAST_STANDINGS_TABLE: TableSpec = TableSpec {
    id: "divs_standings_E",
    header_row: 0,
};
pub const WEST_STANDINGS_TABLE: TableSpec = TableSpec {
    id: "divs_standings_W",
    header_row: 0,
};

impl Source {
    /// The three sources joined into the master table, in join order.
    pub const JOINED: [Source; 3] = [Source::Roy, Source::AdvancedStats, Source::Standings];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Roy => "roy",
            Source::AdvancedStats => "advanced_stats",
            Source::Standings => "standings",
            Source::Rookies => "rookies",
        }
    }

    /// Site-relative path of the season page.
    pub fn page_path(&self, year: i32) -> String {
        match self {
            Source::Roy => format!("/awards/awards_{}.html", year),
            Source::AdvancedStats => format!("/leagues/NBA_{}_advanced.html", year),
            Source::Standings => format!("/leagues/NBA_{}_standings.html", year),
            Source::Rookies => format!("/leagues/NBA_{}_rookies-season-stats.html", year),
        }
    }

    /// Intermediate CSV holding this source's historical table.
    pub fn csv_file(&self) -> String {
        format!("history_{}.csv", self.name())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
