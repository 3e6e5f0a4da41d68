// src/sink.rs
//
// CSV persistence for historical and master tables.

use std::{fs, io, path::Path};

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::CsvFormat;
use crate::error::{Result, ScrapeError};
use crate::table::{Table, Value};

/// Write `table` to `path`: one header row, then one record per row, nulls as
/// empty fields. The file is written beside `path` and renamed over it, so a
/// reader never sees a partial table.
pub fn write_csv(path: &Path, table: &Table, format: CsvFormat) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut wtr = WriterBuilder::new()
            .delimiter(format.delimiter)
            .from_writer(&mut tmp);
        // a header record with no fields would still emit a line
        if !table.headers().is_empty() {
            wtr.write_record(table.headers())?;
        }
        for row in table.rows() {
            wtr.write_record(row.iter().map(Value::to_string))?;
        }
        wtr.flush()?;
    }
    tmp.persist(path).map_err(|e| ScrapeError::Persist {
        path: path.display().to_string(),
        source: e,
    })?;

    info!(path = %path.display(), rows = table.len(), "table written");
    Ok(())
}

/// Load a table written by [`write_csv`]. Cells are re-inferred, so integers
/// and floats come back typed and empty fields come back null.
pub fn read_csv(path: &Path, format: CsvFormat) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(Value::parse).collect());
    }
    let table = Table::from_rows(headers, rows);
    debug!(path = %path.display(), rows = table.len(), "table read");
    Ok(table)
}

/// Like [`read_csv`], but a missing file is an empty table.
pub fn read_csv_or_empty(path: &Path, format: CsvFormat) -> Result<Table> {
    match read_csv(path, format) {
        Err(ScrapeError::Csv(e)) if is_not_found(&e) => Ok(Table::default()),
        other => other,
    }
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::from_rows(
            vec!["Player".into(), "year".into(), "PER".into(), "3P%".into()],
            vec![
                vec![
                    Value::text("Elton Brand"),
                    Value::Int(2000),
                    Value::Float(20.0),
                    Value::Null,
                ],
                vec![
                    Value::text("Lamar Odom, Jr."),
                    Value::Int(2000),
                    Value::Float(15.25),
                    Value::Float(0.36),
                ],
            ],
        )
    }

    #[test]
    fn test_round_trip_preserves_values() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history_roy.csv");
        write_csv(&path, &sample(), CsvFormat::default())?;

        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("Player,year,PER,3P%\n"));
        assert!(text.contains("Elton Brand,2000,20.0,\n"));
        assert!(text.contains("\"Lamar Odom, Jr.\""));

        assert_eq!(read_csv(&path, CsvFormat::default())?, sample());
        Ok(())
    }

    #[test]
    fn test_empty_table_keeps_header() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.csv");
        let table = Table::new(vec!["Player".into(), "year".into()]);
        write_csv(&path, &table, CsvFormat::default())?;
        assert_eq!(fs::read_to_string(&path)?, "Player,year\n");

        let back = read_csv(&path, CsvFormat::default())?;
        assert!(back.is_empty());
        assert_eq!(back.headers(), table.headers());
        Ok(())
    }

    #[test]
    fn test_columnless_table_is_an_empty_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("none.csv");
        write_csv(&path, &Table::default(), CsvFormat::default())?;
        assert_eq!(fs::metadata(&path)?.len(), 0);
        assert_eq!(read_csv(&path, CsvFormat::default())?, Table::default());
        Ok(())
    }

    #[test]
    fn test_creates_directory_and_overwrites() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("master_table.csv");
        write_csv(&path, &sample(), CsvFormat::default())?;
        write_csv(&path, &Table::new(vec!["x".into()]), CsvFormat::default())?;
        assert_eq!(fs::read_to_string(&path)?, "x\n");
        let leftovers = fs::read_dir(path.parent().unwrap())?.count();
        assert_eq!(leftovers, 1, "no temp files left behind");
        Ok(())
    }

    #[test]
    fn test_custom_delimiter() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("t.tsv");
        let fmt = CsvFormat { delimiter: b'\t' };
        write_csv(&path, &sample(), fmt)?;
        assert!(fs::read_to_string(&path)?.starts_with("Player\tyear\tPER\t3P%\n"));
        assert_eq!(read_csv(&path, fmt)?, sample());
        Ok(())
    }

    #[test]
    fn test_missing_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent.csv");
        assert!(read_csv(&path, CsvFormat::default()).is_err());
        assert_eq!(read_csv_or_empty(&path, CsvFormat::default())?, Table::default());
        Ok(())
    }
}
