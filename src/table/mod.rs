// src/table/mod.rs

pub mod join;

use std::fmt;

pub use join::{inner_join, left_join, JoinKey};

/// A single cell, inferred from the scraped or persisted text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Infer a value from cell text: empty → Null, then integer, then decimal, else text.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Null;
        }
        if looks_numeric(s) {
            if let Ok(i) = s.parse::<i64>() {
                return Value::Int(i);
            }
            if let Ok(f) = s.parse::<f64>() {
                if f.is_finite() {
                    return Value::Float(f);
                }
            }
        }
        Value::Text(s.to_string())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Textual form used by substring filters; `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Join key component. Nulls never match anything.
    pub fn key(&self) -> Option<String> {
        self.as_text()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats survive a CSV round trip as floats
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}

/// A table exactly as scraped: header names plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Ordered, uniformly shaped rows of [`Value`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, padding short rows with nulls and truncating long ones.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Value::Null);
                r
            })
            .collect();
        Self { headers, rows }
    }

    pub fn from_raw(raw: RawTable) -> Self {
        let rows = raw
            .rows
            .iter()
            .map(|r| r.iter().map(|c| Value::parse(c)).collect())
            .collect();
        Self::from_rows(raw.headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.headers.len(), Value::Null);
        self.rows.push(row);
    }

    /// Remove the named columns; names that are not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !names.contains(&h.as_str()))
            .collect();
        if keep.iter().all(|k| *k) {
            return;
        }
        self.headers = retain_by_mask(std::mem::take(&mut self.headers), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }
    }

    /// Rename columns in place. Returns how many renames applied.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) -> usize {
        let mut applied = 0;
        for (from, to) in renames {
            if let Some(idx) = self.column_index(from) {
                self.headers[idx] = to.to_string();
                applied += 1;
            }
        }
        applied
    }

    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Value]) -> bool) {
        self.rows.retain(|r| keep(r));
    }

    /// Rewrite every cell of one column.
    pub fn map_column(&mut self, idx: usize, mut f: impl FnMut(Value) -> Value) {
        for row in &mut self.rows {
            let v = std::mem::replace(&mut row[idx], Value::Null);
            row[idx] = f(v);
        }
    }

    /// Set a column to a constant, appending it as the last column when absent.
    pub fn set_column(&mut self, name: &str, value: Value) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
                self.headers.len() - 1
            }
        };
        for row in &mut self.rows {
            row[idx] = value.clone();
        }
    }

    /// Append an all-null column unless it already exists; returns its index.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.headers.len() - 1
    }

    /// Mean over the numeric cells of a column, skipping nulls and text.
    pub fn mean(&self, name: &str) -> Option<f64> {
        let (sum, n) = self
            .column(name)?
            .filter_map(Value::as_f64)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// Replace nulls in a column; returns the number of cells filled.
    pub fn fill_null(&mut self, name: &str, value: &Value) -> usize {
        let Some(idx) = self.column_index(name) else {
            return 0;
        };
        let mut filled = 0;
        for row in &mut self.rows {
            if row[idx].is_null() {
                row[idx] = value.clone();
                filled += 1;
            }
        }
        filled
    }

    /// Drop rows that exactly repeat an earlier row.
    pub fn dedup_rows(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.rows.retain(|r| {
            let key: Vec<String> = r
                .iter()
                .map(|v| match v {
                    Value::Null => "\u{0}".to_string(),
                    other => other.to_string(),
                })
                .collect();
            seen.insert(key)
        });
    }

    /// Stack tables vertically. Headers are the union in first-seen order;
    /// cells a table does not have are null.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let tables: Vec<Table> = tables.into_iter().collect();
        let mut headers: Vec<String> = Vec::new();
        for t in &tables {
            for h in &t.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }
        let mut out = Table::new(headers);
        for t in tables {
            let positions: Vec<usize> = t
                .headers
                .iter()
                .map(|h| out.headers.iter().position(|o| o == h).unwrap_or_default())
                .collect();
            for row in t.rows {
                let mut wide = vec![Value::Null; out.headers.len()];
                for (pos, v) in positions.iter().zip(row) {
                    wide[*pos] = v;
                }
                out.rows.push(wide);
            }
        }
        out
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect()
}
