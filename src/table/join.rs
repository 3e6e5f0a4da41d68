// src/table/join.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{Table, Value};
use crate::error::{Result, ScrapeError};

/// One key pair: column on the left table, column on the right table.
#[derive(Debug, Clone, Copy)]
pub struct JoinKey<'a> {
    pub left: &'a str,
    pub right: &'a str,
}

impl<'a> JoinKey<'a> {
    pub fn same(name: &'a str) -> Self {
        Self {
            left: name,
            right: name,
        }
    }

    pub fn pair(left: &'a str, right: &'a str) -> Self {
        Self { left, right }
    }
}

fn key_indices<'a>(
    table: &Table,
    names: impl Iterator<Item = &'a str>,
    side: &str,
) -> Result<Vec<usize>> {
    names
        .map(|n| {
            table
                .column_index(n)
                .ok_or_else(|| ScrapeError::missing_column(format!("{side} join input"), n))
        })
        .collect()
}

fn row_key(row: &[Value], idx: &[usize]) -> Option<Vec<String>> {
    idx.iter().map(|&i| row[i].key()).collect()
}

/// Columns the right table contributes: everything except keys that share the
/// left key's name, and except names the left table already has.
fn contributed(left: &Table, right: &Table, on: &[JoinKey<'_>]) -> Vec<usize> {
    right
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| !on.iter().any(|k| k.right == h.as_str() && k.left == k.right))
        .filter(|(_, h)| !left.has_column(h))
        .map(|(i, _)| i)
        .collect()
}

/// Left join. Every left row is kept exactly once; the first right row with a
/// matching key supplies its columns, otherwise they are null. Right columns
/// whose names collide with a left column are discarded in favour of the left.
///
/// A right table without any columns contributes nothing and matches nothing.
pub fn left_join(left: &Table, right: &Table, on: &[JoinKey<'_>]) -> Result<Table> {
    let left_idx = key_indices(left, on.iter().map(|k| k.left), "left")?;
    if right.headers().is_empty() {
        debug!("right side has no columns; left join is a pass-through");
        return Ok(left.clone());
    }
    let right_idx = key_indices(right, on.iter().map(|k| k.right), "right")?;

    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut duplicates = 0usize;
    for (i, row) in right.rows().iter().enumerate() {
        if let Some(key) = row_key(row, &right_idx) {
            if index.contains_key(&key) {
                duplicates += 1;
            } else {
                index.insert(key, i);
            }
        }
    }
    if duplicates > 0 {
        warn!(duplicates, "right side repeats join keys; first occurrence wins");
    }

    let extra = contributed(left, right, on);
    let mut headers = left.headers().to_vec();
    headers.extend(extra.iter().map(|&i| right.headers()[i].clone()));

    let mut out = Table::new(headers);
    let mut matched = 0usize;
    for row in left.rows() {
        let mut wide = row.clone();
        match row_key(row, &left_idx).and_then(|k| index.get(&k)) {
            Some(&ri) => {
                matched += 1;
                let r = &right.rows()[ri];
                wide.extend(extra.iter().map(|&i| r[i].clone()));
            }
            None => wide.extend(extra.iter().map(|_| Value::Null)),
        }
        out.push_row(wide);
    }
    debug!(rows = out.len(), matched, "left join done");
    Ok(out)
}

/// Inner join keeping left row order. A left row matching several right rows
/// yields one output row per match.
pub fn inner_join(left: &Table, right: &Table, on: &[JoinKey<'_>]) -> Result<Table> {
    let left_idx = key_indices(left, on.iter().map(|k| k.left), "left")?;
    let right_idx = key_indices(right, on.iter().map(|k| k.right), "right")?;

    let mut index: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        if let Some(key) = row_key(row, &right_idx) {
            index.entry(key).or_default().push(i);
        }
    }

    let extra = contributed(left, right, on);
    let mut headers = left.headers().to_vec();
    headers.extend(extra.iter().map(|&i| right.headers()[i].clone()));

    let mut out = Table::new(headers);
    for row in left.rows() {
        let Some(matches) = row_key(row, &left_idx).and_then(|k| index.get(&k)) else {
            continue;
        };
        for &ri in matches {
            let r = &right.rows()[ri];
            let mut wide = row.clone();
            wide.extend(extra.iter().map(|&i| r[i].clone()));
            out.push_row(wide);
        }
    }
    Ok(out)
}
