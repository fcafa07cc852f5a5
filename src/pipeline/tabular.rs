use crate::error::{MobilityError, Result};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

/// A single cell: numeric if the trimmed field parses as a finite number,
/// text otherwise (including the empty string for blank fields).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    fn from_field(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Text(String::new());
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

/// Per-column verdict from the one-shot inference pass: `Numeric` when every
/// non-empty cell coerced to a number, `Text` when none did, `Mixed` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Mixed,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Header names plus the cached per-column kinds, with a name-to-position
/// index for lookups. Built once at parse time; rows never re-parse cells.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of a column by name; duplicated headers resolve to the
    /// first occurrence.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|i| self.columns[i].kind)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

/// A borrowed row; cell lookups go through the schema's name index.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    schema: &'a Schema,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.schema.position(name).map(|i| &self.cells[i])
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_text)
    }
}

/// An ordered sequence of typed rows sharing one schema.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Parses delimited text into a typed table. Strips a leading BOM,
    /// normalizes `\r\n` and bare `\r` line endings, trims every header and
    /// field token, and coerces each cell exactly once. Short lines are
    /// padded with empty text cells; extra trailing fields are dropped.
    pub fn parse(text: &str) -> Result<Table> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(normalized.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(MobilityError::DataLoad(
                "header line is missing or empty".to_string(),
            ));
        }

        let mut rows: Vec<Vec<Value>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cells: Vec<Value> = (0..headers.len())
                .map(|i| Value::from_field(record.get(i).unwrap_or("")))
                .collect();
            rows.push(cells);
        }

        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        // Single inference pass over the materialized cells
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column {
                name: name.clone(),
                kind: infer_kind(&rows, i),
            })
            .collect();

        Ok(Table {
            schema: Schema { columns, index },
            rows,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            schema: &self.schema,
            cells,
        })
    }
}

fn infer_kind(rows: &[Vec<Value>], column: usize) -> ColumnKind {
    let mut saw_number = false;
    let mut saw_text = false;
    for cells in rows {
        match &cells[column] {
            Value::Number(_) => saw_number = true,
            Value::Text(s) if !s.is_empty() => saw_text = true,
            Value::Text(_) => {}
        }
    }
    match (saw_number, saw_text) {
        (true, false) => ColumnKind::Numeric,
        (true, true) => ColumnKind::Mixed,
        (false, _) => ColumnKind::Text,
    }
}
