//! Column-oriented table handed over by a [`TableSource`](super::TableSource).

use std::collections::BTreeMap;

use crate::risk_error::RiskError;

/// A single table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

/// Named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: BTreeMap<String, Vec<Cell>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a column, builder style.
    pub fn with_column<I, C>(mut self, name: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.insert_column(name, cells);
        self
    }

    pub fn insert_column<I, C>(&mut self, name: &str, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.columns
            .insert(name.to_string(), cells.into_iter().map(Into::into).collect());
    }

    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows; all columns must agree (see [`Table::validate`]).
    pub fn n_rows(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Checks that every column has the same length.
    pub fn validate(&self) -> Result<(), RiskError> {
        let n = self.n_rows();
        for (name, cells) in &self.columns {
            if cells.len() != n {
                return Err(RiskError::MalformedContent(format!(
                    "column `{name}` has {} rows, expected {n}",
                    cells.len()
                )));
            }
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&[Cell], RiskError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| RiskError::MissingColumn(name.to_string()))
    }

    fn cell(&self, name: &str, row: usize) -> Result<&Cell, RiskError> {
        self.column(name)?.get(row).ok_or_else(|| {
            RiskError::MalformedContent(format!("column `{name}` has no row {row}"))
        })
    }

    /// Numeric value at (`name`, `row`); numeric text is accepted.
    pub fn number(&self, name: &str, row: usize) -> Result<f64, RiskError> {
        match self.cell(name, row)? {
            Cell::Number(v) => Ok(*v),
            Cell::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                RiskError::MalformedContent(format!(
                    "column `{name}` row {row}: `{s}` is not a number"
                ))
            }),
            Cell::Empty => Err(RiskError::MalformedContent(format!(
                "column `{name}` row {row} is empty"
            ))),
        }
    }

    /// Text value at (`name`, `row`); empty cells read as `""`.
    pub fn text(&self, name: &str, row: usize) -> Result<String, RiskError> {
        Ok(match self.cell(name, row)? {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
            Cell::Empty => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let t = Table::new()
            .with_column("name", ["a", "b"])
            .with_column("cost", [1.5, 2.0])
            .with_column("cutoff", ["0.25", "x"]);
        assert_eq!(t.n_rows(), 2);
        assert!(t.validate().is_ok());
        assert_eq!(t.text("name", 1).unwrap(), "b");
        assert_eq!(t.number("cost", 0).unwrap(), 1.5);
        assert_eq!(t.number("cutoff", 0).unwrap(), 0.25);
        assert!(matches!(
            t.number("cutoff", 1),
            Err(RiskError::MalformedContent(_))
        ));
        assert_eq!(
            t.number("missing", 0),
            Err(RiskError::MissingColumn("missing".into()))
        );
    }

    #[test]
    fn ragged_columns_rejected() {
        let t = Table::new()
            .with_column("a", [1.0, 2.0])
            .with_column("b", [1.0]);
        assert!(matches!(t.validate(), Err(RiskError::MalformedContent(_))));
    }
}
