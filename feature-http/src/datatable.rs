//! Tabular step arguments.
//!
//! The first row of a table names its columns. Each step declares which
//! columns it requires and which it accepts optionally through
//! [`TableOptions`], and converts validated rows into a typed record by
//! implementing [`FromTableRow`].

use crate::error::Error;
use std::collections::BTreeMap;

/// Columns a step accepts.
#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
}

impl TableOptions {
    fn accepts(&self, field: &str) -> bool {
        self.required_fields.contains(&field) || self.optional_fields.contains(&field)
    }
}

/// A data table as written in the scenario, header row included.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string slices, mostly for tests.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Validates the table against `options` and returns one map per data row.
    ///
    /// Empty cells of optional columns are left out of the row.
    pub fn rows_with(&self, options: &TableOptions) -> Result<Vec<TableRow>, Error> {
        let (header, data) = self.rows.split_first().ok_or(Error::EmptyTable)?;

        for field in header {
            if !options.accepts(field) {
                return Err(Error::UnknownField {
                    field: field.clone(),
                    row: 0,
                });
            }
        }

        if let Some(missing) = options
            .required_fields
            .iter()
            .find(|field| !header.iter().any(|column| column == **field))
        {
            return Err(Error::MissingField {
                field: (*missing).into(),
                row: 0,
            });
        }

        data.iter()
            .enumerate()
            .map(|(index, cells)| {
                let row = index + 1;
                if cells.len() != header.len() {
                    return Err(Error::RaggedTable {
                        row,
                        expected: header.len(),
                        actual: cells.len(),
                    });
                }

                let fields = header
                    .iter()
                    .zip(cells)
                    .filter(|(column, cell)| {
                        !cell.is_empty() || options.required_fields.contains(&column.as_str())
                    })
                    .map(|(column, cell)| (column.clone(), cell.clone()))
                    .collect();

                Ok(TableRow { row, fields })
            })
            .collect()
    }

    /// Validates the table and converts every data row into `T`.
    pub fn parse<T: FromTableRow>(&self) -> Result<Vec<T>, Error> {
        self.rows_with(&T::OPTIONS)?
            .iter()
            .map(T::from_row)
            .collect()
    }
}

/// One data row keyed by column name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableRow {
    row: usize,
    fields: BTreeMap<String, String>,
}

impl TableRow {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn required(&self, field: &str) -> Result<&str, Error> {
        self.get(field).ok_or_else(|| Error::MissingField {
            field: field.into(),
            row: self.row,
        })
    }
}

pub trait FromTableRow: Sized {
    const OPTIONS: TableOptions;

    fn from_row(row: &TableRow) -> Result<Self, Error>;
}

/// A header to send with the next request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeaderRow {
    pub name: String,
    pub value: String,
}

impl FromTableRow for HeaderRow {
    const OPTIONS: TableOptions = TableOptions {
        required_fields: &["name", "value"],
        optional_fields: &[],
    };

    fn from_row(row: &TableRow) -> Result<Self, Error> {
        Ok(Self {
            name: row.required("name")?.into(),
            value: row.required("value")?.into(),
        })
    }
}

/// A cookie to send with the next request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CookieRow {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
}

impl FromTableRow for CookieRow {
    const OPTIONS: TableOptions = TableOptions {
        required_fields: &["name", "value"],
        optional_fields: &["path"],
    };

    fn from_row(row: &TableRow) -> Result<Self, Error> {
        Ok(Self {
            name: row.required("name")?.into(),
            value: row.required("value")?.into(),
            path: row.get("path").map(Into::into),
        })
    }
}

/// A response header to look for, optionally with its expected first value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExpectedHeaderRow {
    pub name: String,
    pub value: Option<String>,
}

impl FromTableRow for ExpectedHeaderRow {
    const OPTIONS: TableOptions = TableOptions {
        required_fields: &["name"],
        optional_fields: &["value"],
    };

    fn from_row(row: &TableRow) -> Result<Self, Error> {
        Ok(Self {
            name: row.required("name")?.into(),
            value: row.get("value").map(Into::into),
        })
    }
}

/// A response cookie to look for, optionally with its expected value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExpectedCookieRow {
    pub name: String,
    pub value: Option<String>,
}

impl FromTableRow for ExpectedCookieRow {
    const OPTIONS: TableOptions = TableOptions {
        required_fields: &["name"],
        optional_fields: &["value"],
    };

    fn from_row(row: &TableRow) -> Result<Self, Error> {
        Ok(Self {
            name: row.required("name")?.into(),
            value: row.get("value").map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_header_rows() {
        let table = DataTable::from_rows([
            ["name", "value"],
            ["X-Auth", "supersecret"],
            ["Accept", "application/json"],
        ]);

        let rows: Vec<HeaderRow> = table.parse().unwrap();

        assert_eq!(
            rows,
            [
                HeaderRow {
                    name: "X-Auth".into(),
                    value: "supersecret".into()
                },
                HeaderRow {
                    name: "Accept".into(),
                    value: "application/json".into()
                },
            ]
        );
    }

    #[test]
    fn column_order_does_not_matter() {
        let table = DataTable::from_rows([["value", "name"], ["1", "a"]]);

        let rows: Vec<HeaderRow> = table.parse().unwrap();

        assert_eq!(rows[0].name, "a");
        assert_eq!(rows[0].value, "1");
    }

    #[test]
    fn missing_required_column_names_the_field() {
        let table = DataTable::from_rows([["name"], ["X-Auth"]]);

        let error = table.parse::<HeaderRow>().unwrap_err();

        assert!(matches!(error, Error::MissingField { ref field, .. } if field == "value"));
        assert!(error.to_string().contains("\"value\""));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let table = DataTable::from_rows([["name", "vaule"], ["X-Auth", "x"]]);

        let error = table.parse::<ExpectedHeaderRow>().unwrap_err();

        assert!(matches!(error, Error::UnknownField { ref field, .. } if field == "vaule"));
    }

    #[rstest]
    #[case(&[["name", "value", "path"], ["a", "1", "/app"]], Some("/app"))]
    #[case(&[["name", "value", "path"], ["a", "1", ""]], None)]
    fn optional_cells_may_be_blank(
        #[case] rows: &[[&str; 3]],
        #[case] expected_path: Option<&str>,
    ) {
        let table = DataTable::from_rows(rows.iter().map(|row| row.iter().copied()));

        let cookies: Vec<CookieRow> = table.parse().unwrap();

        assert_eq!(cookies[0].path.as_deref(), expected_path);
    }

    #[test]
    fn blank_required_cells_are_kept() {
        let table = DataTable::from_rows([["name", "value"], ["X-Empty", ""]]);

        let rows: Vec<HeaderRow> = table.parse().unwrap();

        assert_eq!(rows[0].value, "");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let table = DataTable::new(vec![
            vec!["name".into(), "value".into()],
            vec!["only-name".into()],
        ]);

        assert!(matches!(
            table.parse::<HeaderRow>(),
            Err(Error::RaggedTable {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            DataTable::default().parse::<HeaderRow>(),
            Err(Error::EmptyTable)
        ));
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let table = DataTable::from_rows([["name"]]);

        assert!(table.parse::<ExpectedCookieRow>().unwrap().is_empty());
    }
}
