//! Report rendering.
//!
//! A [`Comparison`] is written as three bannered sections, always in the same
//! order and always present, even when empty:
//!
//! 1. objects missing from the local catalog,
//! 2. extraneous objects in the local catalog,
//! 3. column discrepancies of tables present in both catalogs.

use std::io::Write;

use crate::comparer::Comparison;
use crate::error::Result;

/// Title of the first section.
pub const MISSING_TITLE: &str = "Objects missing from local schema";
/// Title of the second section.
pub const EXTRANEOUS_TITLE: &str = "Extraneous objects in local schema";
/// Title of the third section.
pub const DISCREPANCIES_TITLE: &str =
    "Data type discrepancies for table columns that exist in both schemas";

/// Writes comparison reports to a sink.
///
/// Objects are written one per line as `NAME TYPE`.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        let rule = "-".repeat(title.len() + 6);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "-- {title} --")?;
        writeln!(self.out, "{rule}")?;
        Ok(())
    }

    /// Writes the three text sections.
    ///
    /// Each section is flushed before the next one starts.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`](crate::CompareError::Io) when the sink fails.
    pub fn render(&mut self, comparison: &Comparison) -> Result<()> {
        self.banner(MISSING_TITLE)?;
        for object in &comparison.missing_from_local {
            writeln!(self.out, "{object}")?;
        }
        self.out.flush()?;

        self.banner(EXTRANEOUS_TITLE)?;
        for object in &comparison.extraneous_in_local {
            writeln!(self.out, "{object}")?;
        }
        self.out.flush()?;

        self.banner(DISCREPANCIES_TITLE)?;
        for diff in &comparison.table_diffs {
            writeln!(self.out, "-- {}", diff.table)?;
            writeln!(self.out, "{}", diff.diff_text)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Writes the comparison as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails when serialization or the sink fails.
    pub fn render_json(&mut self, comparison: &Comparison) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, comparison)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogObject, TableDiff};

    fn render(comparison: &Comparison) -> String {
        let mut reporter = Reporter::new(Vec::new());
        reporter.render(comparison).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_report_has_only_banners() {
        let out = render(&Comparison::default());
        let expected = "\n\
            ---------------------------------------\n\
            -- Objects missing from local schema --\n\
            ---------------------------------------\n\
            \n\
            ----------------------------------------\n\
            -- Extraneous objects in local schema --\n\
            ----------------------------------------\n\
            \n\
            --------------------------------------------------------------------------\n\
            -- Data type discrepancies for table columns that exist in both schemas --\n\
            --------------------------------------------------------------------------\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_sections_in_order() {
        let comparison = Comparison {
            missing_from_local: vec![CatalogObject::table("C")],
            extraneous_in_local: vec![CatalogObject::new("B", "SEQUENCE")],
            table_diffs: vec![TableDiff {
                table: "A".to_string(),
                diff_text: "ALTER TABLE A ADD NAME VARCHAR2(50);\n".to_string(),
            }],
        };
        let out = render(&comparison);

        let missing = out.find(MISSING_TITLE).unwrap();
        let table_c = out.find("\nC TABLE\n").unwrap();
        let extraneous = out.find(EXTRANEOUS_TITLE).unwrap();
        let seq_b = out.find("\nB SEQUENCE\n").unwrap();
        let discrepancies = out.find(DISCREPANCIES_TITLE).unwrap();
        assert!(missing < table_c && table_c < extraneous);
        assert!(extraneous < seq_b && seq_b < discrepancies);
        assert!(out.ends_with("-- A\nALTER TABLE A ADD NAME VARCHAR2(50);\n\n"));
    }

    #[test]
    fn test_json_report() {
        let comparison = Comparison {
            missing_from_local: vec![CatalogObject::table("C")],
            ..Comparison::default()
        };
        let mut reporter = Reporter::new(Vec::new());
        reporter.render_json(&comparison).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["missing_from_local"][0]["name"], "C");
        assert_eq!(value["missing_from_local"][0]["type"], "TABLE");
        assert!(value["table_diffs"].as_array().unwrap().is_empty());
    }
}
