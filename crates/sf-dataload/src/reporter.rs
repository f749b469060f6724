//! Batch problem collection for CSV processing.
//!
//! Rows that fail conversion or matching are recorded here instead of
//! aborting the batch; the report is written once the batch finishes.

use std::io::Write;

use crate::error::Result;
use crate::field::scalar_to_string;
use crate::row::ConvertibleCsvRow;

/// Severity tag of one recorded problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    Error,
    Warning,
}

impl ProblemKind {
    fn label(self) -> &'static str {
        match self {
            ProblemKind::Error => "Error",
            ProblemKind::Warning => "Warning",
        }
    }
}

/// One problem row. Named rows carry their columns (with `Type` and
/// `Reason` added); positional rows carry bare values with the reason
/// appended.
enum ProblemRow {
    Named {
        columns: Vec<String>,
        values: Vec<String>,
    },
    Positional(Vec<String>),
}

struct Problem {
    kind: ProblemKind,
    row: ProblemRow,
}

/// Ordered collection of per-row problems for one object's batch.
pub struct CsvProblemReporter {
    object_name: String,
    problems: Vec<Problem>,
}

impl CsvProblemReporter {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            problems: Vec::new(),
        }
    }

    /// The object this batch loads into.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Record a row-level error.
    pub fn add_error(&mut self, row: &ConvertibleCsvRow, reason: &str) {
        self.add_row(ProblemKind::Error, row, reason);
    }

    /// Record a row-level warning.
    pub fn add_warning(&mut self, row: &ConvertibleCsvRow, reason: &str) {
        self.add_row(ProblemKind::Warning, row, reason);
    }

    /// Record an error for a row without named columns; the reason is
    /// appended positionally.
    pub fn add_error_values(&mut self, values: Vec<String>, reason: &str) {
        self.add_positional(ProblemKind::Error, values, reason);
    }

    /// Record a warning for a row without named columns.
    pub fn add_warning_values(&mut self, values: Vec<String>, reason: &str) {
        self.add_positional(ProblemKind::Warning, values, reason);
    }

    pub fn num_problems(&self) -> usize {
        self.problems.len()
    }

    pub fn num_errors(&self) -> usize {
        self.count(ProblemKind::Error)
    }

    pub fn num_warnings(&self) -> usize {
        self.count(ProblemKind::Warning)
    }

    /// Write the report: a header row when the first problem has named
    /// columns, then one line per problem. Positional rows are emitted
    /// raw, so heterogeneous batches never fail the report.
    pub fn write_report<W: Write>(&self, sink: W) -> Result<()> {
        // Flexible: positional rows need not match the header's width.
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(sink);

        if let Some(Problem {
            row: ProblemRow::Named { columns, .. },
            ..
        }) = self.problems.first()
        {
            writer.write_record(columns)?;
        }

        for problem in &self.problems {
            match &problem.row {
                ProblemRow::Named { values, .. } => writer.write_record(values)?,
                ProblemRow::Positional(values) => writer.write_record(values)?,
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn count(&self, kind: ProblemKind) -> usize {
        self.problems
            .iter()
            .filter(|problem| problem.kind == kind)
            .count()
    }

    fn add_row(&mut self, kind: ProblemKind, row: &ConvertibleCsvRow, reason: &str) {
        let mut columns: Vec<String> = row.headers().to_vec();
        for marker in ["Type", "Reason"] {
            if !columns.iter().any(|c| c == marker) {
                columns.push(marker.to_string());
            }
        }

        let values = columns
            .iter()
            .map(|column| match column.as_str() {
                "Type" => kind.label().to_string(),
                "Reason" => reason.to_string(),
                _ => scalar_to_string(&row.get(column)),
            })
            .collect();

        self.problems.push(Problem {
            kind,
            row: ProblemRow::Named { columns, values },
        });
    }

    fn add_positional(&mut self, kind: ProblemKind, mut values: Vec<String>, reason: &str) {
        values.push(reason.to_string());
        self.problems.push(Problem {
            kind,
            row: ProblemRow::Positional(values),
        });
    }
}
