//! Single-row table handed to the model pipeline.
//!
//! The artifact addresses its inputs by column name, so the table keeps the
//! applicant's values unencoded (numbers stay numbers, categories stay their
//! wire labels). Column order is fixed by `Frame::from_applicant`.

use crate::domain::applicant::{ApplicantRecord, Choice, columns};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(x) => Some(*x),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One row, named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    cells: Vec<(&'static str, Cell)>,
}

impl Frame {
    pub fn from_cells(cells: Vec<(&'static str, Cell)>) -> Self {
        Self { cells }
    }

    pub fn from_applicant(r: &ApplicantRecord) -> Self {
        let text = |label: &str| Cell::Text(label.to_string());
        Self::from_cells(vec![
            (columns::AGE, Cell::Int(r.age)),
            (columns::GENDER, text(r.gender.label())),
            (columns::EDUCATION, text(r.education.label())),
            (columns::ANNUAL_INCOME, Cell::Float(r.annual_income)),
            (columns::EXPERIENCE_YEARS, Cell::Int(r.experience_years)),
            (columns::HOUSING, text(r.housing.label())),
            (columns::LOAN_AMOUNT, Cell::Float(r.loan_amount)),
            (columns::LOAN_PURPOSE, text(r.loan_purpose.label())),
            (columns::INTEREST_RATE, Cell::Float(r.interest_rate)),
            (columns::INCOME_COMMITTED, Cell::Float(r.income_committed)),
            (columns::CREDIT_HISTORY_YEARS, Cell::Int(r.credit_history_years)),
            (columns::CREDIT_SCORE, Cell::Int(r.credit_score)),
            (columns::PRIOR_DEFAULT, text(r.prior_default.label())),
            (columns::INSTALLMENTS, Cell::Int(r.installments)),
        ])
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cell)| cell)
    }
}
