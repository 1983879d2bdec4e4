//! Column preprocessor: named table cells -> dense feature vector.
//!
//! Output features are the concatenation of each transformer's block, in the
//! order the artifact lists them. Columns no transformer names are dropped.

use std::collections::HashSet;

use nalgebra::DVector;

use crate::domain::applicant::columns;
use crate::models::artifact::{ArtifactError, HandleUnknown, TransformerSpec};
use crate::models::frame::{Cell, Frame};
use crate::models::pipeline::InferenceError;

#[derive(Debug, Clone)]
enum Transformer {
    StandardScaler {
        columns: Vec<String>,
        mean: DVector<f64>,
        scale: DVector<f64>,
    },
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl Transformer {
    fn width(&self) -> usize {
        match self {
            Transformer::StandardScaler { columns, .. } | Transformer::Passthrough { columns } => columns.len(),
            Transformer::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    transformers: Vec<Transformer>,
    width: usize,
}

impl Preprocessor {
    pub fn compile(specs: Vec<TransformerSpec>) -> Result<Self, ArtifactError> {
        if specs.is_empty() {
            return Err(ArtifactError::invalid("preprocessor has no transformers"));
        }

        let mut transformers = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            check_columns(i, spec.columns())?;
            let t = match spec {
                TransformerSpec::StandardScaler { columns, mean, scale } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(ArtifactError::invalid(format!(
                            "transformer {i}: scaler has {} columns but {} means and {} scales",
                            columns.len(),
                            mean.len(),
                            scale.len()
                        )));
                    }
                    if mean.iter().any(|m| !m.is_finite()) {
                        return Err(ArtifactError::invalid(format!("transformer {i}: non-finite mean")));
                    }
                    if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                        return Err(ArtifactError::invalid(format!(
                            "transformer {i}: scales must be finite and non-zero"
                        )));
                    }
                    Transformer::StandardScaler {
                        columns,
                        mean: DVector::from_vec(mean),
                        scale: DVector::from_vec(scale),
                    }
                }
                TransformerSpec::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                } => {
                    if categories.len() != columns.len() {
                        return Err(ArtifactError::invalid(format!(
                            "transformer {i}: one-hot has {} columns but {} category lists",
                            columns.len(),
                            categories.len()
                        )));
                    }
                    for (column, cats) in columns.iter().zip(&categories) {
                        let unique: HashSet<&String> = cats.iter().collect();
                        if cats.is_empty() || unique.len() != cats.len() {
                            return Err(ArtifactError::invalid(format!(
                                "transformer {i}: categories for '{column}' must be non-empty and distinct"
                            )));
                        }
                    }
                    Transformer::OneHot {
                        columns,
                        categories,
                        handle_unknown,
                    }
                }
                TransformerSpec::Passthrough { columns } => Transformer::Passthrough { columns },
            };
            transformers.push(t);
        }

        let width = transformers.iter().map(Transformer::width).sum();
        Ok(Self { transformers, width })
    }

    /// Number of features produced per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn transform(&self, frame: &Frame) -> Result<DVector<f64>, InferenceError> {
        let mut out = Vec::with_capacity(self.width);
        for t in &self.transformers {
            match t {
                Transformer::StandardScaler { columns, mean, scale } => {
                    let raw = numeric_block(frame, columns)?;
                    let scaled = (raw - mean).component_div(scale);
                    out.extend(scaled.iter());
                }
                Transformer::Passthrough { columns } => {
                    out.extend(numeric_block(frame, columns)?.iter());
                }
                Transformer::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                } => {
                    for (column, cats) in columns.iter().zip(categories) {
                        let label = text_cell(frame, column)?;
                        let hit = cats.iter().position(|c| c == label);
                        if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                            return Err(InferenceError::new(format!(
                                "Found unknown categories ['{label}'] in column '{column}' during transform"
                            )));
                        }
                        out.extend((0..cats.len()).map(|k| if hit == Some(k) { 1.0 } else { 0.0 }));
                    }
                }
            }
        }
        Ok(DVector::from_vec(out))
    }
}

fn check_columns(index: usize, names: &[String]) -> Result<(), ArtifactError> {
    if names.is_empty() {
        return Err(ArtifactError::invalid(format!("transformer {index} names no columns")));
    }
    for name in names {
        if !columns::ALL.contains(&name.as_str()) {
            return Err(ArtifactError::invalid(format!(
                "transformer {index} references unknown column '{name}'"
            )));
        }
    }
    Ok(())
}

fn cell<'a>(frame: &'a Frame, column: &str) -> Result<&'a Cell, InferenceError> {
    frame
        .get(column)
        .ok_or_else(|| InferenceError::new(format!("column '{column}' is missing from the input table")))
}

fn numeric_block(frame: &Frame, columns: &[String]) -> Result<DVector<f64>, InferenceError> {
    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let x = cell(frame, column)?
            .as_f64()
            .ok_or_else(|| InferenceError::new(format!("column '{column}' is not numeric")))?;
        values.push(x);
    }
    Ok(DVector::from_vec(values))
}

fn text_cell<'a>(frame: &'a Frame, column: &str) -> Result<&'a str, InferenceError> {
    cell(frame, column)?
        .as_text()
        .ok_or_else(|| InferenceError::new(format!("column '{column}' is not categorical")))
}
