//! Fitted estimators: feature vector -> class probabilities.

use nalgebra::DVector;
use rayon::prelude::*;

use crate::math::{normalize, sigmoid};
use crate::models::artifact::{ArtifactError, EstimatorSpec, NodeSpec, TreeSpec};
use crate::models::pipeline::InferenceError;

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Normalized class distribution.
    Leaf(Vec<f64>),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Children always point to a later node, so the walk terminates.
    fn compile(index: usize, spec: TreeSpec, n_features: usize, n_classes: usize) -> Result<Self, ArtifactError> {
        if spec.nodes.is_empty() {
            return Err(ArtifactError::invalid(format!("tree {index} has no nodes")));
        }
        let n_nodes = spec.nodes.len();
        let mut nodes = Vec::with_capacity(n_nodes);
        for (i, node) in spec.nodes.into_iter().enumerate() {
            let node = match node {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(ArtifactError::invalid(format!(
                            "tree {index} node {i}: feature {feature} out of range ({n_features} features)"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ArtifactError::invalid(format!(
                            "tree {index} node {i}: non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= n_nodes {
                            return Err(ArtifactError::invalid(format!(
                                "tree {index} node {i}: child {child} must point forward within {n_nodes} nodes"
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    }
                }
                NodeSpec::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ArtifactError::invalid(format!(
                            "tree {index} node {i}: leaf has {} values for {n_classes} classes",
                            value.len()
                        )));
                    }
                    let dist = normalize(&value).ok_or_else(|| {
                        ArtifactError::invalid(format!(
                            "tree {index} node {i}: leaf weights must be non-negative with a positive sum"
                        ))
                    })?;
                    Node::Leaf(dist)
                }
            };
            nodes.push(node);
        }
        Ok(Self { nodes })
    }

    fn leaf(&self, x: &DVector<f64>) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if x[*feature] <= *threshold { *left } else { *right },
                Node::Leaf(dist) => return dist,
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    RandomForest { trees: Vec<Tree> },
    LogisticRegression { coef: DVector<f64>, intercept: f64 },
}

#[derive(Debug, Clone)]
pub struct Estimator {
    kind: Kind,
}

impl Estimator {
    pub fn compile(spec: EstimatorSpec, n_features: usize, n_classes: usize) -> Result<Self, ArtifactError> {
        match spec {
            EstimatorSpec::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ArtifactError::invalid("random forest has no trees"));
                }
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, t)| Tree::compile(i, t, n_features, n_classes))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self {
                    kind: Kind::RandomForest { trees },
                })
            }
            EstimatorSpec::LogisticRegression { coef, intercept } => {
                if n_classes != 2 {
                    return Err(ArtifactError::invalid(format!(
                        "logistic regression needs exactly 2 classes, artifact has {n_classes}"
                    )));
                }
                if coef.len() != n_features {
                    return Err(ArtifactError::invalid(format!(
                        "logistic regression has {} coefficients for {n_features} features",
                        coef.len()
                    )));
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::invalid("logistic regression has non-finite parameters"));
                }
                Ok(Self {
                    kind: Kind::LogisticRegression {
                        coef: DVector::from_vec(coef),
                        intercept,
                    },
                })
            }
        }
    }

    /// Short human-readable description (used by `credit-api inspect`).
    pub fn describe(&self) -> String {
        match &self.kind {
            Kind::RandomForest { trees } => {
                let nodes: usize = trees.iter().map(|t| t.nodes.len()).sum();
                format!("random forest ({} trees, {nodes} nodes)", trees.len())
            }
            Kind::LogisticRegression { coef, .. } => {
                format!("logistic regression ({} coefficients)", coef.len())
            }
        }
    }

    pub fn predict_proba(&self, x: &DVector<f64>, n_classes: usize) -> Result<Vec<f64>, InferenceError> {
        let proba: Vec<f64> = match &self.kind {
            Kind::RandomForest { trees } => {
                let total = trees
                    .par_iter()
                    .map(|t| DVector::from_column_slice(t.leaf(x)))
                    .reduce(|| DVector::zeros(n_classes), |a, b| a + b);
                (total / trees.len() as f64).iter().copied().collect()
            }
            Kind::LogisticRegression { coef, intercept } => {
                let p = sigmoid(margin(coef, x, *intercept));
                vec![1.0 - p, p]
            }
        };
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::new("model produced a non-finite probability"));
        }
        Ok(proba)
    }
}

/// `coef . x + intercept`. When products overflow in both directions the
/// plain sum is NaN; the sign of the dominant terms decides instead.
fn margin(coef: &DVector<f64>, x: &DVector<f64>, intercept: f64) -> f64 {
    let m = coef.dot(x) + intercept;
    if !m.is_nan() {
        return m;
    }
    let largest = x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let dominant: f64 = coef
        .iter()
        .zip(x.iter())
        .map(|(c, v)| match (largest.is_infinite(), v.is_infinite()) {
            (true, true) => c * v.signum(),
            (true, false) => 0.0,
            (false, _) => c * (v / largest),
        })
        .sum();
    if dominant.is_nan() || dominant == 0.0 {
        0.0
    } else {
        dominant.signum() * f64::INFINITY
    }
}
