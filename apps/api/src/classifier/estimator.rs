//! Estimators restored from JSON exports of fitted scikit-learn classifiers.
//!
//! Random forests use the flattened tree layout of `sklearn.tree._tree.Tree`:
//! a node is a leaf when `children_left[node] == -1`, otherwise the sample goes
//! left when `x[feature[node]] <= threshold[node]`.

use serde::Deserialize;

use super::{FeatureVector, ModelError};

const LEAF: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest(RandomForest),
    Linear(LinearModel),
}

impl ClassifierArtifact {
    pub fn classes(&self) -> &[String] {
        match self {
            ClassifierArtifact::RandomForest(forest) => &forest.classes,
            ClassifierArtifact::Linear(model) => &model.classes,
        }
    }

    /// Checks structural invariants against the vectorizer dimension `dim`.
    /// After this passes, `predict` cannot index out of bounds or loop.
    pub fn validate(&self, dim: usize) -> Result<(), ModelError> {
        if self.classes().is_empty() {
            return Err(ModelError::NoClasses);
        }
        match self {
            ClassifierArtifact::RandomForest(forest) => forest.validate(dim),
            ClassifierArtifact::Linear(model) => model.validate(dim),
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> &str {
        match self {
            ClassifierArtifact::RandomForest(forest) => forest.predict(features),
            ClassifierArtifact::Linear(model) => model.predict(features),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Random forest
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Per-node class distribution (counts or fractions).
    value: Vec<Vec<f64>>,
}

impl RandomForest {
    fn validate(&self, dim: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::MalformedTree {
                tree: 0,
                reason: "forest has no trees".to_string(),
            });
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len(), dim)
                .map_err(|fault| match fault {
                    TreeFault::Feature(feature) => ModelError::FeatureMismatch { feature, dim },
                    TreeFault::Shape(reason) => ModelError::MalformedTree { tree: i, reason },
                })?;
        }
        Ok(())
    }

    /// Soft voting: averages each tree's normalized leaf distribution.
    fn predict(&self, features: &FeatureVector) -> &str {
        let mut votes = vec![0.0_f64; self.classes.len()];
        for tree in &self.trees {
            let dist = &tree.value[tree.leaf_for(features)];
            let total: f64 = dist.iter().sum();
            if total > 0.0 {
                for (vote, share) in votes.iter_mut().zip(dist) {
                    *vote += share / total;
                }
            }
        }
        &self.classes[argmax(&votes)]
    }
}

enum TreeFault {
    Feature(usize),
    Shape(String),
}

impl DecisionTree {
    fn validate(&self, n_classes: usize, dim: usize) -> Result<(), TreeFault> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(TreeFault::Shape("tree has no nodes".to_string()));
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(TreeFault::Shape("node arrays differ in length".to_string()));
        }

        for node in 0..n {
            if self.value[node].len() != n_classes {
                return Err(TreeFault::Shape(format!(
                    "node {node} has {} class weights, expected {n_classes}",
                    self.value[node].len()
                )));
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(TreeFault::Shape(format!(
                        "node {node} has a right child but no left child"
                    )));
                }
                continue;
            }
            // Children must come after their parent; this also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(TreeFault::Shape(format!(
                        "node {node} points to invalid child {child}"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 {
                return Err(TreeFault::Shape(format!(
                    "split node {node} has no feature"
                )));
            }
            if feature as usize >= dim {
                return Err(TreeFault::Feature(feature as usize));
            }
        }
        Ok(())
    }

    fn leaf_for(&self, features: &FeatureVector) -> usize {
        let mut node = 0;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return node;
            }
            let x = features.get(self.feature[node] as usize);
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Linear model
// ────────────────────────────────────────────────────────────────────────────

/// One-vs-rest linear classifier (logistic regression, linear SVM).
/// Binary models carry a single coefficient row scoring `classes[1]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearModel {
    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    fn validate(&self, dim: usize) -> Result<(), ModelError> {
        let rows = if self.is_binary() {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != rows || self.intercept.len() != rows {
            return Err(ModelError::MalformedLinear(format!(
                "expected {rows} coefficient rows and intercepts for {} classes, got {} and {}",
                self.classes.len(),
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some((i, row)) = self.coef.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(ModelError::MalformedLinear(format!(
                "coefficient row {i} has {} weights, expected {dim}",
                row.len()
            )));
        }
        Ok(())
    }

    fn predict(&self, features: &FeatureVector) -> &str {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| {
                features
                    .iter()
                    .map(|(i, x)| row.get(i).map_or(0.0, |w| w * x))
                    .sum::<f64>()
                    + bias
            })
            .collect();

        if self.is_binary() {
            let idx = usize::from(scores[0] > 0.0);
            return &self.classes[idx];
        }
        &self.classes[argmax(&scores)]
    }
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
