//! Gradient boosting regressor exported from training

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::models::PriceModel;
use crate::types::FEATURE_COLUMNS;

const ARTIFACT: &str = "model";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, sample: &ArrayView1<f64>) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                // trees were grown on float32 features
                if (sample[*feature] as f32) as f64 <= *threshold {
                    left.predict(sample)
                } else {
                    right.predict(sample)
                }
            }
        }
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        match self {
            TreeNode::Leaf { value } => {
                if !value.is_finite() {
                    return Err(PriceError::invalid_artifact(ARTIFACT, "non-finite leaf value"));
                }
                Ok(())
            }
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(PriceError::invalid_artifact(
                        ARTIFACT,
                        format!("split on feature {} of {}", feature, n_features),
                    ));
                }
                if threshold.is_nan() {
                    return Err(PriceError::invalid_artifact(ARTIFACT, "NaN split threshold"));
                }
                left.validate(n_features)?;
                right.validate(n_features)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub n_features: usize,
    pub init_prediction: f64,
    pub learning_rate: f64,
    pub trees: Vec<TreeNode>,
}

/// Additive tree ensemble: `init + learning_rate * sum(tree(x))`.
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    n_features: usize,
    init_prediction: f64,
    learning_rate: f64,
    trees: Vec<TreeNode>,
}

impl GradientBoostingRegressor {
    pub fn from_params(params: GradientBoostingParams) -> Result<Self> {
        if params.n_features != FEATURE_COLUMNS.len() {
            return Err(PriceError::invalid_artifact(
                ARTIFACT,
                format!(
                    "trained on {} features, expected {}",
                    params.n_features,
                    FEATURE_COLUMNS.len()
                ),
            ));
        }
        if let Some(ref names) = params.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                return Err(PriceError::invalid_artifact(
                    ARTIFACT,
                    format!(
                        "trained on columns {:?}, expected {:?}",
                        names, FEATURE_COLUMNS
                    ),
                ));
            }
        }
        if !params.init_prediction.is_finite() || !params.learning_rate.is_finite() {
            return Err(PriceError::invalid_artifact(
                ARTIFACT,
                "non-finite init_prediction or learning_rate",
            ));
        }
        for tree in &params.trees {
            tree.validate(params.n_features)?;
        }

        Ok(Self {
            n_features: params.n_features,
            init_prediction: params.init_prediction,
            learning_rate: params.learning_rate,
            trees: params.trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_single(&self, sample: ArrayView1<f64>) -> f64 {
        let boosted: f64 = self.trees.iter().map(|t| t.predict(&sample)).sum();
        self.init_prediction + self.learning_rate * boosted
    }
}

impl PriceModel for GradientBoostingRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(PriceError::ShapeMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }

        Ok(x.rows().into_iter().map(|row| self.predict_single(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn leaf(value: f64) -> Box<TreeNode> {
        Box::new(TreeNode::Leaf { value })
    }

    fn model() -> GradientBoostingRegressor {
        GradientBoostingRegressor::from_params(GradientBoostingParams {
            feature_names: None,
            n_features: 6,
            init_prediction: 10.0,
            learning_rate: 0.5,
            trees: vec![
                TreeNode::Split {
                    feature: 5,
                    threshold: 0.0,
                    left: leaf(2.0),
                    right: leaf(-2.0),
                },
                TreeNode::Split {
                    feature: 2,
                    threshold: 0.5,
                    left: leaf(0.0),
                    right: Box::new(TreeNode::Split {
                        feature: 4,
                        threshold: 1.0,
                        left: leaf(1.0),
                        right: leaf(3.0),
                    }),
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_predict() {
        let m = model();
        let x = array![
            [0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
            [0.0, 0.0, 1.0, 0.0, 0.5, 1.0],
            [0.0, 0.0, 1.0, 0.0, 2.0, 0.0],
        ];
        let pred = m.predict(&x).unwrap();
        assert_eq!(pred.len(), 3);
        assert_eq!(pred[0], 10.0 + 0.5 * (2.0 + 0.0));
        assert_eq!(pred[1], 10.0 + 0.5 * (-2.0 + 1.0));
        // threshold is inclusive on the left
        assert_eq!(pred[2], 10.0 + 0.5 * (2.0 + 3.0));
    }

    #[test]
    fn test_empty_ensemble_predicts_init() {
        let m = GradientBoostingRegressor::from_params(GradientBoostingParams {
            feature_names: None,
            n_features: 6,
            init_prediction: 13.5,
            learning_rate: 0.1,
            trees: Vec::new(),
        })
        .unwrap();
        let pred = m.predict(&Array2::zeros((1, 6))).unwrap();
        assert_eq!(pred[0], 13.5);
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            model().predict(&Array2::zeros((1, 5))),
            Err(PriceError::ShapeMismatch { expected: 6, got: 5 })
        ));
    }

    #[test]
    fn test_rejects_bad_artifacts() {
        let mut params = GradientBoostingParams {
            feature_names: None,
            n_features: 6,
            init_prediction: 0.0,
            learning_rate: 0.1,
            trees: vec![TreeNode::Split {
                feature: 6,
                threshold: 0.0,
                left: leaf(0.0),
                right: leaf(0.0),
            }],
        };
        assert!(GradientBoostingRegressor::from_params(params.clone()).is_err());

        params.trees = vec![TreeNode::Leaf { value: f64::NAN }];
        assert!(GradientBoostingRegressor::from_params(params.clone()).is_err());

        params.trees = Vec::new();
        params.n_features = 5;
        assert!(GradientBoostingRegressor::from_params(params.clone()).is_err());

        params.n_features = 6;
        params.feature_names = Some(
            ["fuel", "seller_type", "transmission", "owner", "age", "km_driven_yj"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert!(GradientBoostingRegressor::from_params(params).is_err());
    }

    #[test]
    fn test_split_compares_at_float32_precision() {
        let threshold = 0.1_f32 as f64;
        let tree = TreeNode::Split {
            feature: 0,
            threshold,
            left: leaf(-1.0),
            right: leaf(1.0),
        };
        // above the threshold in f64, equal to it once narrowed to f32
        let value = 0.100_000_001_6;
        assert!(value > threshold);
        assert_eq!(value as f32, 0.1_f32);

        let sample = array![value, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(tree.predict(&sample.view()), -1.0);

        let sample = array![0.100_000_01, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(tree.predict(&sample.view()), 1.0);
    }

    #[test]
    fn test_tree_json_format() {
        let tree: TreeNode = serde_json::from_str(
            r#"{"type": "split", "feature": 0, "threshold": 1.5,
                "left": {"type": "leaf", "value": -1.0},
                "right": {"type": "leaf", "value": 1.0}}"#,
        )
        .unwrap();
        let sample = array![2.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(tree.predict(&sample.view()), 1.0);
    }
}
