//! Yeo-Johnson power transform with fitted per-column lambdas

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};

const ARTIFACT: &str = "power transformer";

/// Forward and inverse application of a fitted power transform.
///
/// Joint application works on rows of `n_features()` columns. The per-column
/// methods default to padding the other columns with zeros, which is only
/// correct for column-independent transforms.
pub trait PowerTransform {
    fn n_features(&self) -> usize;

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn transform_column(&self, column: usize, value: f64) -> Result<f64> {
        let row = padded_row(self.n_features(), column, value)?;
        single_row_value(&self.transform(&row)?, row.ncols(), column)
    }

    fn inverse_transform_column(&self, column: usize, value: f64) -> Result<f64> {
        let row = padded_row(self.n_features(), column, value)?;
        single_row_value(&self.inverse_transform(&row)?, row.ncols(), column)
    }
}

/// A single row holding `value` at `column` and 0.0 everywhere else.
pub fn padded_row(n_features: usize, column: usize, value: f64) -> Result<Array2<f64>> {
    if column >= n_features {
        return Err(PriceError::ShapeMismatch {
            expected: n_features,
            got: column + 1,
        });
    }
    let mut row = Array2::zeros((1, n_features));
    row[[0, column]] = value;
    Ok(row)
}

/// Reads `column` from a one-row output that must have `n_features` columns.
pub fn single_row_value(out: &Array2<f64>, n_features: usize, column: usize) -> Result<f64> {
    if out.nrows() != 1 {
        return Err(PriceError::ShapeMismatch {
            expected: 1,
            got: out.nrows(),
        });
    }
    if out.ncols() != n_features {
        return Err(PriceError::ShapeMismatch {
            expected: n_features,
            got: out.ncols(),
        });
    }
    Ok(out[[0, column]])
}

fn default_method() -> String {
    "yeo-johnson".to_string()
}

fn default_standardize() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerTransformerParams {
    #[serde(default = "default_method")]
    pub method: String,
    pub lambdas: Vec<f64>,
    #[serde(default = "default_standardize")]
    pub standardize: bool,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct Standardization {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct YeoJohnsonTransformer {
    lambdas: Array1<f64>,
    standardization: Option<Standardization>,
}

impl YeoJohnsonTransformer {
    /// Transformer without post-transform standardization.
    pub fn new(lambdas: Vec<f64>) -> Result<Self> {
        Self::from_params(PowerTransformerParams {
            method: default_method(),
            lambdas,
            standardize: false,
            mean: None,
            scale: None,
        })
    }

    pub fn from_params(params: PowerTransformerParams) -> Result<Self> {
        if params.method != "yeo-johnson" {
            return Err(PriceError::invalid_artifact(
                ARTIFACT,
                format!("unsupported method {:?}", params.method),
            ));
        }
        if params.lambdas.is_empty() {
            return Err(PriceError::invalid_artifact(ARTIFACT, "no lambdas"));
        }
        if params.lambdas.iter().any(|l| !l.is_finite()) {
            return Err(PriceError::invalid_artifact(ARTIFACT, "non-finite lambda"));
        }

        let n_features = params.lambdas.len();
        let standardization = if params.standardize {
            let mean = params.mean.ok_or_else(|| {
                PriceError::invalid_artifact(ARTIFACT, "standardize is set but mean is missing")
            })?;
            let scale = params.scale.ok_or_else(|| {
                PriceError::invalid_artifact(ARTIFACT, "standardize is set but scale is missing")
            })?;
            if mean.len() != n_features || scale.len() != n_features {
                return Err(PriceError::invalid_artifact(
                    ARTIFACT,
                    format!(
                        "expected {} mean/scale values, got {}/{}",
                        n_features,
                        mean.len(),
                        scale.len()
                    ),
                ));
            }
            if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
                return Err(PriceError::invalid_artifact(
                    ARTIFACT,
                    "non-finite standardization parameter",
                ));
            }
            Some(Standardization {
                mean: Array1::from(mean),
                // constant column
                scale: Array1::from(scale).mapv(|s| if s == 0.0 { 1.0 } else { s }),
            })
        } else {
            None
        };

        Ok(Self {
            lambdas: Array1::from(params.lambdas),
            standardization,
        })
    }

    pub fn lambdas(&self) -> &Array1<f64> {
        &self.lambdas
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.lambdas.len() {
            return Err(PriceError::ShapeMismatch {
                expected: self.lambdas.len(),
                got: column + 1,
            });
        }
        Ok(())
    }

    fn check_shape(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.lambdas.len() {
            return Err(PriceError::ShapeMismatch {
                expected: self.lambdas.len(),
                got: x.ncols(),
            });
        }
        Ok(())
    }

    fn forward(&self, column: usize, value: f64) -> Result<f64> {
        let finite = |v: f64, stage: &str| {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(PriceError::NumericDomain(format!(
                    "{} of column {} is not finite (input {})",
                    stage, column, value
                )))
            }
        };

        finite(value, "input")?;
        let mut y = finite(yeo_johnson(value, self.lambdas[column]), "power transform")?;
        if let Some(ref st) = self.standardization {
            y = (y - st.mean[column]) / st.scale[column];
        }
        finite(y, "standardized value")
    }

    fn inverse(&self, column: usize, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(PriceError::NumericDomain(format!(
                "cannot invert non-finite value {} in column {}",
                value, column
            )));
        }

        let mut y = value;
        if let Some(ref st) = self.standardization {
            y = y * st.scale[column] + st.mean[column];
        }
        let x = yeo_johnson_inverse(y, self.lambdas[column]);
        if !x.is_finite() {
            return Err(PriceError::NumericDomain(format!(
                "inverse power transform of {} in column {} is outside the transform's range",
                value, column
            )));
        }
        Ok(x)
    }
}

impl PowerTransform for YeoJohnsonTransformer {
    fn n_features(&self) -> usize {
        self.lambdas.len()
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_shape(x)?;
        let mut out = x.clone();
        for ((_, j), v) in out.indexed_iter_mut() {
            *v = self.forward(j, *v)?;
        }
        Ok(out)
    }

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_shape(x)?;
        let mut out = x.clone();
        for ((_, j), v) in out.indexed_iter_mut() {
            *v = self.inverse(j, *v)?;
        }
        Ok(out)
    }

    // Columns are independent, so no padding is needed.
    fn transform_column(&self, column: usize, value: f64) -> Result<f64> {
        self.check_column(column)?;
        self.forward(column, value)
    }

    fn inverse_transform_column(&self, column: usize, value: f64) -> Result<f64> {
        self.check_column(column)?;
        self.inverse(column, value)
    }
}

fn is_zero(v: f64) -> bool {
    v.abs() < f64::EPSILON
}

pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if is_zero(lambda) {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if is_zero(lambda - 2.0) {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

pub fn yeo_johnson_inverse(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if is_zero(lambda) {
            y.exp_m1()
        } else {
            (y * lambda + 1.0).powf(1.0 / lambda) - 1.0
        }
    } else if is_zero(lambda - 2.0) {
        -(-y).exp_m1()
    } else {
        1.0 - (1.0 - (2.0 - lambda) * y).powf(1.0 / (2.0 - lambda))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64) {
        let tol = 1e-9 * b.abs().max(1.0);
        assert!((a - b).abs() <= tol, "{} != {}", a, b);
    }

    #[test]
    fn test_forward_branches() {
        // λ = 1 is the identity for x >= 0
        assert_close(yeo_johnson(5.0, 1.0), 5.0);
        assert_close(yeo_johnson(3.0, 0.0), 4.0_f64.ln());
        assert_close(yeo_johnson(3.0, 0.5), (2.0 - 1.0) / 0.5);
        assert_close(yeo_johnson(-3.0, 2.0), -(4.0_f64.ln()));
        assert_close(yeo_johnson(-3.0, 1.0), -3.0);
        assert_close(yeo_johnson(-3.0, 0.0), -((4.0_f64).powf(2.0) - 1.0) / 2.0);
        assert_eq!(yeo_johnson(0.0, 0.3), 0.0);
    }

    #[test]
    fn test_inverse_recovers_input() {
        let lambdas = [-0.7, 0.0, 0.25, 1.0, 1.6, 2.0, 2.4];
        let xs = [-250.0, -3.5, -0.1, 0.0, 0.2, 7.0, 50_000.0];
        for &lambda in &lambdas {
            for &x in &xs {
                let y = yeo_johnson(x, lambda);
                if !y.is_finite() {
                    continue;
                }
                assert_close(yeo_johnson_inverse(y, lambda), x);
            }
        }
    }

    #[test]
    fn test_inverse_outside_range_is_nan() {
        // for λ < 0 the forward output for x >= 0 is bounded above by -1/λ
        assert!(yeo_johnson_inverse(5.0, -0.3).is_nan());
    }

    fn fitted() -> YeoJohnsonTransformer {
        YeoJohnsonTransformer::from_params(PowerTransformerParams {
            method: "yeo-johnson".to_string(),
            lambdas: vec![0.12, 0.55],
            standardize: true,
            mean: Some(vec![14.0, 180.0]),
            scale: Some(vec![1.5, 40.0]),
        })
        .unwrap()
    }

    #[test]
    fn test_standardized_forward() {
        let pt = fitted();
        let out = pt.transform(&array![[0.0, 50_000.0]]).unwrap();
        let expected_km = (yeo_johnson(50_000.0, 0.55) - 180.0) / 40.0;
        let expected_price = (yeo_johnson(0.0, 0.12) - 14.0) / 1.5;
        assert_close(out[[0, 1]], expected_km);
        assert_close(out[[0, 0]], expected_price);
    }

    #[test]
    fn test_columns_are_independent() {
        let pt = fitted();
        let a = pt.transform(&array![[0.0, 50_000.0]]).unwrap();
        let b = pt.transform(&array![[750_000.0, 50_000.0]]).unwrap();
        assert_eq!(a[[0, 1]], b[[0, 1]]);

        let c = pt.inverse_transform(&array![[1.25, 0.0]]).unwrap();
        let d = pt.inverse_transform(&array![[1.25, -2.0]]).unwrap();
        assert_eq!(c[[0, 0]], d[[0, 0]]);
    }

    #[test]
    fn test_column_methods_match_padded_joint_application() {
        let pt = fitted();
        let joint = pt.transform(&padded_row(2, 1, 50_000.0).unwrap()).unwrap();
        assert_eq!(pt.transform_column(1, 50_000.0).unwrap(), joint[[0, 1]]);

        let joint = pt.inverse_transform(&padded_row(2, 0, 1.25).unwrap()).unwrap();
        assert_eq!(pt.inverse_transform_column(0, 1.25).unwrap(), joint[[0, 0]]);
    }

    #[test]
    fn test_shape_checks() {
        let pt = fitted();
        assert!(matches!(
            pt.transform(&array![[1.0, 2.0, 3.0]]),
            Err(PriceError::ShapeMismatch { expected: 2, got: 3 })
        ));
        assert!(pt.transform_column(2, 1.0).is_err());
        assert!(padded_row(2, 2, 1.0).is_err());
    }

    /// Drops the last column, as a misbehaving adapter might.
    struct TruncatingTransform;

    impl PowerTransform for TruncatingTransform {
        fn n_features(&self) -> usize {
            2
        }

        fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
            Ok(x.slice(ndarray::s![.., ..1]).to_owned())
        }

        fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
            Ok(Array2::zeros((0, x.ncols())))
        }
    }

    #[test]
    fn test_wrong_output_shape_is_an_error() {
        let pt = TruncatingTransform;
        assert!(matches!(
            pt.transform_column(1, 50_000.0),
            Err(PriceError::ShapeMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            pt.inverse_transform_column(0, 1.0),
            Err(PriceError::ShapeMismatch { expected: 1, got: 0 })
        ));
    }

    #[test]
    fn test_non_finite_values_are_errors() {
        let pt = fitted();
        assert!(matches!(
            pt.transform_column(1, f64::NAN),
            Err(PriceError::NumericDomain(_))
        ));
        assert!(matches!(
            pt.inverse_transform_column(0, f64::INFINITY),
            Err(PriceError::NumericDomain(_))
        ));

        let bounded = YeoJohnsonTransformer::new(vec![-0.3, 1.0]).unwrap();
        assert!(matches!(
            bounded.inverse_transform_column(0, 5.0),
            Err(PriceError::NumericDomain(_))
        ));
    }

    #[test]
    fn test_invalid_params() {
        let mut params = PowerTransformerParams {
            method: "box-cox".to_string(),
            lambdas: vec![0.1, 0.2],
            standardize: false,
            mean: None,
            scale: None,
        };
        assert!(YeoJohnsonTransformer::from_params(params.clone()).is_err());

        params.method = "yeo-johnson".to_string();
        params.standardize = true;
        assert!(YeoJohnsonTransformer::from_params(params.clone()).is_err());

        params.mean = Some(vec![0.0]);
        params.scale = Some(vec![1.0, 1.0]);
        assert!(YeoJohnsonTransformer::from_params(params.clone()).is_err());

        params.mean = Some(vec![0.0, 0.0]);
        params.lambdas = vec![f64::NAN, 0.2];
        assert!(YeoJohnsonTransformer::from_params(params).is_err());
    }

    #[test]
    fn test_params_defaults() {
        let params: PowerTransformerParams = serde_json::from_str(
            r#"{"lambdas": [0.1, 0.2], "mean": [0.0, 0.0], "scale": [1.0, 0.0]}"#,
        )
        .unwrap();
        assert_eq!(params.method, "yeo-johnson");
        assert!(params.standardize);

        let pt = YeoJohnsonTransformer::from_params(params).unwrap();
        // zero scale acts as 1
        assert_close(pt.transform_column(1, 3.0).unwrap(), yeo_johnson(3.0, 0.2));
    }
}
