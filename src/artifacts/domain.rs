//! Fitted pipeline stages and the contracts they satisfy.
//!
//! Stages are built once from decoded artifacts and never mutated afterwards,
//! so every type here is `Send + Sync` and shared by reference.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::common::error::{LoadFault, PriceResult};
use crate::common::fingerprint::Fingerprint;

/// The three stored artifacts, in pipeline order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArtifactKind {
    Scaler,
    Projector,
    Regressor,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Scaler,
        ArtifactKind::Projector,
        ArtifactKind::Regressor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Projector => "projector",
            ArtifactKind::Regressor => "regressor",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Undecoded artifact bytes plus where they came from.
#[derive(Clone, Debug)]
pub struct RawArtifact {
    pub kind: ArtifactKind,
    pub location: String,
    pub bytes: Vec<u8>,
}

impl RawArtifact {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.bytes)
    }
}

/// Repository contract for stored artifacts.
pub trait ArtifactRepo {
    fn fetch(&self, kind: ArtifactKind) -> PriceResult<RawArtifact>;
}

/// Vector-to-vector stage (scaler, projector).
pub trait Transform: Send + Sync {
    fn input_dim(&self) -> usize;
    fn output_dim(&self) -> usize;
    fn transform(&self, x: ArrayView1<'_, f64>) -> Array1<f64>;
}

/// Vector-to-scalar stage.
pub trait Regress: Send + Sync {
    fn input_dim(&self) -> usize;
    fn predict(&self, x: ArrayView1<'_, f64>) -> f64;
}

fn shape(msg: impl Into<String>) -> LoadFault {
    LoadFault::Shape(msg.into())
}

fn ensure_finite(name: &str, values: &[f64]) -> Result<(), LoadFault> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(shape(format!("{name}[{idx}] is not finite"))),
        None => Ok(()),
    }
}

fn matrix(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, LoadFault> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if height == 0 || width == 0 {
        return Err(shape(format!("{name} is empty")));
    }
    if let Some(idx) = rows.iter().position(|row| row.len() != width) {
        return Err(shape(format!(
            "{name} row {idx} has {} values, expected {width}",
            rows[idx].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    ensure_finite(name, &flat)?;
    Array2::from_shape_vec((height, width), flat).map_err(|err| shape(format!("{name}: {err}")))
}

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Clone, Debug)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// A zero scale leaves the centred column unscaled.
    pub fn new(
        mean: Vec<f64>,
        scale: Vec<f64>,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self, LoadFault> {
        if mean.is_empty() {
            return Err(shape("mean is empty"));
        }
        if mean.len() != scale.len() {
            return Err(shape(format!(
                "mean has {} columns but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if let Some(names) = &feature_names {
            if names.len() != mean.len() {
                return Err(shape(format!(
                    "{} feature names for {} columns",
                    names.len(),
                    mean.len()
                )));
            }
        }
        ensure_finite("mean", &mean)?;
        ensure_finite("scale", &scale)?;

        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect::<Vec<_>>();

        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
            feature_names,
        })
    }

    /// Column names the scaler was fitted with, when the artifact recorded them.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl Transform for StandardScaler {
    fn input_dim(&self) -> usize {
        self.mean.len()
    }

    fn output_dim(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        (&x - &self.mean) / &self.scale
    }
}

/// Principal-component projection onto a fitted basis.
#[derive(Clone, Debug)]
pub struct Pca {
    mean: Array1<f64>,
    /// `n_components x n_features`
    components: Array2<f64>,
    /// `sqrt(explained_variance)` when whitening.
    whiten_scale: Option<Array1<f64>>,
}

impl Pca {
    pub fn new(
        mean: Vec<f64>,
        components: Vec<Vec<f64>>,
        explained_variance: Option<Vec<f64>>,
        whiten: bool,
    ) -> Result<Self, LoadFault> {
        let components = matrix("components", components)?;
        let (k, n) = components.dim();
        if mean.len() != n {
            return Err(shape(format!(
                "mean has {} columns but components have {n}",
                mean.len()
            )));
        }
        ensure_finite("mean", &mean)?;

        let whiten_scale = if whiten {
            let variance =
                explained_variance.ok_or_else(|| shape("whiten requires explained_variance"))?;
            if variance.len() != k {
                return Err(shape(format!(
                    "explained_variance has {} entries for {k} components",
                    variance.len()
                )));
            }
            if let Some(idx) = variance.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(shape(format!("explained_variance[{idx}] must be positive")));
            }
            Some(variance.into_iter().map(f64::sqrt).collect::<Array1<f64>>())
        } else {
            None
        };

        Ok(Self {
            mean: Array1::from(mean),
            components,
            whiten_scale,
        })
    }
}

impl Transform for Pca {
    fn input_dim(&self) -> usize {
        self.components.ncols()
    }

    fn output_dim(&self) -> usize {
        self.components.nrows()
    }

    fn transform(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        let centered = &x - &self.mean;
        let mut reduced = self.components.dot(&centered);
        if let Some(scale) = &self.whiten_scale {
            reduced /= scale;
        }
        reduced
    }
}

/// Kernel of a support-vector regressor.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Rbf { gamma: f64 },
    Linear,
    Poly { degree: u32, gamma: f64, coef0: f64 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn apply(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match *self {
            Kernel::Rbf { gamma } => {
                let dist: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Linear => a.dot(&b),
            Kernel::Poly {
                degree,
                gamma,
                coef0,
            } => (gamma * a.dot(&b) + coef0).powi(i32::try_from(degree).unwrap_or(i32::MAX)),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * a.dot(&b) + coef0).tanh(),
        }
    }

    fn params(&self) -> Vec<f64> {
        match *self {
            Kernel::Rbf { gamma } => vec![gamma],
            Kernel::Linear => Vec::new(),
            Kernel::Poly { gamma, coef0, .. } => vec![gamma, coef0],
            Kernel::Sigmoid { gamma, coef0 } => vec![gamma, coef0],
        }
    }
}

/// `coef . z + intercept`
#[derive(Clone, Debug)]
pub struct LinearRegressor {
    coef: Array1<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self, LoadFault> {
        if coef.is_empty() {
            return Err(shape("coef is empty"));
        }
        ensure_finite("coef", &coef)?;
        ensure_finite("intercept", &[intercept])?;
        Ok(Self {
            coef: Array1::from(coef),
            intercept,
        })
    }
}

/// Support-vector regressor: `sum_i dual_coef_i * K(sv_i, z) + intercept`.
#[derive(Clone, Debug)]
pub struct SvrRegressor {
    kernel: Kernel,
    support_vectors: Array2<f64>,
    dual_coef: Array1<f64>,
    intercept: f64,
}

impl SvrRegressor {
    pub fn new(
        kernel: Kernel,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, LoadFault> {
        let support_vectors = matrix("support_vectors", support_vectors)?;
        if dual_coef.len() != support_vectors.nrows() {
            return Err(shape(format!(
                "{} dual coefficients for {} support vectors",
                dual_coef.len(),
                support_vectors.nrows()
            )));
        }
        ensure_finite("dual_coef", &dual_coef)?;
        ensure_finite("intercept", &[intercept])?;
        ensure_finite("kernel", &kernel.params())?;
        if let Kernel::Poly { degree, .. } = kernel {
            if i32::try_from(degree).is_err() {
                return Err(shape(format!("poly degree {degree} is too large")));
            }
        }
        Ok(Self {
            kernel,
            support_vectors,
            dual_coef: Array1::from(dual_coef),
            intercept,
        })
    }
}

/// Fitted regressor variants an artifact may carry.
#[derive(Clone, Debug)]
pub enum Regressor {
    Linear(LinearRegressor),
    Svr(SvrRegressor),
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "linear",
            Regressor::Svr(_) => "svr",
        }
    }
}

impl Regress for Regressor {
    fn input_dim(&self) -> usize {
        match self {
            Regressor::Linear(m) => m.coef.len(),
            Regressor::Svr(m) => m.support_vectors.ncols(),
        }
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> f64 {
        match self {
            Regressor::Linear(m) => m.coef.dot(&x) + m.intercept,
            Regressor::Svr(m) => {
                let sum: f64 = m
                    .support_vectors
                    .outer_iter()
                    .zip(m.dual_coef.iter())
                    .map(|(sv, coef)| coef * m.kernel.apply(sv, x))
                    .sum();
                sum + m.intercept
            }
        }
    }
}
