//! JSON documents for the three stored artifacts.
//!
//! The documents mirror the fitted attributes of the producing library
//! (`mean_`, `scale_`, `components_`, `support_vectors_`, ...) so an exporter
//! only has to dump them field by field.

use serde::{Deserialize, Serialize};

use crate::common::error::{LoadFault, PriceError, PriceResult};

use super::domain::{
    Kernel, LinearRegressor, Pca, RawArtifact, Regressor, StandardScaler, SvrRegressor,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalerDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PcaDoc {
    pub mean: Vec<f64>,
    pub components: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explained_variance: Option<Vec<f64>>,
    #[serde(default)]
    pub whiten: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorDoc {
    Linear {
        coef: Vec<f64>,
        intercept: f64,
    },
    Svr {
        kernel: Kernel,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    },
}

fn parse<'a, T: Deserialize<'a>>(raw: &'a RawArtifact) -> PriceResult<T> {
    serde_json::from_slice(&raw.bytes).map_err(|err| PriceError::load(raw.kind.as_str(), err))
}

fn built<T>(raw: &RawArtifact, result: Result<T, LoadFault>) -> PriceResult<T> {
    result.map_err(|fault| PriceError::load(raw.kind.as_str(), fault))
}

pub fn decode_scaler(raw: &RawArtifact) -> PriceResult<StandardScaler> {
    let doc: ScalerDoc = parse(raw)?;
    built(raw, StandardScaler::new(doc.mean, doc.scale, doc.feature_names_in))
}

pub fn decode_projector(raw: &RawArtifact) -> PriceResult<Pca> {
    let doc: PcaDoc = parse(raw)?;
    built(
        raw,
        Pca::new(doc.mean, doc.components, doc.explained_variance, doc.whiten),
    )
}

pub fn decode_regressor(raw: &RawArtifact) -> PriceResult<Regressor> {
    let doc: RegressorDoc = parse(raw)?;
    let model: Regressor = match doc {
        RegressorDoc::Linear { coef, intercept } => {
            built(raw, LinearRegressor::new(coef, intercept))?.into()
        }
        RegressorDoc::Svr {
            kernel,
            support_vectors,
            dual_coef,
            intercept,
        } => built(
            raw,
            SvrRegressor::new(kernel, support_vectors, dual_coef, intercept),
        )?
        .into(),
    };
    Ok(model)
}

impl From<LinearRegressor> for Regressor {
    fn from(model: LinearRegressor) -> Self {
        Regressor::Linear(model)
    }
}

impl From<SvrRegressor> for Regressor {
    fn from(model: SvrRegressor) -> Self {
        Regressor::Svr(model)
    }
}
