//! Loading the fitted stages and running predictions through them.

use std::sync::mpsc;
use std::sync::Arc;

use ndarray::ArrayView1;

use crate::artifacts::codec;
use crate::artifacts::domain::{ArtifactKind, ArtifactRepo, Regress, Transform};
use crate::artifacts::repo_fs::FsArtifactRepo;
use crate::common::config::AppCfg;
use crate::common::error::{PriceError, PriceResult, Stage};
use crate::common::time::Stopwatch;
use crate::features::domain::{FeatureVector, PlaceholderPolicy};

use super::domain::{Manifest, ManifestEntry, PreFittedPipeline, Prediction};
use super::workers::Pool;

/// Load the three artifacts from the configured directory.
pub fn load_from_cfg(cfg: &AppCfg) -> PriceResult<PreFittedPipeline> {
    load(&FsArtifactRepo::new(cfg), cfg.placeholder)
}

/// Fetch, decode and cross-check the three stages.
pub fn load(repo: &dyn ArtifactRepo, placeholder: PlaceholderPolicy) -> PriceResult<PreFittedPipeline> {
    let clock = Stopwatch::start();
    let mut entries = Vec::with_capacity(ArtifactKind::ALL.len());
    let mut fetch = |kind: ArtifactKind| -> PriceResult<_> {
        let raw = repo.fetch(kind)?;
        let entry = ManifestEntry {
            kind,
            location: raw.location.clone(),
            fingerprint: raw.fingerprint().finish_hex(),
        };
        log::info!(
            target: "inference",
            "fetched {kind} from {} fp={}",
            entry.location,
            entry.fingerprint
        );
        entries.push(entry);
        Ok(raw)
    };

    let scaler = codec::decode_scaler(&fetch(ArtifactKind::Scaler)?)?;
    let projector = codec::decode_projector(&fetch(ArtifactKind::Projector)?)?;
    let regressor = codec::decode_regressor(&fetch(ArtifactKind::Regressor)?)?;

    if scaler.output_dim() != projector.input_dim() {
        return Err(PriceError::shape(
            ArtifactKind::Projector.as_str(),
            format!(
                "projector expects {} inputs but scaler produces {}",
                projector.input_dim(),
                scaler.output_dim()
            ),
        ));
    }
    if projector.output_dim() != regressor.input_dim() {
        return Err(PriceError::shape(
            ArtifactKind::Regressor.as_str(),
            format!(
                "regressor expects {} inputs but projector produces {}",
                regressor.input_dim(),
                projector.output_dim()
            ),
        ));
    }
    if let Some(names) = scaler.feature_names() {
        let expected = placeholder.columns();
        if names.len() != expected.len() || names.iter().zip(&expected).any(|(a, b)| a != b) {
            return Err(PriceError::shape(
                ArtifactKind::Scaler.as_str(),
                format!(
                    "fitted columns do not match the {} schema ({} fitted, {} expected)",
                    placeholder.as_str(),
                    names.len(),
                    expected.len()
                ),
            ));
        }
    } else if scaler.input_dim() != placeholder.width() {
        return Err(PriceError::shape(
            ArtifactKind::Scaler.as_str(),
            format!(
                "scaler fitted on {} columns but the {} layout sends {}",
                scaler.input_dim(),
                placeholder.as_str(),
                placeholder.width()
            ),
        ));
    }

    let manifest = Manifest {
        entries,
        input_dim: scaler.input_dim(),
        reduced_dim: projector.output_dim(),
        regressor: regressor.kind(),
        placeholder,
    };
    log::info!(
        target: "inference",
        "pipeline ready: {} -> {} -> {} in {}ms",
        manifest.input_dim,
        manifest.reduced_dim,
        manifest.regressor,
        clock.elapsed_ms()
    );

    Ok(PreFittedPipeline {
        scaler,
        projector,
        regressor,
        manifest,
    })
}

/// Predict the nightly price for one feature vector.
pub fn predict(pipeline: &PreFittedPipeline, features: &FeatureVector) -> PriceResult<Prediction> {
    predict_row(pipeline, &features.to_row(pipeline.placeholder()))
}

/// Run an already laid-out row through scale → project → regress.
pub fn predict_row(pipeline: &PreFittedPipeline, row: &[f64]) -> PriceResult<Prediction> {
    let clock = Stopwatch::start();

    if row.len() != pipeline.scaler.input_dim() {
        return Err(mismatch(Stage::Scale, pipeline.scaler.input_dim(), row.len()));
    }
    let scaled = pipeline.scaler.transform(ArrayView1::from(row));

    if scaled.len() != pipeline.projector.input_dim() {
        return Err(mismatch(
            Stage::Project,
            pipeline.projector.input_dim(),
            scaled.len(),
        ));
    }
    let reduced = pipeline.projector.transform(scaled.view());

    let price = pipeline.regressor.predict(reduced.view());
    if !price.is_finite() {
        log::warn!(target: "inference", "non-finite prediction {price}");
        return Err(PriceError::NumericAnomaly { value: price });
    }

    let latency_us = clock.elapsed_us();
    log::debug!(target: "inference", "predicted {price} in {latency_us}us");
    Ok(Prediction { price, latency_us })
}

fn mismatch(stage: Stage, expected: usize, got: usize) -> PriceError {
    log::warn!(target: "inference", "{stage} stage rejected a row of {got} features (expects {expected})");
    PriceError::SchemaMismatch {
        stage,
        expected,
        got,
    }
}

/// Predict every vector on the worker pool; results keep the input order.
pub fn batch_predict(
    pipeline: Arc<PreFittedPipeline>,
    vectors: Vec<FeatureVector>,
    pool: &Pool,
) -> Vec<PriceResult<Prediction>> {
    let total = vectors.len();
    let (tx, rx) = mpsc::channel();
    for (idx, vector) in vectors.into_iter().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let tx = tx.clone();
        pool.submit(move || {
            let _ = tx.send((idx, predict(&pipeline, &vector)));
        });
    }
    drop(tx);

    let mut slots: Vec<Option<PriceResult<Prediction>>> = (0..total).map(|_| None).collect();
    for (idx, result) in rx {
        slots[idx] = Some(result);
    }
    slots
        .into_iter()
        // a job that never reported back had its worker die under it
        .map(|slot| slot.unwrap_or_else(|| Err(PriceError::NotReady)))
        .collect()
}
