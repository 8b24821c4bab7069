//! Fixture artifacts shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use rental_price::artifacts::codec::{PcaDoc, RegressorDoc, ScalerDoc};
use rental_price::artifacts::Kernel;
use rental_price::common::config::AppCfg;
use rental_price::features::PlaceholderPolicy;

/// Price of the default listing under the fixture artifacts.
pub const GOLDEN_DEFAULT_PRICE: f64 = 85.430_402_106_309_34;

/// Price with 2 bathrooms, 3 bedrooms, 4 beds and an 80 cleaning fee.
pub const GOLDEN_LARGE_PRICE: f64 = 111.491_152_539_800_28;

pub const MEAN: [f64; 24] = [
    88.0, 4.0, 48.86, 2.34, 1.2, 1.3, 1.8, 310.0, 42.0, 1.7, 9.0, 3.5, 640.0, 11.0, 38.0, 24.0,
    92.0, 9.5, 9.3, 9.6, 9.6, 9.7, 9.2, 1.4,
];

pub const SCALE: [f64; 24] = [
    14.0, 9.0, 0.018, 0.032, 0.6, 0.85, 1.2, 420.0, 33.0, 1.1, 14.0, 9.5, 480.0, 10.5, 31.0, 41.0,
    8.5, 0.8, 0.95, 0.7, 0.75, 0.6, 0.9, 1.35,
];

pub const COMPONENTS: [[f64; 24]; 3] = [
    [
        0.05, 0.10, 0.02, -0.03, 0.35, 0.40, 0.38, 0.12, 0.25, 0.30, 0.08, -0.04, 0.02, -0.06,
        -0.05, 0.03, 0.04, 0.03, 0.03, 0.02, 0.02, 0.05, 0.02, 0.01,
    ],
    [
        0.12, -0.05, 0.01, 0.02, -0.02, -0.03, -0.01, 0.02, -0.04, -0.02, 0.01, 0.05, 0.03, -0.10,
        -0.12, 0.30, 0.42, 0.38, 0.36, 0.33, 0.35, 0.28, 0.37, 0.22,
    ],
    [
        -0.08, 0.22, 0.45, -0.40, 0.05, 0.02, 0.04, 0.10, 0.15, 0.01, 0.06, 0.18, 0.20, 0.33,
        0.35, -0.05, 0.02, 0.01, 0.00, -0.01, 0.00, 0.30, -0.02, -0.04,
    ],
];

pub fn scaler_doc(with_names: bool) -> ScalerDoc {
    ScalerDoc {
        feature_names_in: with_names.then(|| {
            PlaceholderPolicy::Strip
                .columns()
                .into_iter()
                .map(String::from)
                .collect()
        }),
        mean: MEAN.to_vec(),
        scale: SCALE.to_vec(),
    }
}

pub fn pca_doc() -> PcaDoc {
    let mut mean = vec![0.0; 24];
    mean[0] = 0.01;
    mean[5] = -0.02;
    PcaDoc {
        mean,
        components: COMPONENTS.iter().map(|row| row.to_vec()).collect(),
        explained_variance: None,
        whiten: false,
    }
}

pub fn svr_doc() -> RegressorDoc {
    RegressorDoc::Svr {
        kernel: Kernel::Rbf { gamma: 0.25 },
        support_vectors: vec![
            vec![0.0, 0.0, 0.0],
            vec![1.5, -0.5, 0.8],
            vec![-1.2, 0.9, -0.3],
            vec![0.4, 1.1, 1.6],
            vec![-0.7, -1.3, 0.2],
        ],
        dual_coef: vec![38.0, 42.5, -27.0, 18.0, -31.5],
        intercept: 96.0,
    }
}

/// Write the three fixture artifacts under the default file names.
pub fn write_artifacts(dir: &Path) {
    write_json(&dir.join("scaler.json"), &scaler_doc(true));
    write_json(&dir.join("pca_model.json"), &pca_doc());
    write_json(&dir.join("model_rbf.json"), &svr_doc());
}

pub fn write_json<T: serde::Serialize>(path: &Path, doc: &T) {
    fs::write(path, serde_json::to_vec_pretty(doc).unwrap()).unwrap();
}

/// Default configuration pointed at `dir`.
pub fn cfg(dir: &Path) -> AppCfg {
    AppCfg::from_lookup(|_| None).unwrap().with_artifact_root(dir)
}
