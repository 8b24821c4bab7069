//! Filesystem repository for pre-fitted artifacts.

use std::fs;
use std::path::PathBuf;

use crate::common::config::AppCfg;
use crate::common::error::{PriceError, PriceResult};

use super::domain::{ArtifactKind, ArtifactRepo, RawArtifact};

/// Artifacts stored as individual files under one directory.
pub struct FsArtifactRepo {
    root: PathBuf,
    scaler_file: String,
    projector_file: String,
    regressor_file: String,
}

impl FsArtifactRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self {
            root: cfg.artifact_root.clone(),
            scaler_file: cfg.scaler_file.clone(),
            projector_file: cfg.projector_file.clone(),
            regressor_file: cfg.regressor_file.clone(),
        }
    }

    pub fn artifact_path(&self, kind: ArtifactKind) -> PathBuf {
        let file = match kind {
            ArtifactKind::Scaler => &self.scaler_file,
            ArtifactKind::Projector => &self.projector_file,
            ArtifactKind::Regressor => &self.regressor_file,
        };
        self.root.join(file)
    }
}

impl ArtifactRepo for FsArtifactRepo {
    fn fetch(&self, kind: ArtifactKind) -> PriceResult<RawArtifact> {
        let path = self.artifact_path(kind);
        let bytes = fs::read(&path).map_err(|err| {
            log::warn!(target: "artifacts", "cannot read {kind} at {}: {err}", path.display());
            PriceError::load(kind.as_str(), err)
        })?;
        Ok(RawArtifact {
            kind,
            location: path.display().to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::LoadFault;

    fn cfg(root: &std::path::Path) -> AppCfg {
        AppCfg::from_lookup(|_| None).unwrap().with_artifact_root(root)
    }

    #[test]
    fn resolves_configured_file_names() {
        let repo = FsArtifactRepo::new(&cfg(std::path::Path::new("/srv/models")));
        assert_eq!(
            repo.artifact_path(ArtifactKind::Regressor),
            PathBuf::from("/srv/models/model_rbf.json")
        );
        assert_eq!(
            repo.artifact_path(ArtifactKind::Projector),
            PathBuf::from("/srv/models/pca_model.json")
        );
    }

    #[test]
    fn reads_bytes_and_location() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("scaler.json"), b"{}").unwrap();
        let raw = FsArtifactRepo::new(&cfg(dir.path()))
            .fetch(ArtifactKind::Scaler)
            .unwrap();
        assert_eq!(raw.bytes, b"{}");
        assert!(raw.location.ends_with("scaler.json"));
    }

    #[test]
    fn missing_file_is_an_artifact_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsArtifactRepo::new(&cfg(dir.path()))
            .fetch(ArtifactKind::Scaler)
            .unwrap_err();
        assert!(matches!(
            err,
            PriceError::ArtifactLoad {
                fault: LoadFault::Io(_),
                ..
            }
        ));
        assert!(err.is_fatal());
    }
}
