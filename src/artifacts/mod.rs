//! Pre-fitted artifacts: stage types, their on-disk documents and storage.

pub mod codec;
pub mod domain;
pub mod repo_fs;

pub use domain::{
    ArtifactKind, ArtifactRepo, Kernel, Pca, RawArtifact, Regress, Regressor, StandardScaler,
    Transform,
};
pub use repo_fs::FsArtifactRepo;
