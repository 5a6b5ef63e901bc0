//! Compiled contract artifacts on disk.

use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::deploy::error::{DeployError, DeployResult};

/// A compiled contract read from `<dir>/<name>.wasm`.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub wasm: Vec<u8>,
}

impl Artifact {
    /// Conventional location of an artifact.
    pub fn path_for(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.wasm", name))
    }

    /// Read an artifact. A missing file is [`DeployError::ArtifactNotFound`].
    pub async fn load(dir: &Path, name: &str) -> DeployResult<Self> {
        let path = Self::path_for(dir, name);
        let wasm = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DeployError::ArtifactNotFound(path));
            }
            Err(source) => return Err(DeployError::ArtifactRead { path, source }),
        };

        Ok(Self {
            name: name.to_string(),
            path,
            wasm,
        })
    }

    /// Hex SHA-256 of the bytecode; matches the checksum the chain records.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(&self.wasm))
    }
}
