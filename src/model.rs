use std::path::{Path, PathBuf};

use crate::error::CaptureError;

/// Pre-trained garment detector weights. Loading is kept for parity with the
/// planned model-based detector, but nothing consults the weights yet: every
/// frame goes through the color/contour heuristic.
pub struct DetectorModel {
    path: PathBuf,
    weights: Vec<u8>,
}

impl DetectorModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let weights = std::fs::read(&path).map_err(|source| CaptureError::ModelLoad {
            path: path.clone(),
            source,
        })?;

        if weights.is_empty() {
            return Err(CaptureError::ModelLoad {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "model file is empty",
                ),
            });
        }

        log::info!(
            "Detector model loaded from {} ({} bytes)",
            path.display(),
            weights.len()
        );
        Ok(Self { path, weights })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> usize {
        self.weights.len()
    }
}
