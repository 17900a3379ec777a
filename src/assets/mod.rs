//! Persistence of the fitted pipeline state as bincode blobs on disk.
//!
//! Each fitted component gets its own file so individual blobs can be
//! inspected or diffed, but loading is all-or-nothing: a state with some
//! blobs missing is unusable and surfaces as [`AssetError::MissingBlob`].

mod error;

pub use error::AssetError;

use crate::pipeline::FittedPipelineState;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const ASSET_DIR_NAME: &str = "raincast";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

const MEDIAN_IMPUTER_FILE: &str = "median_imputer.bin";
const KNN_IMPUTER_FILE: &str = "knn_imputer.bin";
const LOCATION_ENCODER_FILE: &str = "location_encoder.bin";
const OUTLIER_CAPS_FILE: &str = "outlier_caps.bin";
const SCALER_FILE: &str = "scaler.bin";
const COLUMN_MANIFEST_FILE: &str = "column_manifest.bin";

/// Reads and writes fitted state blobs under a fixed root directory.
#[derive(Debug, Clone)]
pub struct AssetManager {
    root: PathBuf,
}

impl AssetManager {
    /// Uses an explicit root directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| AssetError::DirCreation(root.clone(), e))?;
        Ok(Self { root })
    }

    /// Uses the platform data directory, e.g. `~/.local/share/raincast`.
    pub fn with_default_root() -> Result<Self, AssetError> {
        let root = dirs::data_dir()
            .ok_or(AssetError::RootResolution)?
            .join(ASSET_DIR_NAME);
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes all six blobs. Existing blobs are overwritten.
    pub fn save(&self, state: &FittedPipelineState) -> Result<(), AssetError> {
        self.write_blob(MEDIAN_IMPUTER_FILE, &state.median_imputer)?;
        self.write_blob(KNN_IMPUTER_FILE, &state.knn_imputer)?;
        self.write_blob(LOCATION_ENCODER_FILE, &state.location_encoder)?;
        self.write_blob(OUTLIER_CAPS_FILE, &state.outlier_caps)?;
        self.write_blob(SCALER_FILE, &state.scaler)?;
        self.write_blob(COLUMN_MANIFEST_FILE, &state.manifest)?;
        info!("saved fitted pipeline state to {}", self.root.display());
        Ok(())
    }

    /// Restores a complete state. Fails if any blob is absent or corrupt.
    pub fn load(&self) -> Result<FittedPipelineState, AssetError> {
        let state = FittedPipelineState {
            median_imputer: self.read_blob(MEDIAN_IMPUTER_FILE)?,
            knn_imputer: self.read_blob(KNN_IMPUTER_FILE)?,
            location_encoder: self.read_blob(LOCATION_ENCODER_FILE)?,
            outlier_caps: self.read_blob(OUTLIER_CAPS_FILE)?,
            scaler: self.read_blob(SCALER_FILE)?,
            manifest: self.read_blob(COLUMN_MANIFEST_FILE)?,
        };
        info!("loaded fitted pipeline state from {}", self.root.display());
        Ok(state)
    }

    fn write_blob<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), AssetError> {
        let path = self.root.join(file_name);
        let bytes = bincode::serde::encode_to_vec(value, BINCODE_CONFIG)
            .map_err(|e| AssetError::Encode(path.clone(), Box::new(e)))?;
        std::fs::write(&path, bytes).map_err(|e| AssetError::Write(path.clone(), e))
    }

    fn read_blob<T: DeserializeOwned>(&self, file_name: &str) -> Result<T, AssetError> {
        let path = self.root.join(file_name);
        if !path.exists() {
            return Err(AssetError::MissingBlob(path));
        }
        let bytes = std::fs::read(&path).map_err(|e| AssetError::Read(path.clone(), e))?;
        let (value, _) = bincode::serde::decode_from_slice::<T, _>(&bytes, BINCODE_CONFIG)
            .map_err(|e| AssetError::Decode(path.clone(), Box::from(e)))?;
        Ok(value)
    }
}
