//! The fitted statistical state shared between training and inference.

use crate::encoding::label::LocationEncoder;
use crate::impute::knn::KnnImputer;
use crate::impute::median::MedianImputer;
use crate::outlier::IqrCapper;
use crate::scale::MinMaxScaler;
use crate::schema::ColumnManifest;
use serde::{Deserialize, Serialize};

/// Everything a transform call needs beyond the batch itself.
///
/// Produced by a completed fit pass, persisted by the asset manager, loaded
/// once per inference process and never mutated afterwards. Transform takes
/// it by shared reference, so concurrent transform calls over one loaded
/// state need no locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipelineState {
    /// Unit A: per-column medians for the time-series field group.
    pub median_imputer: MedianImputer,
    /// Unit B: neighbor model for cloud/evaporation/sunshine fields.
    pub knn_imputer: KnnImputer,
    /// Frozen location vocabulary.
    pub location_encoder: LocationEncoder,
    /// Fit-time IQR cap bounds, applied identically at inference.
    pub outlier_caps: IqrCapper,
    /// Per-feature min/max scaling bounds.
    pub scaler: MinMaxScaler,
    /// Fit-time input schema and fixed output column order.
    pub manifest: ColumnManifest,
}
