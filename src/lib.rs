mod assets;
mod encoding;
mod error;
mod impute;
mod ingest;
mod model;
mod outlier;
mod pipeline;
mod scale;
mod schema;

#[cfg(test)]
mod testutil;

pub use error::RaincastError;
pub use pipeline::{FittedPipelineState, PipelineConfig, WeatherPipeline};

pub use assets::{AssetError, AssetManager};
pub use ingest::read_weather_csv;
pub use model::{split_features_label, BinaryClassifier};

pub use encoding::cyclic::{compass_degrees, degrees_to_pair, month_to_pair};
pub use encoding::label::LocationEncoder;
pub use impute::knn::KnnImputer;
pub use impute::median::MedianImputer;
pub use outlier::IqrCapper;
pub use scale::MinMaxScaler;
pub use schema::ColumnManifest;
