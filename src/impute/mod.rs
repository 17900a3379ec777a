pub mod groupwise;
pub mod knn;
pub mod median;
