pub mod cyclic;
pub mod label;
