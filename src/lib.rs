pub mod beats;
pub mod config;
pub mod cube;
pub mod field;
pub mod scene;
pub mod tuning;
