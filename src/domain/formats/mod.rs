pub mod json_format;
pub mod mps_format;

pub use json_format::JsonFormat;
pub use mps_format::MpsFormat;
