//! HTTP Routes

pub mod options;
pub mod predictions;
pub mod trips;
