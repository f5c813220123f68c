//! Data Validation and Scaling
//!
//! Range checks for user-supplied vehicle attributes and the standard
//! scaler applied to encoded features before inference.

mod error;
mod scaler;
mod validator;

pub use error::{ScalerError, ValidationError};
pub use scaler::{ScalerArtifact, StandardScaler};
pub use validator::{ValidationConfig, ValidationResult, Validator};
