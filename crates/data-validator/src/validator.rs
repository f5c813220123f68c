//! Input Range Validation

use crate::error::ValidationError;
use feature_engine::VehicleDescriptor;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Accepted input ranges (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Engine size range (litres)
    pub engine_size_range: (f64, f64),
    /// Cylinder count range
    pub cylinders_range: (u32, u32),
    /// CO2 rating range
    pub co2_rating_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            engine_size_range: (0.0, 10.0),
            cylinders_range: (0, 16),
            co2_rating_range: (0.0, 10.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Convert into the first error, if any
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Range validator for the numeric descriptor fields
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate engine size
    pub fn validate_engine_size(&self, litres: f64) -> Result<(), ValidationError> {
        self.validate_range("engine_size", litres, self.config.engine_size_range)
    }

    /// Validate cylinder count
    pub fn validate_cylinders(&self, cylinders: u32) -> Result<(), ValidationError> {
        let (min, max) = self.config.cylinders_range;
        self.validate_range("cylinders", cylinders as f64, (min as f64, max as f64))
    }

    /// Validate CO2 rating
    pub fn validate_co2_rating(&self, rating: f64) -> Result<(), ValidationError> {
        self.validate_range("co2_rating", rating, self.config.co2_rating_range)
    }

    /// Validate every numeric field of a descriptor
    pub fn validate_descriptor(&self, descriptor: &VehicleDescriptor) -> ValidationResult {
        let checks = [
            self.validate_engine_size(descriptor.engine_size),
            self.validate_cylinders(descriptor.cylinders),
            self.validate_co2_rating(descriptor.co2_rating),
        ];
        let fields_checked = checks.len();
        let errors: Vec<_> = checks.into_iter().filter_map(Result::err).collect();

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            warn!("Descriptor rejected: {} invalid field(s)", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
