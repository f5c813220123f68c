//! Feature Vector Assembly

use crate::descriptor::{FieldValue, VehicleDescriptor};
use crate::error::EncodeError;
use crate::labels::{FUEL_TYPE_LABELS, TRANSMISSION_LABELS, VEHICLE_CLASS_LABELS};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features the model and scaler were fit on
pub const FEATURE_DIMENSION: usize = 9;

/// Column names of the encoded vector
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "vehicle_class",
    "engine_size",
    "cylinders",
    "transmission",
    "co2_rating",
    "fuel_D",
    "fuel_E",
    "fuel_X",
    "fuel_Z",
];

/// How a field contributes to the vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Value appended unchanged
    Numeric,
    /// Label replaced by its position in the table
    Ordinal(&'static [&'static str]),
    /// One slot per label, exactly one set. Terminates encoding.
    OneHot(&'static [&'static str]),
}

/// A named field in the encoding schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Field order used at training time. The one-hot field must stay last.
pub const VEHICLE_SCHEMA: [FieldSpec; 6] = [
    FieldSpec {
        name: "vehicle_class",
        kind: FieldKind::Ordinal(&VEHICLE_CLASS_LABELS),
    },
    FieldSpec {
        name: "engine_size",
        kind: FieldKind::Numeric,
    },
    FieldSpec {
        name: "cylinders",
        kind: FieldKind::Numeric,
    },
    FieldSpec {
        name: "transmission",
        kind: FieldKind::Ordinal(&TRANSMISSION_LABELS),
    },
    FieldSpec {
        name: "co2_rating",
        kind: FieldKind::Numeric,
    },
    FieldSpec {
        name: "fuel_type",
        kind: FieldKind::OneHot(&FUEL_TYPE_LABELS),
    },
];

/// Encoded feature vector for ML inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Build from a slice, rejecting any width other than `FEATURE_DIMENSION`
    pub fn from_slice(values: &[f64]) -> Result<Self, EncodeError> {
        let values: [f64; FEATURE_DIMENSION] =
            values.try_into().map_err(|_| EncodeError::ShapeMismatch {
                expected: FEATURE_DIMENSION,
                actual: values.len(),
            })?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.values
    }

    /// Single-row matrix of shape (1, FEATURE_DIMENSION)
    pub fn to_row_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_DIMENSION), |(_, col)| self.values[col])
    }
}

/// Encoder from field values to a `FeatureVector`
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Vec<FieldSpec>,
}

impl FeatureEncoder {
    /// Encoder using the training-time schema
    pub fn new() -> Self {
        Self::with_schema(VEHICLE_SCHEMA.to_vec())
    }

    /// Encoder over an arbitrary field order
    pub fn with_schema(schema: Vec<FieldSpec>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &[FieldSpec] {
        &self.schema
    }

    /// Encode a typed descriptor
    pub fn encode(&self, descriptor: &VehicleDescriptor) -> Result<FeatureVector, EncodeError> {
        self.encode_fields(&descriptor.fields())
    }

    /// Encode field values walked in schema order.
    ///
    /// Numeric fields are appended unchanged, ordinal fields append their
    /// table index and the one-hot field appends its block and stops the
    /// walk. Anything left in `values` after that point is never read.
    pub fn encode_fields(&self, values: &[FieldValue]) -> Result<FeatureVector, EncodeError> {
        let mut out = Vec::with_capacity(FEATURE_DIMENSION);

        for (idx, field) in self.schema.iter().enumerate() {
            let value = values.get(idx).ok_or(EncodeError::MissingField(field.name))?;

            match (field.kind, value) {
                (FieldKind::Numeric, FieldValue::Number(v)) => out.push(*v),
                (FieldKind::Numeric, FieldValue::Label(label)) => {
                    return Err(EncodeError::UnexpectedLabel {
                        field: field.name,
                        label: label.clone(),
                    });
                }
                (FieldKind::Ordinal(_) | FieldKind::OneHot(_), FieldValue::Number(v)) => {
                    return Err(EncodeError::UnexpectedNumber {
                        field: field.name,
                        value: *v,
                    });
                }
                (FieldKind::Ordinal(labels), FieldValue::Label(label)) => {
                    out.push(lookup(field.name, labels, label)? as f64);
                }
                (FieldKind::OneHot(labels), FieldValue::Label(label)) => {
                    let hot = lookup(field.name, labels, label)?;
                    out.extend((0..labels.len()).map(|slot| if slot == hot { 1.0 } else { 0.0 }));
                    break;
                }
            }
        }

        debug!("Encoded {} features", out.len());
        FeatureVector::from_slice(&out)
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup(field: &'static str, labels: &[&str], label: &str) -> Result<usize, EncodeError> {
    labels
        .iter()
        .position(|l| *l == label)
        .ok_or_else(|| EncodeError::UnknownLabel {
            field,
            label: label.to_string(),
        })
}
