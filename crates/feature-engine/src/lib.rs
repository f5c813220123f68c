//! Feature Engineering Engine
//!
//! Encodes a vehicle description into the fixed-width numeric vector the
//! fuel consumption model and its scaler were fit on.

mod descriptor;
mod error;
mod features;
mod labels;

pub use descriptor::{FieldValue, RawDescriptor, VehicleDescriptor};
pub use error::EncodeError;
pub use features::{
    FeatureEncoder, FeatureVector, FieldKind, FieldSpec, FEATURE_DIMENSION, FEATURE_NAMES,
    VEHICLE_SCHEMA,
};
pub use labels::{
    ArtifactCategories, Categorical, FuelType, LabelTables, Transmission, VehicleClass,
    FUEL_TYPE_LABELS, TRANSMISSION_LABELS, VEHICLE_CLASS_LABELS,
};
