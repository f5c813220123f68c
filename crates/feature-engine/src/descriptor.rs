//! Vehicle Descriptor

use crate::error::EncodeError;
use crate::labels::{Categorical, FuelType, Transmission, VehicleClass};
use serde::{Deserialize, Serialize};

/// One input field before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Categorical label
    Label(String),
    /// Already-numeric value, appended unchanged
    Number(f64),
}

impl From<&str> for FieldValue {
    fn from(label: &str) -> Self {
        FieldValue::Label(label.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Vehicle attributes for a single prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    pub vehicle_class: VehicleClass,
    /// Engine displacement (litres)
    pub engine_size: f64,
    pub cylinders: u32,
    pub transmission: Transmission,
    pub co2_rating: f64,
    pub fuel_type: FuelType,
}

impl VehicleDescriptor {
    /// Fields in encoding order
    pub fn fields(&self) -> [FieldValue; 6] {
        [
            FieldValue::Label(self.vehicle_class.label().to_string()),
            FieldValue::Number(self.engine_size),
            FieldValue::Number(self.cylinders as f64),
            FieldValue::Label(self.transmission.label().to_string()),
            FieldValue::Number(self.co2_rating),
            FieldValue::Label(self.fuel_type.label().to_string()),
        ]
    }
}

/// Descriptor as submitted by a client, with categorical fields still as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDescriptor {
    pub vehicle_class: String,
    pub engine_size: f64,
    pub cylinders: u32,
    pub transmission: String,
    pub co2_rating: f64,
    pub fuel_type: String,
}

impl TryFrom<RawDescriptor> for VehicleDescriptor {
    type Error = EncodeError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            vehicle_class: raw.vehicle_class.parse()?,
            engine_size: raw.engine_size,
            cylinders: raw.cylinders,
            transmission: raw.transmission.parse()?,
            co2_rating: raw.co2_rating,
            fuel_type: raw.fuel_type.parse()?,
        })
    }
}
