//! Categorical Label Tables
//!
//! The label order in each table is the order the fuel model was trained
//! with. Ordinals and one-hot slots are positions in these tables.

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Vehicle class labels (ordinal-encoded)
pub const VEHICLE_CLASS_LABELS: [&str; 14] = [
    "Two-seater",
    "Minicompact",
    "Compact",
    "Subcompact",
    "Mid-size",
    "Full-size",
    "SUV: Small",
    "SUV: Standard",
    "Minivan",
    "Station wagon: Small",
    "Station wagon: Mid-size",
    "Pickup truck: Small",
    "Special purpose vehicle",
    "Pickup truck: Standard",
];

/// Transmission labels (ordinal-encoded)
pub const TRANSMISSION_LABELS: [&str; 5] = ["AV", "AM", "M", "AS", "A"];

/// Fuel type labels (one-hot encoded)
pub const FUEL_TYPE_LABELS: [&str; 4] = ["D", "E", "X", "Z"];

/// A closed set of labels with a fixed position for each member
pub trait Categorical: Copy + Sized + 'static {
    /// Field name used in errors and artifact metadata
    const FIELD: &'static str;
    /// Labels in training order
    const LABELS: &'static [&'static str];
    /// Variants in training order
    const ALL: &'static [Self];

    /// Position of this value in `LABELS`
    fn ordinal(self) -> usize;

    /// Label as it appeared in the training data
    fn label(self) -> &'static str {
        Self::LABELS[self.ordinal()]
    }

    /// Exact, case-sensitive lookup
    fn from_label(label: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .position(|l| *l == label)
            .map(|idx| Self::ALL[idx])
    }
}

/// Vehicle class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "Two-seater")]
    TwoSeater,
    #[serde(rename = "Minicompact")]
    Minicompact,
    #[serde(rename = "Compact")]
    Compact,
    #[serde(rename = "Subcompact")]
    Subcompact,
    #[serde(rename = "Mid-size")]
    MidSize,
    #[serde(rename = "Full-size")]
    FullSize,
    #[serde(rename = "SUV: Small")]
    SuvSmall,
    #[serde(rename = "SUV: Standard")]
    SuvStandard,
    #[serde(rename = "Minivan")]
    Minivan,
    #[serde(rename = "Station wagon: Small")]
    StationWagonSmall,
    #[serde(rename = "Station wagon: Mid-size")]
    StationWagonMidSize,
    #[serde(rename = "Pickup truck: Small")]
    PickupTruckSmall,
    #[serde(rename = "Special purpose vehicle")]
    SpecialPurpose,
    #[serde(rename = "Pickup truck: Standard")]
    PickupTruckStandard,
}

impl Categorical for VehicleClass {
    const FIELD: &'static str = "vehicle_class";
    const LABELS: &'static [&'static str] = &VEHICLE_CLASS_LABELS;
    const ALL: &'static [Self] = &[
        VehicleClass::TwoSeater,
        VehicleClass::Minicompact,
        VehicleClass::Compact,
        VehicleClass::Subcompact,
        VehicleClass::MidSize,
        VehicleClass::FullSize,
        VehicleClass::SuvSmall,
        VehicleClass::SuvStandard,
        VehicleClass::Minivan,
        VehicleClass::StationWagonSmall,
        VehicleClass::StationWagonMidSize,
        VehicleClass::PickupTruckSmall,
        VehicleClass::SpecialPurpose,
        VehicleClass::PickupTruckStandard,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Transmission type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    /// Continuously variable
    #[serde(rename = "AV")]
    ContinuouslyVariable,
    /// Automated manual
    #[serde(rename = "AM")]
    AutomatedManual,
    #[serde(rename = "M")]
    Manual,
    /// Automatic with select shift
    #[serde(rename = "AS")]
    SelectShift,
    #[serde(rename = "A")]
    Automatic,
}

impl Categorical for Transmission {
    const FIELD: &'static str = "transmission";
    const LABELS: &'static [&'static str] = &TRANSMISSION_LABELS;
    const ALL: &'static [Self] = &[
        Transmission::ContinuouslyVariable,
        Transmission::AutomatedManual,
        Transmission::Manual,
        Transmission::SelectShift,
        Transmission::Automatic,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "D")]
    Diesel,
    #[serde(rename = "E")]
    Ethanol,
    /// Regular gasoline
    #[serde(rename = "X")]
    RegularGasoline,
    /// Premium gasoline
    #[serde(rename = "Z")]
    PremiumGasoline,
}

impl Categorical for FuelType {
    const FIELD: &'static str = "fuel_type";
    const LABELS: &'static [&'static str] = &FUEL_TYPE_LABELS;
    const ALL: &'static [Self] = &[
        FuelType::Diesel,
        FuelType::Ethanol,
        FuelType::RegularGasoline,
        FuelType::PremiumGasoline,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}

macro_rules! impl_label_traits {
    ($($ty:ty),*) => {
        $(
            impl FromStr for $ty {
                type Err = EncodeError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty>::from_label(s).ok_or_else(|| EncodeError::UnknownLabel {
                        field: <$ty>::FIELD,
                        label: s.to_string(),
                    })
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

impl_label_traits!(VehicleClass, Transmission, FuelType);

/// Category lists as declared by a trained artifact, keyed by field name
pub type ArtifactCategories = BTreeMap<String, Vec<String>>;

/// The built-in label tables
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelTables;

impl LabelTables {
    /// Label table for a field, if the field is categorical
    pub fn table(field: &str) -> Option<&'static [&'static str]> {
        if field == VehicleClass::FIELD {
            Some(VehicleClass::LABELS)
        } else if field == Transmission::FIELD {
            Some(Transmission::LABELS)
        } else if field == FuelType::FIELD {
            Some(FuelType::LABELS)
        } else {
            None
        }
    }

    /// Check that categories baked into an artifact match the built-in
    /// tables exactly, including order.
    pub fn validate_against(categories: &ArtifactCategories) -> Result<(), EncodeError> {
        for (field, declared) in categories {
            let expected = Self::table(field)
                .ok_or_else(|| EncodeError::UnknownCategoryField(field.clone()))?;

            if declared.len() != expected.len()
                || declared.iter().zip(expected).any(|(d, e)| d != e)
            {
                return Err(EncodeError::CategoryMismatch {
                    field: field.clone(),
                    expected: expected.iter().map(|s| s.to_string()).collect(),
                    actual: declared.clone(),
                });
            }
        }
        Ok(())
    }

    /// Built-in tables in artifact form
    pub fn as_categories() -> ArtifactCategories {
        [
            (VehicleClass::FIELD, VehicleClass::LABELS),
            (Transmission::FIELD, Transmission::LABELS),
            (FuelType::FIELD, FuelType::LABELS),
        ]
        .into_iter()
        .map(|(field, labels)| {
            (
                field.to_string(),
                labels.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
    }
}
