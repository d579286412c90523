//! # Unit Types
//!
//! Type-safe wrappers for the body-measurement units the BMI calculator
//! accepts. These provide compile-time safety against unit confusion while
//! remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - The calculators use a small, fixed set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! Base units are metric (meters, kilograms); every other unit converts
//! through them with fixed constants (1 in = 0.0254 m, 1 ft = 0.3048 m,
//! 1 lb = 0.45359237 kg, 1 st = 6.35029318 kg).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Feet, Meters, Pounds, Kilograms};
//!
//! let height = Feet(6.0);
//! let height_m: Meters = height.into();
//! assert!((height_m.0 - 1.8288).abs() < 1e-9);
//!
//! let weight: Kilograms = Pounds(160.0).into();
//! assert!((weight.0 - 72.57).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

const METERS_PER_INCH: f64 = 0.0254;
const METERS_PER_FOOT: f64 = 0.3048;
const KG_PER_POUND: f64 = 0.45359237;
const KG_PER_STONE: f64 = 6.35029318;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Inches> for Meters {
    fn from(inches: Inches) -> Self {
        Meters(inches.0 * METERS_PER_INCH)
    }
}

impl From<Meters> for Inches {
    fn from(m: Meters) -> Self {
        Inches(m.0 / METERS_PER_INCH)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * METERS_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / METERS_PER_FOOT)
    }
}

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Mass in stone (1 st = 14 lb)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stone(pub f64);

impl From<Pounds> for Kilograms {
    fn from(lb: Pounds) -> Self {
        Kilograms(lb.0 * KG_PER_POUND)
    }
}

impl From<Kilograms> for Pounds {
    fn from(kg: Kilograms) -> Self {
        Pounds(kg.0 / KG_PER_POUND)
    }
}

impl From<Stone> for Kilograms {
    fn from(st: Stone) -> Self {
        Kilograms(st.0 * KG_PER_STONE)
    }
}

impl From<Kilograms> for Stone {
    fn from(kg: Kilograms) -> Self {
        Stone(kg.0 / KG_PER_STONE)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Inches);
impl_arithmetic!(Feet);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Pounds);
impl_arithmetic!(Stone);
