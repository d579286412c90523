//! # BMI Calculator
//!
//! Normalizes height/weight across unit systems, computes BMI and derived
//! health metrics (BMI prime, ponderal index, healthy weight range), and
//! classifies the result against the fixed WHO-style cut points.
//!
//! Unlike formulas, this function validates its inputs and fails loudly:
//! the engine catches the error at the per-entry boundary and the entry
//! simply contributes nothing to the result.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Centimeters, Feet, Inches, Kilograms, Meters, Pounds, Stone};

const BMI_UNDERWEIGHT_MAX: f64 = 18.5;
const BMI_NORMAL_MAX: f64 = 25.0;
const BMI_OVERWEIGHT_MAX: f64 = 30.0;

/// Height input unit. The combined units take a secondary component
/// (inches for `ft_in`, centimeters for `m_cm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    #[default]
    Cm,
    M,
    In,
    Ft,
    FtIn,
    MCm,
}

impl HeightUnit {
    /// Parse a selector string; unknown selectors fall back to centimeters.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "m" => HeightUnit::M,
            "in" => HeightUnit::In,
            "ft" => HeightUnit::Ft,
            "ft_in" => HeightUnit::FtIn,
            "m_cm" => HeightUnit::MCm,
            _ => HeightUnit::Cm,
        }
    }
}

/// Weight input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
    St,
}

impl WeightUnit {
    /// Parse a selector string; unknown selectors fall back to kilograms.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "lb" => WeightUnit::Lb,
            "st" => WeightUnit::St,
            _ => WeightUnit::Kg,
        }
    }
}

/// BMI classification per the fixed WHO-style cut points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl BmiStatus {
    fn classify(bmi: f64) -> Self {
        if bmi < BMI_UNDERWEIGHT_MAX {
            BmiStatus::Underweight
        } else if bmi < BMI_NORMAL_MAX {
            BmiStatus::Normal
        } else if bmi < BMI_OVERWEIGHT_MAX {
            BmiStatus::Overweight
        } else {
            BmiStatus::Obesity
        }
    }

    /// Result-map text for this classification
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "underweight",
            BmiStatus::Normal => "normal",
            BmiStatus::Overweight => "overweight",
            BmiStatus::Obesity => "obesity",
        }
    }
}

/// Input parameters for the BMI calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "age": 30,
///   "height_unit": "ft_in",
///   "weight_unit": "lb",
///   "height": 5,
///   "height_secondary": 10,
///   "weight": 160
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiInput {
    /// Age in years, accepted range 2..=120
    pub age: f64,

    #[serde(default)]
    pub height_unit: HeightUnit,

    #[serde(default)]
    pub weight_unit: WeightUnit,

    /// Primary height component in `height_unit`
    pub height: Option<f64>,

    /// Secondary height component: inches for `ft_in`, centimeters for
    /// `m_cm`; ignored for single-component units
    #[serde(default)]
    pub height_secondary: Option<f64>,

    /// Weight in `weight_unit`
    pub weight: Option<f64>,
}

impl BmiInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(2.0..=120.0).contains(&self.age) {
            return Err(CalcError::invalid_input(
                "age",
                self.age.to_string(),
                "Age must be between 2 and 120",
            ));
        }
        if self.height.is_none() {
            return Err(CalcError::missing_field("height"));
        }
        if self.weight.is_none() {
            return Err(CalcError::missing_field("weight"));
        }
        let height_m = self.height_meters().0;
        if height_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "height",
                height_m.to_string(),
                "Height must be positive",
            ));
        }
        let weight_kg = self.weight_kilograms().0;
        if weight_kg <= 0.0 {
            return Err(CalcError::invalid_input(
                "weight",
                weight_kg.to_string(),
                "Weight must be positive",
            ));
        }
        Ok(())
    }

    /// Height normalized to meters. A missing secondary component reads
    /// as zero (e.g. "6 ft" with no inches).
    pub fn height_meters(&self) -> Meters {
        let primary = self.height.unwrap_or(0.0);
        let secondary = self.height_secondary.unwrap_or(0.0);
        match self.height_unit {
            HeightUnit::Cm => Centimeters(primary).into(),
            HeightUnit::M => Meters(primary),
            HeightUnit::In => Inches(primary).into(),
            HeightUnit::Ft => Feet(primary).into(),
            HeightUnit::FtIn => Meters::from(Feet(primary)) + Meters::from(Inches(secondary)),
            HeightUnit::MCm => Meters(primary) + Meters::from(Centimeters(secondary)),
        }
    }

    /// Weight normalized to kilograms.
    pub fn weight_kilograms(&self) -> Kilograms {
        let value = self.weight.unwrap_or(0.0);
        match self.weight_unit {
            WeightUnit::Kg => Kilograms(value),
            WeightUnit::Lb => Pounds(value).into(),
            WeightUnit::St => Stone(value).into(),
        }
    }

    /// Express kilograms back in this input's weight unit.
    fn kilograms_to_weight_unit(&self, kg: Kilograms) -> f64 {
        match self.weight_unit {
            WeightUnit::Kg => kg.0,
            WeightUnit::Lb => Pounds::from(kg).0,
            WeightUnit::St => Stone::from(kg).0,
        }
    }
}

/// Results from the BMI calculation.
///
/// All numeric fields carry fixed rounding: BMI, the healthy-weight bounds
/// and the target delta to 1 decimal, BMI prime and the ponderal index to
/// 2, normalized height to 3 and weight to 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    /// Body mass index: weight_kg / height_m²
    pub bmi: f64,

    /// Classification against the fixed cut points
    pub bmi_status: BmiStatus,

    /// bmi / 25 (1.0 marks the top of the normal range)
    pub bmi_prime: f64,

    /// weight_kg / height_m³
    pub ponderal_index: f64,

    /// Lower bound of the healthy range, in the caller's weight unit
    pub healthy_weight_min: f64,

    /// Upper bound of the healthy range, in the caller's weight unit
    pub healthy_weight_max: f64,

    /// Deficit to the healthy minimum (underweight) or excess above the
    /// healthy maximum (overweight/obese), in the caller's weight unit;
    /// zero inside the healthy range
    pub weight_to_target: f64,

    /// Normalized height in meters
    pub height_m: f64,

    /// Normalized weight in kilograms
    pub weight_kg: f64,
}

/// Calculate BMI and derived metrics.
///
/// # Arguments
///
/// * `input` - Height, weight, units, and age
///
/// # Returns
///
/// * `Ok(BmiResult)` - Calculation results
/// * `Err(CalcError)` - If inputs are invalid
pub fn bmi_calculator(input: &BmiInput) -> CalcResult<BmiResult> {
    input.validate()?;

    let height_m = input.height_meters().0;
    let weight_kg = input.weight_kilograms().0;

    let bmi = weight_kg / (height_m * height_m);
    let status = BmiStatus::classify(bmi);

    let healthy_min_kg = Kilograms(BMI_UNDERWEIGHT_MAX * height_m * height_m);
    let healthy_max_kg = Kilograms(BMI_NORMAL_MAX * height_m * height_m);

    let weight_to_target_kg = match status {
        BmiStatus::Underweight => healthy_min_kg.0 - weight_kg,
        BmiStatus::Overweight | BmiStatus::Obesity => weight_kg - healthy_max_kg.0,
        BmiStatus::Normal => 0.0,
    };

    Ok(BmiResult {
        bmi: round_to(bmi, 1),
        bmi_status: status,
        bmi_prime: round_to(bmi / BMI_NORMAL_MAX, 2),
        ponderal_index: round_to(weight_kg / (height_m * height_m * height_m), 2),
        healthy_weight_min: round_to(input.kilograms_to_weight_unit(healthy_min_kg), 1),
        healthy_weight_max: round_to(input.kilograms_to_weight_unit(healthy_max_kg), 1),
        weight_to_target: round_to(
            input.kilograms_to_weight_unit(Kilograms(weight_to_target_kg)),
            1,
        ),
        height_m: round_to(height_m, 3),
        weight_kg: round_to(weight_kg, 2),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
