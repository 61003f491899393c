//! Measurement and ingredient value objects.

use crate::converter::{self, Quantity, round_two_decimals};
use crate::error::UnitError;
use crate::unit::{IngredientType, ValidUnit};
use chrono::NaiveDate;
use std::fmt;

/// Normalized identity of an ingredient name: lower case, whitespace runs
/// folded to one space, no leading or trailing whitespace.
pub fn identity_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// "olive  OIL" -> "Olive Oil".
pub fn capitalize_each_word(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn check_non_negative(amount: f64) -> Result<f64, UnitError> {
    if amount < 0.0 || amount.is_nan() {
        Err(UnitError::NegativeAmount(amount))
    } else {
        Ok(amount)
    }
}

/// A named amount, used for recipe requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    name: String,
    amount: f64,
    unit: ValidUnit,
    ingredient_type: Option<IngredientType>,
}

impl Measurement {
    pub fn new(name: impl Into<String>, amount: f64, unit: ValidUnit) -> Result<Self, UnitError> {
        Ok(Self {
            name: name.into(),
            amount: check_non_negative(amount)?,
            unit,
            ingredient_type: None,
        })
    }

    /// Tag the measurement as solid or liquid.
    pub fn with_type(mut self, ingredient_type: IngredientType) -> Self {
        self.ingredient_type = Some(ingredient_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        identity_key(&self.name)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> ValidUnit {
        self.unit
    }

    pub fn ingredient_type(&self) -> Option<IngredientType> {
        self.ingredient_type
    }
}

impl Quantity for Measurement {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn unit(&self) -> ValidUnit {
        self.unit
    }

    fn set_quantity(&mut self, amount: f64, unit: ValidUnit) {
        self.amount = amount;
        self.unit = unit;
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2} {}",
            capitalize_each_word(&self.name),
            self.amount,
            self.unit
        )
    }
}

/// A stored lot of one ingredient with a single expiry date.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    name: String,
    amount: f64,
    unit: ValidUnit,
    value: f64,
    expiry_date: NaiveDate,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        unit: ValidUnit,
        value: f64,
        expiry_date: NaiveDate,
    ) -> Result<Self, UnitError> {
        Ok(Self {
            name: name.into(),
            amount: check_non_negative(amount)?,
            unit,
            value: check_non_negative(value)?,
            expiry_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity key used for storage lookup.
    pub fn key(&self) -> String {
        identity_key(&self.name)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> ValidUnit {
        self.unit
    }

    /// Total value of this lot.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Price per kilogram or litre, derived from the lot value.
    pub fn price_per_standard_unit(&self) -> f64 {
        if self.amount == 0.0 {
            return 0.0;
        }
        converter::standard_unit_price(self.unit, self.value / self.amount)
    }

    /// Fold `other` into this lot, keeping this lot's unit and expiry date.
    pub fn merge(&mut self, other: &Ingredient) -> Result<(), UnitError> {
        let incoming = converter::convert(other.amount, other.unit, self.unit)?;
        self.amount = round_two_decimals(self.amount + incoming);
        self.value = round_two_decimals(self.value + other.value);
        Ok(())
    }
}

impl Quantity for Ingredient {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn unit(&self) -> ValidUnit {
        self.unit
    }

    fn set_quantity(&mut self, amount: f64, unit: ValidUnit) {
        self.amount = amount;
        self.unit = unit;
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2} {}, value {:.2}, expires {}",
            capitalize_each_word(&self.name),
            self.amount,
            self.unit,
            self.value,
            self.expiry_date
        )
    }
}
