//! Conversion between units of the same family.
//!
//! Every conversion goes through the family base: the amount is first divided by
//! the source multiplier, then scaled by the target multiplier, then rounded to
//! two decimals. Adding a unit to a family only needs its base multiplier.

use crate::error::UnitError;
use crate::ingredient::{Ingredient, Measurement};
use crate::unit::ValidUnit;

/// Anything that carries an amount in a unit and can be rewritten in place.
pub trait Quantity {
    fn amount(&self) -> f64;
    fn unit(&self) -> ValidUnit;
    fn set_quantity(&mut self, amount: f64, unit: ValidUnit);
}

/// Round half-up to two decimals. Quantities and prices share this rule.
pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Convert `amount` expressed in `from` into `to`.
pub fn convert(amount: f64, from: ValidUnit, to: ValidUnit) -> Result<f64, UnitError> {
    if !from.is_compatible_with(to) {
        return Err(UnitError::IncompatibleUnits { from, to });
    }
    let in_base = amount / from.multiplier();
    Ok(round_two_decimals(in_base * to.multiplier()))
}

/// Rewrite `quantity` in `target`, failing when the families differ.
pub fn auto_merge_unit<Q: Quantity + ?Sized>(
    quantity: &mut Q,
    target: ValidUnit,
) -> Result<(), UnitError> {
    let amount = convert(quantity.amount(), quantity.unit(), target)?;
    quantity.set_quantity(amount, target);
    Ok(())
}

pub fn convert_ingredient(ingredient: &mut Ingredient, target: ValidUnit) -> Result<(), UnitError> {
    auto_merge_unit(ingredient, target)
}

/// Express a measurement in the base unit of the family named by its
/// ingredient-type tag.
///
/// A measurement without a tag is left untouched. A tag that disagrees with the
/// unit family is reported as [`UnitError::IncompatibleUnits`].
pub fn convert_to_standard(measurement: &mut Measurement) -> Result<(), UnitError> {
    match measurement.ingredient_type() {
        Some(kind) => auto_merge_unit(measurement, kind.family().base()),
        None => Ok(()),
    }
}

/// Scale a price per `unit` to a price per base unit of the same family.
pub fn standard_unit_price(unit: ValidUnit, unit_price: f64) -> f64 {
    round_two_decimals(unit.multiplier() * unit_price)
}
