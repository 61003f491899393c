//! Unit vocabulary: the closed set of units, their families and multipliers.

use std::fmt;

/// Group of units that share a convertible basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Mass,
    Volume,
}

impl UnitFamily {
    /// The unit every other unit of the family is expressed against.
    pub fn base(self) -> ValidUnit {
        match self {
            UnitFamily::Mass => ValidUnit::Kg,
            UnitFamily::Volume => ValidUnit::L,
        }
    }
}

/// Every unit the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidUnit {
    Kg,
    G,
    L,
    Dl,
    Ml,
}

impl ValidUnit {
    pub const ALL: [ValidUnit; 5] = [
        ValidUnit::Kg,
        ValidUnit::G,
        ValidUnit::L,
        ValidUnit::Dl,
        ValidUnit::Ml,
    ];

    /// Resolve a user token such as `"KG"` or `"ml"` to a unit.
    pub fn from_token(token: &str) -> Option<ValidUnit> {
        let token = token.to_lowercase();
        Self::ALL.into_iter().find(|unit| unit.symbol() == token)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ValidUnit::Kg => "kg",
            ValidUnit::G => "g",
            ValidUnit::L => "l",
            ValidUnit::Dl => "dl",
            ValidUnit::Ml => "ml",
        }
    }

    pub fn family(self) -> UnitFamily {
        match self {
            ValidUnit::Kg | ValidUnit::G => UnitFamily::Mass,
            ValidUnit::L | ValidUnit::Dl | ValidUnit::Ml => UnitFamily::Volume,
        }
    }

    /// How many of this unit make up one base unit of its family.
    pub fn multiplier(self) -> f64 {
        match self {
            ValidUnit::Kg => 1.0,
            ValidUnit::G => 1000.0,
            ValidUnit::L => 1.0,
            ValidUnit::Dl => 10.0,
            ValidUnit::Ml => 1000.0,
        }
    }

    pub fn is_compatible_with(self, other: ValidUnit) -> bool {
        self.family() == other.family()
    }
}

impl fmt::Display for ValidUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol().to_uppercase())
    }
}

/// Physical state tag carried by recipe measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngredientType {
    Solid,
    Liquid,
}

impl IngredientType {
    pub fn family(self) -> UnitFamily {
        match self {
            IngredientType::Solid => UnitFamily::Mass,
            IngredientType::Liquid => UnitFamily::Volume,
        }
    }

    pub fn for_unit(unit: ValidUnit) -> IngredientType {
        match unit.family() {
            UnitFamily::Mass => IngredientType::Solid,
            UnitFamily::Volume => IngredientType::Liquid,
        }
    }
}
