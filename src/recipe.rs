use crate::converter;
use crate::error::UnitError;
use crate::ingredient::{Measurement, capitalize_each_word, identity_key};
use std::collections::BTreeMap;
use std::fmt;

/// A named list of required measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    name: String,
    requirements: Vec<Measurement>,
}

impl Recipe {
    /// Build a recipe, expressing each typed requirement in its family's base
    /// unit.
    pub fn new(name: impl Into<String>, requirements: Vec<Measurement>) -> Result<Self, UnitError> {
        let mut requirements = requirements;
        for requirement in &mut requirements {
            converter::convert_to_standard(requirement)?;
        }
        Ok(Self {
            name: name.into(),
            requirements,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[Measurement] {
        &self.requirements
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", capitalize_each_word(&self.name))?;
        for requirement in &self.requirements {
            write!(f, "\n    {requirement}")?;
        }
        Ok(())
    }
}

/// Recipes keyed by identity key.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeBook {
    /// Insert `recipe`, returning the one it replaced.
    pub fn add(&mut self, recipe: Recipe) -> Option<Recipe> {
        self.recipes.insert(identity_key(recipe.name()), recipe)
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(&identity_key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Recipe> {
        self.recipes.remove(&identity_key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
