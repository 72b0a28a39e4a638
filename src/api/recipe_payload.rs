use std::collections::HashSet;

use serde::Deserialize;

use super::image::Base64Image;
use crate::{
    database::models::recipe::{NewRecipe, RecipeChanges},
    error::ValidationErrors,
};

const REQUIRED: &str = "This field is required.";
const NAME_MAX_LENGTH: usize = 100;
const TEXT_MAX_LENGTH: usize = 500;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i64,
}

/// Request body of recipe creation and update, every field optional so that
/// missing ones are reported next to invalid ones.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RecipePayload {
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// Payload that passed the checks which need no database.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidRecipe {
    pub ingredients: Option<Vec<(i32, i32)>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<Base64Image>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl RecipePayload {
    /// With `partial`, absent fields are left as they are instead of being required.
    pub fn validate(self, partial: bool) -> Result<ValidRecipe, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut require = |field: &'static str, present: bool| {
            if !present && !partial {
                errors.add(field, REQUIRED);
            }
        };

        require("ingredients", self.ingredients.is_some());
        require("tags", self.tags.is_some());
        require("image", self.image.is_some());
        require("name", self.name.is_some());
        require("text", self.text.is_some());
        require("cooking_time", self.cooking_time.is_some());

        let ingredients = self
            .ingredients
            .map(|ingredients| validate_ingredients(ingredients, &mut errors));
        let tags = self.tags.map(|tags| validate_tags(tags, &mut errors));

        let image = self.image.and_then(|image| {
            Base64Image::decode(&image)
                .map_err(|message| errors.add("image", message))
                .ok()
        });

        let name = self.name.map(|name| name.trim().to_owned());
        if let Some(name) = &name {
            if name.is_empty() {
                errors.add("name", "This field may not be blank.");
            } else if name.chars().count() > NAME_MAX_LENGTH {
                errors.add(
                    "name",
                    format!("Ensure this field has no more than {NAME_MAX_LENGTH} characters."),
                );
            }
        }

        let text = self.text;
        if let Some(text) = &text {
            if text.trim().is_empty() {
                errors.add("text", "This field may not be blank.");
            } else if text.chars().count() > TEXT_MAX_LENGTH {
                errors.add(
                    "text",
                    format!("Ensure this field has no more than {TEXT_MAX_LENGTH} characters."),
                );
            }
        }

        let cooking_time = self.cooking_time.and_then(|minutes| {
            match i32::try_from(minutes) {
                Ok(minutes) if minutes >= 1 => Some(minutes),
                _ => {
                    errors.add("cooking_time", "Cooking time must be at least 1 minute.");
                    None
                }
            }
        });

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidRecipe {
            ingredients,
            tags,
            image,
            name,
            text,
            cooking_time,
        })
    }
}

fn validate_ingredients(
    ingredients: Vec<IngredientAmount>,
    errors: &mut ValidationErrors,
) -> Vec<(i32, i32)> {
    if ingredients.is_empty() {
        errors.add("ingredients", "Add at least one ingredient.");
    }

    let mut seen = HashSet::new();
    if ingredients.iter().any(|ingredient| !seen.insert(ingredient.id)) {
        errors.add("ingredients", "Ingredients must not repeat.");
    }

    ingredients
        .into_iter()
        .filter_map(|ingredient| match i32::try_from(ingredient.amount) {
            Ok(amount) if amount >= 1 => Some((ingredient.id, amount)),
            _ => {
                errors.add(
                    "ingredients",
                    format!("Amount of ingredient {} must be at least 1.", ingredient.id),
                );
                None
            }
        })
        .collect()
}

fn validate_tags(tags: Vec<i32>, errors: &mut ValidationErrors) -> Vec<i32> {
    if tags.is_empty() {
        errors.add("tags", "Add at least one tag.");
    }

    let mut seen = HashSet::new();
    if tags.iter().any(|tag| !seen.insert(*tag)) {
        errors.add("tags", "Tags must not repeat.");
    }

    tags
}

impl ValidRecipe {
    pub fn ingredient_ids(&self) -> Vec<i32> {
        self.ingredients
            .iter()
            .flatten()
            .map(|(ingredient_id, _)| *ingredient_id)
            .collect()
    }

    /// `None` unless every field is present, which `validate(false)` guarantees.
    pub fn to_new_recipe(&self, author_id: i32) -> Option<NewRecipe> {
        let image = self.image.clone()?;

        Some(NewRecipe::new(
            author_id,
            self.name.clone()?,
            image.bytes,
            image.mime,
            self.text.clone()?,
            self.cooking_time?,
        ))
    }

    pub fn to_changes(&self) -> RecipeChanges {
        let image = self.image.clone();

        RecipeChanges {
            name: self.name.clone(),
            image_mime: image.as_ref().map(|image| image.mime.clone()),
            image: image.map(|image| image.bytes),
            text: self.text.clone(),
            cooking_time: self.cooking_time,
        }
    }
}
