use serde::Serialize;

use super::image;
use crate::database::models::{
    ingredient::Ingredient,
    recipe::{Recipe, RecipeDetails, ViewerMarks},
    recipe_ingredient::RecipeIngredient,
    tag::Tag,
    user::User,
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserDto {
    pub fn new(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<&(RecipeIngredient, Ingredient)> for RecipeIngredientDto {
    fn from((link, ingredient): &(RecipeIngredient, Ingredient)) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
            amount: link.amount,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RecipeDto {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeDto {
    pub fn new(details: &RecipeDetails, marks: &ViewerMarks) -> Self {
        let recipe = &details.recipe;

        Self {
            id: recipe.id,
            tags: details.tags.clone(),
            author: UserDto::new(&details.author, marks.following.contains(&details.author.id)),
            ingredients: details.ingredients.iter().map(RecipeIngredientDto::from).collect(),
            is_favorited: marks.favorited.contains(&recipe.id),
            is_in_shopping_cart: marks.in_cart.contains(&recipe.id),
            name: recipe.name.clone(),
            image: image::encode(&recipe.image, &recipe.image_mime),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortRecipeDto {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for ShortRecipeDto {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: image::encode(&recipe.image, &recipe.image_mime),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDto {
    #[serde(flatten)]
    pub author: UserDto,
    pub recipes: Vec<ShortRecipeDto>,
    pub recipes_count: i64,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn author() -> User {
        User {
            id: 3,
            email: "chef@example.com".to_owned(),
            username: "chef".to_owned(),
            first_name: "Julia".to_owned(),
            last_name: "Child".to_owned(),
            role: "user".to_owned(),
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
        }
    }

    fn details() -> RecipeDetails {
        let recipe = Recipe {
            id: 10,
            author_id: 3,
            name: "Omelette".to_owned(),
            image: vec![1, 2, 3],
            image_mime: "image/png".to_owned(),
            text: "Beat the eggs.".to_owned(),
            cooking_time: 5,
            pub_date: Utc::now(),
        };
        let eggs = Ingredient {
            id: 4,
            name: "eggs".to_owned(),
            measurement_unit: "pcs".to_owned(),
        };
        let link = RecipeIngredient {
            id: 1,
            recipe_id: 10,
            ingredient_id: 4,
            amount: 3,
        };
        let breakfast = Tag {
            id: 1,
            name: "Breakfast".to_owned(),
            color: "#E26C2D".to_owned(),
            slug: "breakfast".to_owned(),
        };

        RecipeDetails {
            recipe,
            author: author(),
            tags: vec![breakfast],
            ingredients: vec![(link, eggs)],
        }
    }

    #[test]
    fn anonymous_recipe_view_has_all_flags_off() {
        let dto = RecipeDto::new(&details(), &ViewerMarks::default());
        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 10,
                "tags": [{ "id": 1, "name": "Breakfast", "color": "#E26C2D", "slug": "breakfast" }],
                "author": {
                    "email": "chef@example.com",
                    "id": 3,
                    "username": "chef",
                    "first_name": "Julia",
                    "last_name": "Child",
                    "is_subscribed": false
                },
                "ingredients": [{ "id": 4, "name": "eggs", "measurement_unit": "pcs", "amount": 3 }],
                "is_favorited": false,
                "is_in_shopping_cart": false,
                "name": "Omelette",
                "image": "data:image/png;base64,AQID",
                "text": "Beat the eggs.",
                "cooking_time": 5
            })
        );
    }

    #[test]
    fn viewer_marks_set_flags() {
        let marks = ViewerMarks {
            favorited: HashSet::from([10]),
            in_cart: HashSet::new(),
            following: HashSet::from([3]),
        };

        let dto = RecipeDto::new(&details(), &marks);

        assert!(dto.is_favorited);
        assert!(!dto.is_in_shopping_cart);
        assert!(dto.author.is_subscribed);
    }

    #[test]
    fn subscription_flattens_the_author() {
        let subscription = SubscriptionDto {
            author: UserDto::new(&author(), true),
            recipes: vec![ShortRecipeDto::from(&details().recipe)],
            recipes_count: 4,
        };
        let value = serde_json::to_value(&subscription).unwrap();

        assert_eq!(value["username"], "chef");
        assert_eq!(value["is_subscribed"], true);
        assert_eq!(value["recipes"][0]["name"], "Omelette");
        assert_eq!(value["recipes_count"], 4);
    }
}
