pub mod auth_token;
pub mod favorite_recipe;
pub mod follow;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_relation;
pub mod recipe_tag;
pub mod shopping_cart;
pub mod tag;
pub mod user;
