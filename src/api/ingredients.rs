use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::{auth::MaybeUser, Id};
use crate::{database::models::ingredient::Ingredient, error::AppError, state::SharedState};

#[derive(Deserialize, Debug)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<SharedState>,
    _: MaybeUser,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let ingredients = state
        .run(move |connection| Ok(Ingredient::search(query.name.as_deref(), connection)?))
        .await?;

    Ok(Json(ingredients))
}

#[instrument(skip(state))]
pub async fn get_ingredient(
    State(state): State<SharedState>,
    _: MaybeUser,
    Id(ingredient_id): Id,
) -> Result<Json<Ingredient>, AppError> {
    let ingredient = state
        .run(move |connection| Ok(Ingredient::find(ingredient_id, connection)?))
        .await?;

    Ok(Json(ingredient))
}
