use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Query, State},
    http::StatusCode,
    Json,
};
use diesel::PgConnection;
use tracing::{debug, instrument};

use super::{
    auth::{CurrentUser, MaybeUser},
    dto::RecipeDto,
    pagination::{Page, Pagination},
    query_params::QueryParams,
    recipe_payload::{RecipePayload, ValidRecipe},
    Id,
};
use crate::{
    database::models::{
        ingredient::Ingredient,
        recipe::{Recipe, RecipeFilter, ViewerMarks},
        tag::Tag,
        user::User,
    },
    error::{AppError, ValidationErrors},
    state::SharedState,
};

fn filter_from_params(params: &QueryParams) -> Result<RecipeFilter, AppError> {
    let mut errors = ValidationErrors::new();

    let author = params
        .get_parsed::<i32>("author")
        .map_err(|message| errors.add("author", message))
        .ok()
        .flatten();
    let is_favorited = params
        .get_bool("is_favorited")
        .map_err(|message| errors.add("is_favorited", message))
        .ok()
        .flatten();
    let is_in_shopping_cart = params
        .get_bool("is_in_shopping_cart")
        .map_err(|message| errors.add("is_in_shopping_cart", message))
        .ok()
        .flatten();

    errors.into_result()?;

    Ok(RecipeFilter {
        tags: params.get_all("tags").to_vec(),
        author,
        is_favorited,
        is_in_shopping_cart,
    })
}

/// Every referenced tag and ingredient must exist.
fn check_references(recipe: &ValidRecipe, connection: &mut PgConnection) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    if let Some(tag_ids) = &recipe.tags {
        for tag_id in Tag::missing_ids(tag_ids, connection)? {
            errors.add("tags", missing_object(tag_id));
        }
    }

    let ingredient_ids = recipe.ingredient_ids();
    for ingredient_id in Ingredient::missing_ids(&ingredient_ids, connection)? {
        errors.add("ingredients", missing_object(ingredient_id));
    }

    errors.into_result()
}

fn missing_object(id: i32) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

fn render(
    recipe: Recipe,
    viewer: Option<&User>,
    connection: &mut PgConnection,
) -> Result<RecipeDto, AppError> {
    let details = Recipe::with_details(vec![recipe], connection)?;
    let marks = ViewerMarks::load(viewer, &details, connection)?;

    details
        .first()
        .map(|details| RecipeDto::new(details, &marks))
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, viewer))]
pub async fn list_recipes(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<RecipeDto>>, AppError> {
    let params = QueryParams::from_pairs(pairs);
    let filter = filter_from_params(&params)?;
    let pagination = Pagination::from_params(&params, state.config.page_size);
    let viewer_id = viewer.as_ref().map(|viewer| viewer.id);

    let (count, results) = state
        .run(move |connection| {
            let count = filter.count(viewer_id, connection)?;
            let recipes = filter.page(viewer_id, pagination.limit, pagination.offset, connection)?;
            let details = Recipe::with_details(recipes, connection)?;
            let marks = ViewerMarks::load(viewer.as_ref(), &details, connection)?;

            let results = details
                .iter()
                .map(|details| RecipeDto::new(details, &marks))
                .collect::<Vec<_>>();

            Ok((count, results))
        })
        .await?;

    debug!("Listed {} of {} recipes", results.len(), count);

    Ok(Json(pagination.page(results, count, uri.path(), &params)))
}

#[instrument(skip(state, viewer))]
pub async fn get_recipe(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    Id(recipe_id): Id,
) -> Result<Json<RecipeDto>, AppError> {
    let recipe = state
        .run(move |connection| {
            let recipe = Recipe::find(recipe_id, connection)?;
            render(recipe, viewer.as_ref(), connection)
        })
        .await?;

    Ok(Json(recipe))
}

#[instrument(skip_all)]
pub async fn create_recipe(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeDto>), AppError> {
    let Json(payload) = payload?;
    let recipe = payload.validate(false).map_err(AppError::Validation)?;

    let created = state
        .run(move |connection| {
            check_references(&recipe, connection)?;

            let new_recipe = recipe
                .to_new_recipe(user.id)
                .ok_or_else(|| AppError::bad_request("Incomplete recipe."))?;
            let tag_ids = recipe.tags.as_deref().unwrap_or_default();
            let amounts = recipe.ingredients.as_deref().unwrap_or_default();

            let created = Recipe::create(&new_recipe, tag_ids, amounts, connection)?;
            debug!("Created recipe {} by user {}", created.id, user.id);

            render(created, Some(&user), connection)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_recipe(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> Result<Json<RecipeDto>, AppError> {
    let Json(payload) = payload?;

    let updated = state
        .run(move |connection| {
            let existing = Recipe::find(recipe_id, connection)?;
            if !user.can_edit(existing.author_id) {
                return Err(AppError::Forbidden);
            }

            let recipe = payload.validate(true).map_err(AppError::Validation)?;
            check_references(&recipe, connection)?;

            let updated = Recipe::update(
                recipe_id,
                &recipe.to_changes(),
                recipe.tags.as_deref(),
                recipe.ingredients.as_deref(),
                connection,
            )?;
            debug!("Updated recipe {}", recipe_id);

            render(updated, Some(&user), connection)
        })
        .await?;

    Ok(Json(updated))
}

#[instrument(skip(state, user))]
pub async fn delete_recipe(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
) -> Result<StatusCode, AppError> {
    state
        .run(move |connection| {
            let existing = Recipe::find(recipe_id, connection)?;
            if !user.can_edit(existing.author_id) {
                return Err(AppError::Forbidden);
            }

            Recipe::delete(recipe_id, connection)?;
            debug!("Deleted recipe {}", recipe_id);

            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn filter_collects_every_tag() {
        let filter = filter_from_params(&params(&[
            ("tags", "breakfast"),
            ("tags", "dinner"),
            ("author", "3"),
            ("is_favorited", "1"),
        ]))
        .unwrap();

        assert_eq!(
            filter,
            RecipeFilter {
                tags: vec!["breakfast".to_owned(), "dinner".to_owned()],
                author: Some(3),
                is_favorited: Some(true),
                is_in_shopping_cart: None,
            }
        );
    }

    #[test]
    fn empty_query_filters_nothing() {
        assert_eq!(filter_from_params(&params(&[])).unwrap(), RecipeFilter::default());
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let error = filter_from_params(&params(&[("author", "me"), ("is_in_shopping_cart", "yes")]))
            .unwrap_err();

        let AppError::Validation(errors) = error else {
            panic!("expected a validation error, got {error:?}");
        };
        assert!(errors.get("author").is_some());
        assert!(errors.get("is_in_shopping_cart").is_some());
        assert!(errors.get("is_favorited").is_none());
    }

    #[test]
    fn missing_object_message() {
        assert_eq!(missing_object(42), "Invalid pk \"42\" - object does not exist.");
    }
}
