use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use tracing::{debug, instrument};

use super::{auth::CurrentUser, dto::ShortRecipeDto, query_params::encode_component, Id};
use crate::{
    database::models::{
        favorite_recipe::FavoriteRecipe,
        recipe::Recipe,
        recipe_relation::RecipeRelation,
        shopping_cart::ShoppingCart,
    },
    error::AppError,
    state::SharedState,
};

/// A toggle that changed nothing is a client error carrying `message`.
pub(super) fn changed_or(changed: bool, message: &str) -> Result<(), AppError> {
    if changed {
        Ok(())
    } else {
        Err(AppError::bad_request(message))
    }
}

async fn create_relation<R: RecipeRelation + 'static>(
    state: SharedState,
    user_id: i32,
    recipe_id: i32,
) -> Result<(StatusCode, Json<ShortRecipeDto>), AppError> {
    let recipe = state
        .run(move |connection| {
            let recipe = Recipe::find(recipe_id, connection)?;
            changed_or(R::link(user_id, recipe_id, connection)?, R::ALREADY_EXISTS)?;

            Ok(recipe)
        })
        .await?;

    debug!("User {} added recipe {} to {}", user_id, recipe_id, R::NAME);

    Ok((StatusCode::CREATED, Json(ShortRecipeDto::from(&recipe))))
}

async fn delete_relation<R: RecipeRelation + 'static>(
    state: SharedState,
    user_id: i32,
    recipe_id: i32,
) -> Result<StatusCode, AppError> {
    state
        .run(move |connection| {
            if !Recipe::exists(recipe_id, connection)? {
                return Err(AppError::NotFound);
            }
            changed_or(R::unlink(user_id, recipe_id, connection)?, R::DOES_NOT_EXIST)
        })
        .await?;

    debug!("User {} removed recipe {} from {}", user_id, recipe_id, R::NAME);

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user))]
pub async fn add_favorite(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
) -> Result<(StatusCode, Json<ShortRecipeDto>), AppError> {
    create_relation::<FavoriteRecipe>(state, user.id, recipe_id).await
}

#[instrument(skip(state, user))]
pub async fn remove_favorite(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
) -> Result<StatusCode, AppError> {
    delete_relation::<FavoriteRecipe>(state, user.id, recipe_id).await
}

#[instrument(skip(state, user))]
pub async fn add_to_shopping_cart(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
) -> Result<(StatusCode, Json<ShortRecipeDto>), AppError> {
    create_relation::<ShoppingCart>(state, user.id, recipe_id).await
}

#[instrument(skip(state, user))]
pub async fn remove_from_shopping_cart(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(recipe_id): Id,
) -> Result<StatusCode, AppError> {
    delete_relation::<ShoppingCart>(state, user.id, recipe_id).await
}

/// ASCII `filename` for old clients, exact UTF-8 name in `filename*`.
fn attachment_disposition(username: &str) -> String {
    let name = format!("{username}_shopping_cart.txt");
    let ascii_name: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{}",
        encode_component(&name)
    )
}

/// Sums ingredients over every recipe in the cart into a text attachment.
#[instrument(skip_all)]
pub async fn download_shopping_cart(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.id;
    let list = state
        .run(move |connection| {
            if ShoppingCart::is_empty_for(user_id, connection)? {
                return Err(AppError::bad_request("Shopping cart is empty."));
            }

            Ok(ShoppingCart::shopping_list(user_id, connection)?)
        })
        .await?;

    debug!("Shopping list of user {} has {} items", user_id, list.len());

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (CONTENT_DISPOSITION, attachment_disposition(&user.username)),
        ],
        list.to_text(),
    ))
}
