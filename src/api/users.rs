use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};
use diesel::PgConnection;
use itertools::Itertools;
use tracing::{debug, instrument};

use super::{
    auth::{CurrentUser, MaybeUser},
    dto::{ShortRecipeDto, SubscriptionDto, UserDto},
    pagination::{Page, Pagination},
    query_params::QueryParams,
    relations::changed_or,
    Id,
};
use crate::{
    database::models::{follow::Follow, recipe::Recipe, user::User},
    error::AppError,
    state::SharedState,
};

const RECIPES_LIMIT: &str = "recipes_limit";

/// Negative or unparsable limits are ignored; `0` embeds no recipes.
fn recipes_limit(params: &QueryParams) -> Option<i64> {
    params
        .get_parsed::<i64>(RECIPES_LIMIT)
        .ok()
        .flatten()
        .filter(|limit| *limit >= 0)
}

fn check_can_follow(user_id: i32, author_id: i32) -> Result<(), AppError> {
    if user_id == author_id {
        return Err(AppError::bad_request("You cannot follow yourself."));
    }

    Ok(())
}

fn subscription(
    author: &User,
    recipes_limit: Option<i64>,
    connection: &mut PgConnection,
) -> Result<SubscriptionDto, AppError> {
    let recipes = Recipe::latest_by_author(author.id, recipes_limit, connection)?;

    Ok(SubscriptionDto {
        author: UserDto::new(author, true),
        recipes: recipes.iter().map(ShortRecipeDto::from).collect(),
        recipes_count: author.recipes_count(connection)?,
    })
}

#[instrument(skip(state, viewer))]
pub async fn list_users(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<UserDto>>, AppError> {
    let params = QueryParams::from_pairs(pairs);
    let pagination = Pagination::from_params(&params, state.config.page_size);

    let (count, results) = state
        .run(move |connection| {
            let count = User::count(connection)?;
            let users = User::page(pagination.limit, pagination.offset, connection)?;

            let following = match &viewer {
                Some(viewer) => {
                    let ids = users.iter().map(|user| user.id).collect_vec();
                    viewer.following_among(&ids, connection)?
                }
                None => Default::default(),
            };

            let results = users
                .iter()
                .map(|user| UserDto::new(user, following.contains(&user.id)))
                .collect_vec();

            Ok((count, results))
        })
        .await?;

    Ok(Json(pagination.page(results, count, uri.path(), &params)))
}

#[instrument(skip(state, viewer))]
pub async fn get_user(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    Id(user_id): Id,
) -> Result<Json<UserDto>, AppError> {
    let user = state
        .run(move |connection| {
            let user = User::find(user_id, connection)?;
            let is_subscribed = match &viewer {
                Some(viewer) => viewer.following_among(&[user.id], connection)?.contains(&user.id),
                None => false,
            };

            Ok(UserDto::new(&user, is_subscribed))
        })
        .await?;

    Ok(Json(user))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(UserDto::new(&user, false))
}

#[instrument(skip(state, user))]
pub async fn subscriptions(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<SubscriptionDto>>, AppError> {
    let params = QueryParams::from_pairs(pairs);
    let pagination = Pagination::from_params(&params, state.config.page_size);
    let recipes_limit = recipes_limit(&params);

    let (count, results) = state
        .run(move |connection| {
            let count = user.followed_count(connection)?;
            let results = user
                .followed_page(pagination.limit, pagination.offset, connection)?
                .iter()
                .map(|author| subscription(author, recipes_limit, connection))
                .collect::<Result<Vec<_>, _>>()?;

            Ok((count, results))
        })
        .await?;

    Ok(Json(pagination.page(results, count, uri.path(), &params)))
}

#[instrument(skip(state, user))]
pub async fn subscribe(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(author_id): Id,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<SubscriptionDto>), AppError> {
    let recipes_limit = recipes_limit(&QueryParams::from_pairs(pairs));
    let user_id = user.id;

    let subscription = state
        .run(move |connection| {
            let author = User::find(author_id, connection)?;
            check_can_follow(user_id, author.id)?;
            changed_or(
                Follow::create(user_id, author.id, connection)?,
                "You are already following this author.",
            )?;

            subscription(&author, recipes_limit, connection)
        })
        .await?;

    debug!("User {} followed {}", user_id, author_id);

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[instrument(skip(state, user))]
pub async fn unsubscribe(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(author_id): Id,
) -> Result<StatusCode, AppError> {
    let user_id = user.id;

    state
        .run(move |connection| {
            let author = User::find(author_id, connection)?;
            changed_or(
                Follow::delete(user_id, author.id, connection)?,
                "You are not following this author.",
            )
        })
        .await?;

    debug!("User {} unfollowed {}", user_id, author_id);

    Ok(StatusCode::NO_CONTENT)
}
