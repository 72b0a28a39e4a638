use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Path},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::AppError, state::SharedState};

pub mod auth;
pub mod dto;
pub mod image;
pub mod ingredients;
pub mod pagination;
pub mod query_params;
pub mod recipe_payload;
pub mod recipes;
pub mod relations;
pub mod tags;
pub mod users;

/// Integer id taken from the path; anything else is a 404.
pub struct Id(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for Id {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(Id(id))
    }
}

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/tags/", get(tags::list_tags))
        .route("/tags/{id}/", get(tags::get_tag))
        .route("/ingredients/", get(ingredients::list_ingredients))
        .route("/ingredients/{id}/", get(ingredients::get_ingredient))
        .route(
            "/recipes/",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipes/download_shopping_cart/",
            get(relations::download_shopping_cart),
        )
        .route(
            "/recipes/{id}/",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite/",
            post(relations::add_favorite).delete(relations::remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(relations::add_to_shopping_cart).delete(relations::remove_from_shopping_cart),
        )
        .route("/users/", get(users::list_users))
        .route("/users/me/", get(users::me))
        .route("/users/subscriptions/", get(users::subscriptions))
        .route("/users/{id}/", get(users::get_user))
        .route(
            "/users/{id}/subscribe/",
            post(users::subscribe).delete(users::unsubscribe),
        );

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
