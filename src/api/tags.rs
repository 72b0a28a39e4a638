use axum::{extract::State, Json};
use tracing::instrument;

use super::{auth::MaybeUser, Id};
use crate::{database::models::tag::Tag, error::AppError, state::SharedState};

#[instrument(skip_all)]
pub async fn list_tags(
    State(state): State<SharedState>,
    _: MaybeUser,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = state.run(|connection| Ok(Tag::all(connection)?)).await?;

    Ok(Json(tags))
}

#[instrument(skip(state))]
pub async fn get_tag(
    State(state): State<SharedState>,
    _: MaybeUser,
    Id(tag_id): Id,
) -> Result<Json<Tag>, AppError> {
    let tag = state
        .run(move |connection| Ok(Tag::find(tag_id, connection)?))
        .await?;

    Ok(Json(tag))
}
