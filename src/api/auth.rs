use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    database::models::{auth_token::AuthToken, user::User},
    error::AppError,
    state::SharedState,
};

const KEYWORD: &str = "token";

/// Extracts the key from an `Authorization: Token <key>` header.
///
/// Other schemes are not ours to judge and count as anonymous; a malformed
/// token header is an error.
pub fn token_from_header(header: &str) -> Result<Option<&str>, AppError> {
    let mut parts = header.split_whitespace();

    match parts.next() {
        Some(keyword) if keyword.eq_ignore_ascii_case(KEYWORD) => {}
        _ => return Ok(None),
    }

    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(key)),
        _ => Err(AppError::InvalidToken),
    }
}

/// The requesting user, if a valid token was sent.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };
        let header = header.to_str().map_err(|_| AppError::InvalidToken)?;
        let Some(key) = token_from_header(header)?.map(str::to_owned) else {
            return Ok(MaybeUser(None));
        };

        let user = state
            .run(move |connection| Ok(AuthToken::find_user(&key, connection)?))
            .await?;

        user.map(|user| MaybeUser(Some(user)))
            .ok_or(AppError::InvalidToken)
    }
}

/// The requesting user; anonymous requests are rejected with 401.
pub struct CurrentUser(pub User);

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        user.map(CurrentUser).ok_or(AppError::NotAuthenticated)
    }
}
