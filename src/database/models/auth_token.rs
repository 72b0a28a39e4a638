use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::user::User;
use crate::database::schema::{auth_tokens, users};

/// Tokens are issued by the authentication service; this side only reads them.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug)]
#[diesel(table_name = auth_tokens)]
#[diesel(primary_key(key))]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthToken {
    pub key: String,
    pub user_id: i32,
    pub created: DateTime<Utc>,
}

impl AuthToken {
    pub fn find_user(key: &str, connection: &mut PgConnection) -> QueryResult<Option<User>> {
        auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(key))
            .select(User::as_select())
            .first(connection)
            .optional()
    }
}
