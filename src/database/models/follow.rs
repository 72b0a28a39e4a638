use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::recipe_relation::{inserted, removed};
use crate::database::schema::follows;

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = follows)]
pub struct Follow {
    pub user_id: i32,
    pub author_id: i32,
}

impl Follow {
    /// `Ok(false)` when already following; self-follows are rejected by the database check.
    pub fn create(user_id: i32, author_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        inserted(
            diesel::insert_into(follows::table)
                .values(Follow::new(user_id, author_id))
                .execute(connection),
        )
    }

    pub fn delete(user_id: i32, author_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        removed(
            diesel::delete(
                follows::table
                    .filter(follows::user_id.eq(user_id))
                    .filter(follows::author_id.eq(author_id)),
            )
            .execute(connection),
        )
    }
}
