use diesel::{
    result::{DatabaseErrorKind, Error},
    PgConnection, QueryResult,
};

/// A per-user set of recipes stored as a `(user_id, recipe_id)` link table.
pub trait RecipeRelation {
    /// Shown in error messages.
    const NAME: &'static str;
    const ALREADY_EXISTS: &'static str;
    const DOES_NOT_EXIST: &'static str;

    fn insert(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize>;

    fn remove(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize>;

    /// `Ok(false)` when the link already exists.
    fn link(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        inserted(Self::insert(user_id, recipe_id, connection))
    }

    /// `Ok(false)` when there was nothing to remove.
    fn unlink(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        removed(Self::remove(user_id, recipe_id, connection))
    }
}

/// Turns a unique violation into `Ok(false)`.
pub fn inserted(result: QueryResult<usize>) -> QueryResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn removed(result: QueryResult<usize>) -> QueryResult<bool> {
    result.map(|deleted| deleted > 0)
}
