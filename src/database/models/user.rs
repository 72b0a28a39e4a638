use std::{collections::HashSet, hash::Hash, str::FromStr};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::database::schema::{follows, recipes, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "moderator" => Ok(UserRole::Moderator),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role {other}")),
        }
    }
}

// The password hash is never selected.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl User {
    /// Unknown role strings fall back to the least privileged role.
    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or(UserRole::User)
    }

    pub fn is_moderator(&self) -> bool {
        self.is_staff || self.role() == UserRole::Moderator
    }

    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role() == UserRole::Admin
    }

    /// Authors may edit their own content, moderators and admins anything.
    pub fn can_edit(&self, author_id: i32) -> bool {
        self.id == author_id || self.is_moderator() || self.is_admin()
    }

    pub fn find(user_id: i32, connection: &mut PgConnection) -> QueryResult<User> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(connection)
    }

    pub fn find_all(ids: &[i32], connection: &mut PgConnection) -> QueryResult<Vec<User>> {
        users::table
            .filter(users::id.eq_any(ids))
            .select(User::as_select())
            .load(connection)
    }

    pub fn count(connection: &mut PgConnection) -> QueryResult<i64> {
        users::table.count().get_result(connection)
    }

    pub fn page(limit: i64, offset: i64, connection: &mut PgConnection) -> QueryResult<Vec<User>> {
        users::table
            .order(users::id.asc())
            .limit(limit)
            .offset(offset)
            .select(User::as_select())
            .load(connection)
    }

    pub fn followed_count(&self, connection: &mut PgConnection) -> QueryResult<i64> {
        follows::table
            .filter(follows::user_id.eq(self.id))
            .count()
            .get_result(connection)
    }

    /// Authors followed by this user, ordered by username.
    pub fn followed_page(
        &self,
        limit: i64,
        offset: i64,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<User>> {
        let followed = follows::table
            .filter(follows::user_id.eq(self.id))
            .select(follows::author_id);

        users::table
            .filter(users::id.eq_any(followed))
            .order((users::username.asc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(User::as_select())
            .load(connection)
    }

    /// Which of `author_ids` this user follows.
    pub fn following_among(
        &self,
        author_ids: &[i32],
        connection: &mut PgConnection,
    ) -> QueryResult<HashSet<i32>> {
        let ids: Vec<i32> = follows::table
            .filter(follows::user_id.eq(self.id))
            .filter(follows::author_id.eq_any(author_ids))
            .select(follows::author_id)
            .load(connection)?;

        Ok(ids.into_iter().collect())
    }

    pub fn recipes_count(&self, connection: &mut PgConnection) -> QueryResult<i64> {
        recipes::table
            .filter(recipes::author_id.eq(self.id))
            .count()
            .get_result(connection)
    }
}
