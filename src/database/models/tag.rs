use std::sync::LazyLock;

use diesel::prelude::*;
use lombok::AllArgsConstructor;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::database::schema::tags;

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Insertable, Deserialize, AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = tags)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl Tag {
    pub fn all(connection: &mut PgConnection) -> QueryResult<Vec<Tag>> {
        tags::table
            .order(tags::id.asc())
            .select(Tag::as_select())
            .load(connection)
    }

    pub fn find(tag_id: i32, connection: &mut PgConnection) -> QueryResult<Tag> {
        tags::table
            .find(tag_id)
            .select(Tag::as_select())
            .first(connection)
    }

    /// Ids from `ids` that have no tag row.
    pub fn missing_ids(ids: &[i32], connection: &mut PgConnection) -> QueryResult<Vec<i32>> {
        let found: Vec<i32> = tags::table
            .filter(tags::id.eq_any(ids))
            .select(tags::id)
            .load(connection)?;

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}

impl NewTag {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tag name must not be blank".to_owned());
        }
        if !is_hex_color(&self.color) {
            return Err(format!("{} is not a #RRGGBB color", self.color));
        }
        if !is_slug(&self.slug) {
            return Err(format!("{} is not a valid slug", self.slug));
        }

        Ok(())
    }
}

// Same patterns as the `tags` table checks.
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[a-fA-F0-9]{6}$").expect("valid color pattern"));
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug pattern"));

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

pub fn is_slug(value: &str) -> bool {
    SLUG.is_match(value)
}
