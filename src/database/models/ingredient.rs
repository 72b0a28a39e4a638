use diesel::prelude::*;
use lombok::AllArgsConstructor;
use serde::{Deserialize, Serialize};

use crate::database::schema::ingredients;

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Insertable, Deserialize, AllArgsConstructor, Debug, Clone, PartialEq, Eq, Hash)]
#[diesel(table_name = ingredients)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl Ingredient {
    /// Case-insensitive name prefix search, all ingredients when `prefix` is `None`.
    pub fn search(prefix: Option<&str>, connection: &mut PgConnection) -> QueryResult<Vec<Ingredient>> {
        let mut query = ingredients::table
            .select(Ingredient::as_select())
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .into_boxed();

        if let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) {
            query = query.filter(ingredients::name.ilike(prefix_pattern(prefix)));
        }

        query.load(connection)
    }

    pub fn find(ingredient_id: i32, connection: &mut PgConnection) -> QueryResult<Ingredient> {
        ingredients::table
            .find(ingredient_id)
            .select(Ingredient::as_select())
            .first(connection)
    }

    pub fn missing_ids(ids: &[i32], connection: &mut PgConnection) -> QueryResult<Vec<i32>> {
        let found: Vec<i32> = ingredients::table
            .filter(ingredients::id.eq_any(ids))
            .select(ingredients::id)
            .load(connection)?;

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}

/// `LIKE` pattern matching values that start with `prefix` literally.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    pattern
}
