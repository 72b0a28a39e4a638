use std::collections::HashSet;

use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::recipe_relation::RecipeRelation;
use crate::database::schema::favorite_recipes;

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = favorite_recipes)]
pub struct FavoriteRecipe {
    pub user_id: i32,
    pub recipe_id: i32,
}

impl FavoriteRecipe {
    pub fn recipes_among(
        user_id: i32,
        recipe_ids: &[i32],
        connection: &mut PgConnection,
    ) -> QueryResult<HashSet<i32>> {
        let ids: Vec<i32> = favorite_recipes::table
            .filter(favorite_recipes::user_id.eq(user_id))
            .filter(favorite_recipes::recipe_id.eq_any(recipe_ids))
            .select(favorite_recipes::recipe_id)
            .load(connection)?;

        Ok(ids.into_iter().collect())
    }
}

impl RecipeRelation for FavoriteRecipe {
    const NAME: &'static str = "favorite";
    const ALREADY_EXISTS: &'static str = "Recipe is already in favorites.";
    const DOES_NOT_EXIST: &'static str = "Recipe is not in favorites.";

    fn insert(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize> {
        diesel::insert_into(favorite_recipes::table)
            .values(FavoriteRecipe::new(user_id, recipe_id))
            .execute(connection)
    }

    fn remove(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(
            favorite_recipes::table
                .filter(favorite_recipes::user_id.eq(user_id))
                .filter(favorite_recipes::recipe_id.eq(recipe_id)),
        )
        .execute(connection)
    }
}
