use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::{ingredient::Ingredient, recipe::Recipe};
use crate::database::schema::recipe_ingredients;

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = recipe_ingredients)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

impl RecipeIngredient {
    /// Replaces the ingredient list of a recipe with `(ingredient_id, amount)` pairs.
    pub fn set_for(
        recipe_id: i32,
        amounts: &[(i32, i32)],
        connection: &mut PgConnection,
    ) -> QueryResult<()> {
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
            .execute(connection)?;

        let rows: Vec<_> = amounts
            .iter()
            .map(|(ingredient_id, amount)| NewRecipeIngredient::new(recipe_id, *ingredient_id, *amount))
            .collect();

        diesel::insert_into(recipe_ingredients::table)
            .values(&rows)
            .execute(connection)?;

        Ok(())
    }
}
