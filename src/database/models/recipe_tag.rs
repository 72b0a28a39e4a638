use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::{recipe::Recipe, tag::Tag};
use crate::database::schema::recipe_tags;

#[derive(
    Queryable, Selectable, Identifiable, Insertable, Associations, AllArgsConstructor, Debug,
)]
#[diesel(table_name = recipe_tags)]
#[diesel(primary_key(recipe_id, tag_id))]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Tag))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

impl RecipeTag {
    /// Replaces the tag set of a recipe.
    pub fn set_for(recipe_id: i32, tag_ids: &[i32], connection: &mut PgConnection) -> QueryResult<()> {
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
            .execute(connection)?;

        let links: Vec<_> = tag_ids
            .iter()
            .map(|tag_id| RecipeTag::new(recipe_id, *tag_id))
            .collect();

        diesel::insert_into(recipe_tags::table)
            .values(&links)
            .execute(connection)?;

        Ok(())
    }
}
