use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use diesel::{dsl::not, pg::Pg, prelude::*};
use itertools::Itertools;
use lombok::AllArgsConstructor;

use super::{
    favorite_recipe::FavoriteRecipe, ingredient::Ingredient, recipe_ingredient::RecipeIngredient,
    recipe_tag::RecipeTag, shopping_cart::ShoppingCart, tag::Tag, user::User,
};
use crate::database::schema::{
    favorite_recipes, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts, tags,
};

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = recipes)]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub image: Vec<u8>,
    pub image_mime: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = recipes)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub image: Vec<u8>,
    pub image_mime: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = recipes)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub image: Option<Vec<u8>>,
    pub image_mime: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.image_mime.is_none()
            && self.text.is_none()
            && self.cooking_time.is_none()
    }
}

/// A recipe with everything needed to render it.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<(RecipeIngredient, Ingredient)>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// `None` when the filter can only match nothing.
    fn query(&self, viewer: Option<i32>) -> Option<recipes::BoxedQuery<'static, Pg>> {
        let mut query = recipes::table.into_boxed();

        if !self.tags.is_empty() {
            let tagged = recipe_tags::table
                .inner_join(tags::table)
                .filter(tags::slug.eq_any(self.tags.clone()))
                .select(recipe_tags::recipe_id);
            query = query.filter(recipes::id.eq_any(tagged));
        }

        if let Some(author) = self.author {
            query = query.filter(recipes::author_id.eq(author));
        }

        match (self.is_favorited, viewer) {
            (Some(true), None) => return None,
            (Some(wanted), Some(user_id)) => {
                let favorited = favorite_recipes::table
                    .filter(favorite_recipes::user_id.eq(user_id))
                    .select(favorite_recipes::recipe_id);
                query = if wanted {
                    query.filter(recipes::id.eq_any(favorited))
                } else {
                    query.filter(not(recipes::id.eq_any(favorited)))
                };
            }
            _ => {}
        }

        match (self.is_in_shopping_cart, viewer) {
            (Some(true), None) => return None,
            (Some(wanted), Some(user_id)) => {
                let in_cart = shopping_carts::table
                    .filter(shopping_carts::user_id.eq(user_id))
                    .select(shopping_carts::recipe_id);
                query = if wanted {
                    query.filter(recipes::id.eq_any(in_cart))
                } else {
                    query.filter(not(recipes::id.eq_any(in_cart)))
                };
            }
            _ => {}
        }

        Some(query)
    }

    pub fn count(&self, viewer: Option<i32>, connection: &mut PgConnection) -> QueryResult<i64> {
        match self.query(viewer) {
            Some(query) => query.count().get_result(connection),
            None => Ok(0),
        }
    }

    /// Newest first.
    pub fn page(
        &self,
        viewer: Option<i32>,
        limit: i64,
        offset: i64,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<Recipe>> {
        let Some(query) = self.query(viewer) else {
            return Ok(Vec::new());
        };

        query
            .order((recipes::pub_date.desc(), recipes::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(connection)
    }
}

impl Recipe {
    pub fn find(recipe_id: i32, connection: &mut PgConnection) -> QueryResult<Recipe> {
        recipes::table
            .find(recipe_id)
            .select(Recipe::as_select())
            .first(connection)
    }

    pub fn exists(recipe_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(recipes::table.find(recipe_id))).get_result(connection)
    }

    /// Inserts the recipe row with its tag and ingredient links in one transaction.
    pub fn create(
        new_recipe: &NewRecipe,
        tag_ids: &[i32],
        amounts: &[(i32, i32)],
        connection: &mut PgConnection,
    ) -> QueryResult<Recipe> {
        connection.build_transaction().run(|connection| {
            let recipe: Recipe = diesel::insert_into(recipes::table)
                .values(new_recipe)
                .returning(Recipe::as_returning())
                .get_result(connection)?;

            RecipeTag::set_for(recipe.id, tag_ids, connection)?;
            RecipeIngredient::set_for(recipe.id, amounts, connection)?;

            Ok(recipe)
        })
    }

    /// Applies `changes`; tags and ingredients are replaced only when given.
    pub fn update(
        recipe_id: i32,
        changes: &RecipeChanges,
        tag_ids: Option<&[i32]>,
        amounts: Option<&[(i32, i32)]>,
        connection: &mut PgConnection,
    ) -> QueryResult<Recipe> {
        connection.build_transaction().run(|connection| {
            let recipe = if changes.is_empty() {
                Recipe::find(recipe_id, connection)?
            } else {
                diesel::update(recipes::table.find(recipe_id))
                    .set(changes)
                    .returning(Recipe::as_returning())
                    .get_result(connection)?
            };

            if let Some(tag_ids) = tag_ids {
                RecipeTag::set_for(recipe_id, tag_ids, connection)?;
            }
            if let Some(amounts) = amounts {
                RecipeIngredient::set_for(recipe_id, amounts, connection)?;
            }

            Ok(recipe)
        })
    }

    pub fn delete(recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(recipes::table.find(recipe_id)).execute(connection)
    }

    /// Newest recipes of an author, at most `limit` when given.
    pub fn latest_by_author(
        author_id: i32,
        limit: Option<i64>,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<Recipe>> {
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .order((recipes::pub_date.desc(), recipes::id.desc()))
            .select(Recipe::as_select())
            .into_boxed();

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.load(connection)
    }

    /// Loads authors, tags and ingredients for `recipes`, keeping their order.
    pub fn with_details(
        recipes: Vec<Recipe>,
        connection: &mut PgConnection,
    ) -> QueryResult<Vec<RecipeDetails>> {
        let tags: Vec<(RecipeTag, Tag)> = RecipeTag::belonging_to(&recipes)
            .inner_join(tags::table)
            .order(tags::id.asc())
            .select((RecipeTag::as_select(), Tag::as_select()))
            .load(connection)?;

        let ingredients: Vec<(RecipeIngredient, Ingredient)> =
            RecipeIngredient::belonging_to(&recipes)
                .inner_join(ingredients::table)
                .order(recipe_ingredients::id.asc())
                .select((RecipeIngredient::as_select(), Ingredient::as_select()))
                .load(connection)?;

        let author_ids = recipes.iter().map(|recipe| recipe.author_id).unique().collect_vec();
        let authors: HashMap<i32, User> = User::find_all(&author_ids, connection)?
            .into_iter()
            .map(|author| (author.id, author))
            .collect();

        let tags = tags.grouped_by(&recipes);
        let ingredients = ingredients.grouped_by(&recipes);

        recipes
            .into_iter()
            .zip(tags)
            .zip(ingredients)
            .map(|((recipe, tags), ingredients)| {
                let author = authors
                    .get(&recipe.author_id)
                    .cloned()
                    .ok_or(diesel::result::Error::NotFound)?;

                Ok(RecipeDetails {
                    recipe,
                    author,
                    tags: tags.into_iter().map(|(_, tag)| tag).collect(),
                    ingredients,
                })
            })
            .collect()
    }
}

/// Per-viewer flags shown next to recipes and authors.
#[derive(Debug, Default, Clone)]
pub struct ViewerMarks {
    pub favorited: HashSet<i32>,
    pub in_cart: HashSet<i32>,
    pub following: HashSet<i32>,
}

impl ViewerMarks {
    pub fn load(
        viewer: Option<&User>,
        recipes: &[RecipeDetails],
        connection: &mut PgConnection,
    ) -> QueryResult<ViewerMarks> {
        let Some(viewer) = viewer else {
            return Ok(ViewerMarks::default());
        };

        let recipe_ids = recipes.iter().map(|details| details.recipe.id).collect_vec();
        let author_ids = recipes
            .iter()
            .map(|details| details.author.id)
            .unique()
            .collect_vec();

        Ok(ViewerMarks {
            favorited: FavoriteRecipe::recipes_among(viewer.id, &recipe_ids, connection)?,
            in_cart: ShoppingCart::recipes_among(viewer.id, &recipe_ids, connection)?,
            following: viewer.following_among(&author_ids, connection)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;

    use super::*;

    fn sql(filter: &RecipeFilter, viewer: Option<i32>) -> Option<String> {
        filter
            .query(viewer)
            .map(|query| debug_query::<Pg, _>(&query).to_string())
    }

    #[test]
    fn anonymous_viewer_has_no_favorites_or_cart() {
        let favorited = RecipeFilter {
            is_favorited: Some(true),
            ..RecipeFilter::default()
        };
        let in_cart = RecipeFilter {
            is_in_shopping_cart: Some(true),
            ..RecipeFilter::default()
        };

        assert!(favorited.query(None).is_none());
        assert!(in_cart.query(None).is_none());
        assert!(favorited.query(Some(1)).is_some());
        assert!(in_cart.query(Some(1)).is_some());
    }

    #[test]
    fn negative_flags_do_not_filter_anonymous_viewers() {
        let filter = RecipeFilter {
            is_favorited: Some(false),
            is_in_shopping_cart: Some(false),
            ..RecipeFilter::default()
        };

        let anonymous = sql(&filter, None).unwrap();
        assert!(!anonymous.contains("favorite_recipes"));
        assert!(!anonymous.contains("shopping_carts"));

        let viewer = sql(&filter, Some(3)).unwrap();
        assert!(viewer.contains("favorite_recipes"));
        assert!(viewer.contains("shopping_carts"));
    }

    #[test]
    fn tags_and_author_narrow_the_query() {
        let filter = RecipeFilter {
            tags: vec!["lunch".to_owned()],
            author: Some(5),
            ..RecipeFilter::default()
        };

        let query = sql(&filter, None).unwrap();

        assert!(query.contains("recipe_tags"));
        assert!(query.contains("author_id"));
        assert!(!sql(&RecipeFilter::default(), None).unwrap().contains("WHERE"));
    }
}
