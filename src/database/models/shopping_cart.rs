use std::{
    collections::{BTreeMap, HashSet},
    fmt::{self, Write},
    ops::Deref,
};

use diesel::prelude::*;
use lombok::AllArgsConstructor;

use super::{ingredient::Ingredient, recipe_relation::RecipeRelation};
use crate::database::schema::{ingredients, recipe_ingredients, shopping_carts};

#[derive(Insertable, AllArgsConstructor, Debug)]
#[diesel(table_name = shopping_carts)]
pub struct ShoppingCart {
    pub user_id: i32,
    pub recipe_id: i32,
}

impl ShoppingCart {
    pub fn recipes_among(
        user_id: i32,
        recipe_ids: &[i32],
        connection: &mut PgConnection,
    ) -> QueryResult<HashSet<i32>> {
        let ids: Vec<i32> = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user_id))
            .filter(shopping_carts::recipe_id.eq_any(recipe_ids))
            .select(shopping_carts::recipe_id)
            .load(connection)?;

        Ok(ids.into_iter().collect())
    }

    pub fn is_empty_for(user_id: i32, connection: &mut PgConnection) -> QueryResult<bool> {
        let exists: bool = diesel::select(diesel::dsl::exists(
            shopping_carts::table.filter(shopping_carts::user_id.eq(user_id)),
        ))
        .get_result(connection)?;

        Ok(!exists)
    }

    /// Sums the ingredients of every recipe in the user's cart.
    pub fn shopping_list(user_id: i32, connection: &mut PgConnection) -> QueryResult<ShoppingList> {
        let in_cart = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user_id))
            .select(shopping_carts::recipe_id);

        let rows: Vec<(Ingredient, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(in_cart))
            .select((Ingredient::as_select(), recipe_ingredients::amount))
            .load(connection)?;

        let mut list = ShoppingList::new();
        rows.iter()
            .for_each(|(ingredient, amount)| list.add_item(ingredient, i64::from(*amount)));

        Ok(list)
    }
}

impl RecipeRelation for ShoppingCart {
    const NAME: &'static str = "shopping cart";
    const ALREADY_EXISTS: &'static str = "Recipe is already in the shopping cart.";
    const DOES_NOT_EXIST: &'static str = "Recipe is not in the shopping cart.";

    fn insert(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize> {
        diesel::insert_into(shopping_carts::table)
            .values(ShoppingCart::new(user_id, recipe_id))
            .execute(connection)
    }

    fn remove(user_id: i32, recipe_id: i32, connection: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(
            shopping_carts::table
                .filter(shopping_carts::user_id.eq(user_id))
                .filter(shopping_carts::recipe_id.eq(recipe_id)),
        )
        .execute(connection)
    }
}

/// Ingredient totals keyed by `(name, unit)`, so equal ingredients stored twice still merge.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    inner: BTreeMap<(String, String), i64>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn add_item(&mut self, ingredient: &Ingredient, amount: i64) {
        self.inner
            .entry((ingredient.name.clone(), ingredient.measurement_unit.clone()))
            .and_modify(|current_amount| {
                *current_amount += amount;
            })
            .or_insert(amount);
    }

    /// One `name: amount - unit.` line per ingredient, sorted by name.
    pub fn to_text(&self) -> String {
        self.inner
            .iter()
            .fold(String::new(), |mut text, ((name, unit), amount)| {
                let _ = writeln!(text, "{name}: {amount} - {unit}.");
                text
            })
    }
}

impl Deref for ShoppingList {
    type Target = BTreeMap<(String, String), i64>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for ShoppingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}
