use std::process::ExitCode;

use diesel::{insert_into, prelude::*};
use foodgram::{
    config::Config,
    data_loader::{json_loader::JsonLoader, DataLoader},
    database::{
        connection::establish_connection,
        schema::{ingredients, tags},
    },
};
use tracing::{error, info, trace_span};

fn main() -> ExitCode {
    foodgram::init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let loader = JsonLoader::new(config.data_dir.clone());

    let ingredients = loader.load_ingredients()?;
    let tags = loader.load_tags()?;

    let mut connection = establish_connection(&config.database_url)?;

    let (ingredients_inserted, tags_inserted) =
        connection.build_transaction().run(|connection| {
            let span = trace_span!("importing data");
            let _guard = span.enter();

            let ingredients_inserted = insert_into(ingredients::table)
                .values(&ingredients)
                .on_conflict_do_nothing()
                .execute(connection)?;
            let tags_inserted = insert_into(tags::table)
                .values(&tags)
                .on_conflict_do_nothing()
                .execute(connection)?;

            QueryResult::Ok((ingredients_inserted, tags_inserted))
        })?;

    info!(
        "Imported {ingredients_inserted} of {} ingredients and {tags_inserted} of {} tags",
        ingredients.len(),
        tags.len()
    );

    Ok(())
}
