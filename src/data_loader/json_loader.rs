use std::{fs, path::PathBuf};

use itertools::Itertools;
use lombok::AllArgsConstructor;
use serde::de::DeserializeOwned;

use super::{DataLoader, LoadError};
use crate::database::models::{ingredient::NewIngredient, tag::NewTag};

const INGREDIENTS_FILE: &str = "ingredients.json";
const TAGS_FILE: &str = "tags.json";

/// Reads `ingredients.json` and `tags.json` from a directory.
#[derive(AllArgsConstructor)]
pub struct JsonLoader {
    data_dir: PathBuf,
}

impl JsonLoader {
    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, LoadError> {
        let path = self.data_dir.join(file);
        let path_name = path.display().to_string();

        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path_name.clone(),
            source,
        })?;

        parse(&content, &path_name)
    }
}

impl DataLoader for JsonLoader {
    fn load_ingredients(&self) -> Result<Vec<NewIngredient>, LoadError> {
        let ingredients: Vec<NewIngredient> = self.read(INGREDIENTS_FILE)?;

        Ok(clean_ingredients(ingredients))
    }

    fn load_tags(&self) -> Result<Vec<NewTag>, LoadError> {
        let tags = self.read(TAGS_FILE)?;
        validate_tags(&tags)?;

        Ok(tags)
    }
}

fn parse<T: DeserializeOwned>(content: &str, path: &str) -> Result<Vec<T>, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })
}

// Dumps repeat some ingredients and pad names with spaces.
fn clean_ingredients(ingredients: Vec<NewIngredient>) -> Vec<NewIngredient> {
    ingredients
        .into_iter()
        .map(|ingredient| {
            NewIngredient::new(
                ingredient.name.trim().to_owned(),
                ingredient.measurement_unit.trim().to_owned(),
            )
        })
        .filter(|ingredient| !ingredient.name.is_empty())
        .unique()
        .collect_vec()
}

fn validate_tags(tags: &[NewTag]) -> Result<(), LoadError> {
    for tag in tags {
        tag.validate().map_err(|reason| LoadError::InvalidTag {
            name: tag.name.clone(),
            reason,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredients_are_trimmed_and_deduplicated() {
        let ingredients: Vec<NewIngredient> = parse(
            r#"[
                {"name": " flour ", "measurement_unit": "g"},
                {"name": "flour", "measurement_unit": "g"},
                {"name": "flour", "measurement_unit": "kg"},
                {"name": "  ", "measurement_unit": "g"}
            ]"#,
            INGREDIENTS_FILE,
        )
        .unwrap();

        assert_eq!(
            clean_ingredients(ingredients),
            vec![
                NewIngredient::new("flour".to_owned(), "g".to_owned()),
                NewIngredient::new("flour".to_owned(), "kg".to_owned()),
            ]
        );
    }

    #[test]
    fn broken_json_reports_the_file() {
        let error = parse::<NewTag>("[{\"name\": ", TAGS_FILE).unwrap_err();

        assert!(matches!(error, LoadError::Parse { ref path, .. } if path == TAGS_FILE));
    }

    #[test]
    fn tags_with_bad_color_are_rejected() {
        let tags: Vec<NewTag> = parse(
            r##"[
                {"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"},
                {"name": "Lunch", "color": "green", "slug": "lunch"}
            ]"##,
            TAGS_FILE,
        )
        .unwrap();

        let error = validate_tags(&tags).unwrap_err();

        assert!(matches!(error, LoadError::InvalidTag { ref name, .. } if name == "Lunch"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let loader = JsonLoader::new(PathBuf::from("does/not/exist"));

        assert!(matches!(loader.load_tags(), Err(LoadError::Io { .. })));
    }
}
