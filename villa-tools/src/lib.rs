use schemars::{schema_for, Schema};
use thiserror::Error;
use villa_core::errors::VillaError;
use villa_core::seed::Catalog;
use villa_core::types::{BlogItem, CategoryItem, HeroSlide, LocationItem, Property};

pub mod logger;
pub mod schema;

pub use schema::SchemaInfo;

#[derive(Error, Debug)]
pub enum ToolsError {
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] VillaError),
}

pub type Result<T> = std::result::Result<T, ToolsError>;

/// JSON Schema of the whole seed catalog.
pub fn catalog_schema() -> Schema {
    schema_for!(Catalog)
}

pub fn schema_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&catalog_schema())?)
}

pub fn schema_summary() -> String {
    schema::write_schema_summary(generate_schema())
}

fn generate_schema() -> Vec<SchemaInfo> {
    let record_types: Vec<Schema> = vec![
        schema_for!(Property),
        schema_for!(LocationItem),
        schema_for!(BlogItem),
        schema_for!(CategoryItem),
        schema_for!(HeroSlide),
    ];
    let mut derived_schema: Vec<SchemaInfo> =
        record_types.iter().filter_map(schema::get_schema).collect();
    derived_schema.sort_by_key(|x| x.root_type.name.clone());
    derived_schema
}

pub fn export_catalog(catalog: &Catalog) -> Result<String> {
    Ok(catalog.to_json()?)
}

/// Parses a catalog file and reports what it holds.
pub fn check_catalog(json: &str) -> Result<String> {
    let catalog = Catalog::from_json(json)?;
    Ok(format!(
        "{} properties, {} locations, {} categories, {} blogs, {} hero slides",
        catalog.all_properties().len(),
        catalog.locations.len(),
        catalog.categories.len(),
        catalog.blogs.len(),
        catalog.hero_slides.len()
    ))
}
