use crate::seed::Catalog;
use crate::types::{BlogItem, CategoryItem, HeroSlide, LocationItem, Property};
use serde::{Deserialize, Serialize};

pub const SIMILAR_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSections {
    pub hero_slides: Vec<HeroSlide>,
    pub highlighted: Vec<Property>,
    pub popular: Vec<Property>,
    pub trending: Vec<Property>,
    pub locations: Vec<LocationItem>,
    pub categories: Vec<CategoryItem>,
    pub blogs: Vec<BlogItem>,
}

impl HomeSections {
    /// Sections are cut from the catalog, restricted to properties still in
    /// `live` so admin deletions disappear from the home page too.
    pub fn build(catalog: &Catalog, live: &[Property]) -> Self {
        let keep = |list: &[Property]| -> Vec<Property> {
            list.iter()
                .filter_map(|p| live.iter().find(|l| l.id == p.id))
                .cloned()
                .collect()
        };
        let popular = keep(&catalog.popular);
        let trending = popular.iter().rev().cloned().collect();
        HomeSections {
            hero_slides: catalog.hero_slides.clone(),
            highlighted: keep(&catalog.highlighted),
            popular,
            trending,
            locations: catalog.locations.clone(),
            categories: catalog.categories.clone(),
            blogs: catalog.blogs.clone(),
        }
    }
}

/// "Similar Properties" on the detail page: popular listings other than the
/// one shown.
pub fn similar_properties(popular: &[Property], current_id: &str, limit: usize) -> Vec<Property> {
    popular
        .iter()
        .filter(|p| p.id != current_id)
        .take(limit)
        .cloned()
        .collect()
}
