use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Clone,
    Copy,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
    JsonSchema,
)]
pub enum PropertyType {
    Villa,
    Bungalow,
    Plot,
    Residential,
    Commercial,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub location: String,
    /// Display string such as "₹ 75 L" or "₹ 1.2 Cr", see [`crate::price::parse_price`].
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_bath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Property {
    pub fn new(
        id: &str,
        title: &str,
        location: &str,
        price: &str,
        property_type: PropertyType,
        image: &str,
    ) -> Self {
        Property {
            id: id.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            price: price.to_string(),
            size: None,
            property_type,
            image: image.to_string(),
            images: vec![],
            status: None,
            is_featured: false,
            description: None,
            amenities: vec![],
            bed_bath: None,
            video_url: None,
        }
    }

    /// Gallery images, falling back to the primary image.
    pub fn gallery(&self) -> Vec<&str> {
        if self.images.is_empty() {
            vec![self.image.as_str()]
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    pub fn price_value(&self) -> f64 {
        crate::price::parse_price(&self.price)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct LocationItem {
    pub id: String,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct BlogItem {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub date: String,
    /// HTML body of the article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CategoryItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct HeroSlide {
    pub id: u32,
    pub image: String,
    pub title: String,
    pub subtitle: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn property_type_round_trips_through_its_name() {
        for property_type in PropertyType::iter() {
            let parsed = PropertyType::from_str(property_type.as_ref()).unwrap();
            assert_eq!(parsed, property_type);
        }
        assert!(PropertyType::from_str("Castle").is_err());
    }

    #[test]
    fn gallery_falls_back_to_primary_image() {
        let mut property = Property::new("x", "X", "Lonavala", "₹ 9 L", PropertyType::Plot, "a.jpg");
        assert_eq!(property.gallery(), vec!["a.jpg"]);

        property.images = vec!["b.jpg".to_string(), "c.jpg".to_string()];
        assert_eq!(property.gallery(), vec!["b.jpg", "c.jpg"]);
    }

    #[test]
    fn property_uses_seed_field_names_on_the_wire() {
        let mut property = Property::new("h1", "Villa", "Karjat", "₹ 75 L", PropertyType::Villa, "v.jpg");
        property.bed_bath = Some("3 BHK".to_string());
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["type"], "Villa");
        assert_eq!(value["bedBath"], "3 BHK");
        assert_eq!(value["isFeatured"], false);
        assert!(value.get("videoUrl").is_none());
    }
}
