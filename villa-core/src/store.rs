use crate::errors::{ErrorKind, FieldErrors};
use crate::seed::{fallback_image, Catalog};
use crate::types::{Property, PropertyType};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

const NEW_LISTING_STATUS: &str = "For Sale";

pub type SharedPropertyStore = Arc<Mutex<PropertyStore>>;

/// Admin form input for a new listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDraft {
    pub title: String,
    pub price: String,
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub description: String,
    pub image: String,
}

impl PropertyDraft {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        for (field, value) in [
            ("title", &self.title),
            ("price", &self.price),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                errors.push(field, "is required");
            }
        }
        errors.into_result()
    }

    fn into_property(self, id: String) -> Property {
        let image = self.image.trim().to_string();
        let mut property = Property::new(
            &id,
            self.title.trim(),
            self.location.trim(),
            self.price.trim(),
            self.property_type.unwrap_or(PropertyType::Plot),
            if image.is_empty() {
                fallback_image()
            } else {
                &image
            },
        );
        if !image.is_empty() {
            property.images = vec![image];
        }
        let description = self.description.trim();
        if !description.is_empty() {
            property.description = Some(description.to_string());
        }
        property.status = Some(NEW_LISTING_STATUS.to_string());
        property.is_featured = false;
        property
    }
}

/// In-memory listing store. Lives as long as the process; nothing is written
/// anywhere.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    properties: Vec<Property>,
}

impl PropertyStore {
    pub fn new(properties: Vec<Property>) -> Self {
        PropertyStore { properties }
    }

    pub fn seeded(catalog: &Catalog) -> Self {
        PropertyStore::new(catalog.all_properties())
    }

    pub fn shared(self) -> SharedPropertyStore {
        Arc::new(Mutex::new(self))
    }

    pub fn all(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Validates the draft and appends it under a fresh `prop-<millis>` id.
    pub fn add(&mut self, draft: PropertyDraft) -> Result<Property> {
        draft.validate()?;
        let id = self.next_id(chrono::Utc::now().timestamp_millis());
        let property = draft.into_property(id);
        info!("Added property {} ({})", property.id, property.title);
        self.properties.push(property.clone());
        Ok(property)
    }

    pub fn delete(&mut self, id: &str) -> Result<Property> {
        let idx = self
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ErrorKind::PropertyNotFound(id.to_string()))?;
        let removed = self.properties.remove(idx);
        info!("Deleted property {id}");
        Ok(removed)
    }

    fn next_id(&self, millis: i64) -> String {
        let mut stamp = millis;
        loop {
            let candidate = format!("prop-{stamp}");
            if !self.contains(&candidate) {
                return candidate;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, price: &str, location: &str) -> PropertyDraft {
        PropertyDraft {
            title: title.to_string(),
            price: price.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn seeded_store_holds_catalog() {
        let store = PropertyStore::seeded(&Catalog::seed());
        assert_eq!(store.len(), 8);
        assert_eq!(store.get("h4").unwrap().price, "₹ 1.2 Cr");
    }

    #[test]
    fn add_applies_defaults() {
        let mut store = PropertyStore::default();
        let added = store.add(draft("Sea View Plot", "₹ 30 L", "Uran")).unwrap();
        assert!(added.id.starts_with("prop-"));
        assert_eq!(added.property_type, PropertyType::Plot);
        assert_eq!(added.image, fallback_image());
        assert!(added.images.is_empty());
        assert_eq!(added.status.as_deref(), Some("For Sale"));
        assert!(!added.is_featured);
        assert_eq!(store.all(), [added]);
    }

    #[test]
    fn add_with_image_fills_gallery() {
        let mut store = PropertyStore::default();
        let mut input = draft("Corner Shop", "₹ 80 L", "Panvel");
        input.property_type = Some(PropertyType::Commercial);
        input.image = "data:image/png;base64,AAAA".to_string();
        let added = store.add(input).unwrap();
        assert_eq!(added.images, vec!["data:image/png;base64,AAAA".to_string()]);
        assert_eq!(added.property_type, PropertyType::Commercial);
    }

    #[test]
    fn blank_required_fields_block_submission() {
        let mut store = PropertyStore::default();
        let err = store.add(draft(" ", "", "Uran")).unwrap_err();
        match err.kind() {
            ErrorKind::Validation(errors) => {
                assert!(errors.has("title"));
                assert!(errors.has("price"));
                assert!(!errors.has("location"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn ids_do_not_collide_within_the_same_millisecond() {
        let store = PropertyStore::new(vec![Property::new(
            "prop-42",
            "t",
            "l",
            "₹ 1 L",
            PropertyType::Plot,
            "i",
        )]);
        assert_eq!(store.next_id(42), "prop-43");
        assert_eq!(store.next_id(7), "prop-7");
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let mut store = PropertyStore::seeded(&Catalog::seed());
        let removed = store.delete("p2").unwrap();
        assert_eq!(removed.id, "p2");
        assert!(!store.contains("p2"));
        let err = store.delete("p2").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PropertyNotFound(id) if id == "p2"));
    }
}
