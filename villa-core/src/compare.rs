use crate::listing::CompareCategory;
use crate::types::Property;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const COMPARE_CAPACITY: usize = 3;
pub const CAPACITY_NOTICE: &str = "You can compare up to 3 properties at a time.";

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_STATUS: &str = "For Sale";
const DEFAULT_AMENITY: &str = "Standard Amenities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The set is full; nothing changed and the capacity notice should be shown.
    Rejected,
}

impl ToggleOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ToggleOutcome::Rejected => Some(CAPACITY_NOTICE),
            _ => None,
        }
    }
}

/// Ordered set of at most [`COMPARE_CAPACITY`] property ids. Insertion order
/// is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSelection {
    ids: Vec<String>,
}

impl CompareSelection {
    pub fn new() -> Self {
        CompareSelection { ids: Vec::new() }
    }

    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        if self.remove(id) {
            debug!("Removed {id} from compare, {} selected", self.ids.len());
            return ToggleOutcome::Removed;
        }
        if self.ids.len() >= COMPARE_CAPACITY {
            info!("Compare set full, rejected {id}");
            return ToggleOutcome::Rejected;
        }
        self.ids.push(id.to_string());
        debug!("Added {id} to compare, {} selected", self.ids.len());
        ToggleOutcome::Added
    }

    /// Returns whether the id was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        before != self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keeps only the ids for which `keep` holds, in their original order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Looks the selected ids up in `properties`, in selection order. Ids that
    /// no longer exist (deleted by an admin) are skipped.
    pub fn resolve(&self, properties: &[Property]) -> Vec<Property> {
        self.ids
            .iter()
            .filter_map(|id| properties.iter().find(|p| &p.id == id))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub properties: Vec<Property>,
    pub rows: Vec<ComparisonRow>,
}

fn text_row(label: &str, properties: &[Property], cell: impl Fn(&Property) -> String) -> ComparisonRow {
    ComparisonRow {
        label: label.to_string(),
        cells: properties.iter().map(|p| CellValue::Text(cell(p))).collect(),
    }
}

pub fn comparison_table(properties: &[Property], category: CompareCategory) -> ComparisonTable {
    let shown: Vec<Property> = properties
        .iter()
        .filter(|p| category.admits(p.property_type))
        .cloned()
        .collect();

    let rows = vec![
        text_row("Price", &shown, |p| p.price.clone()),
        text_row("Location", &shown, |p| p.location.clone()),
        text_row("Type", &shown, |p| p.property_type.to_string()),
        text_row("Size", &shown, |p| {
            p.size.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }),
        text_row("Configuration", &shown, |p| {
            p.bed_bath.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }),
        ComparisonRow {
            label: "Amenities".to_string(),
            cells: shown
                .iter()
                .map(|p| {
                    if p.amenities.is_empty() {
                        CellValue::List(vec![DEFAULT_AMENITY.to_string()])
                    } else {
                        CellValue::List(p.amenities.clone())
                    }
                })
                .collect(),
        },
        text_row("Status", &shown, |p| {
            p.status.clone().unwrap_or_else(|| DEFAULT_STATUS.to_string())
        }),
    ];

    ComparisonTable {
        properties: shown,
        rows,
    }
}
