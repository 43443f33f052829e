use crate::types::{Property, PropertyType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_MAX_PRICE: f64 = 200.0;
pub const MIN_SLIDER_PRICE: f64 = 5.0;
pub const MAX_SLIDER_PRICE: f64 = 200.0;
pub const SLIDER_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(PropertyType),
}

impl TypeFilter {
    pub fn matches(&self, property_type: PropertyType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == property_type,
        }
    }

    /// Cycles All -> Villa -> ... -> Commercial -> All.
    pub fn next(self) -> Self {
        use strum::IntoEnumIterator;
        let types: Vec<PropertyType> = PropertyType::iter().collect();
        match self {
            TypeFilter::All => TypeFilter::Only(types[0]),
            TypeFilter::Only(current) => {
                let idx = types.iter().position(|t| *t == current).unwrap_or(0);
                types
                    .get(idx + 1)
                    .copied()
                    .map(TypeFilter::Only)
                    .unwrap_or(TypeFilter::All)
            }
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "All"),
            TypeFilter::Only(property_type) => write!(f, "{property_type}"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        PropertyType::from_str(s).map(TypeFilter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub property_type: TypeFilter,
    /// Upper bound in lakhs, inclusive.
    pub max_price: f64,
    /// Case-insensitive substring of the location; empty matches everything.
    pub location: String,
}

impl Default for ListingFilter {
    fn default() -> Self {
        ListingFilter {
            property_type: TypeFilter::All,
            max_price: DEFAULT_MAX_PRICE,
            location: String::new(),
        }
    }
}

impl ListingFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if !self.property_type.matches(property.property_type) {
            return false;
        }
        if property.price_value() > self.max_price {
            return false;
        }
        if !self.location.is_empty()
            && !property
                .location
                .to_lowercase()
                .contains(&self.location.to_lowercase())
        {
            return false;
        }
        true
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, EnumString, Serialize, Deserialize,
)]
pub enum SortOrder {
    #[default]
    #[strum(serialize = "Featured")]
    Featured,
    #[strum(serialize = "Price: Low to High")]
    PriceLowToHigh,
    #[strum(serialize = "Price: High to Low")]
    PriceHighToLow,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::Featured => SortOrder::PriceLowToHigh,
            SortOrder::PriceLowToHigh => SortOrder::PriceHighToLow,
            SortOrder::PriceHighToLow => SortOrder::Featured,
        }
    }
}

pub fn visible_properties(all: &[Property], filter: &ListingFilter) -> Vec<Property> {
    all.iter().filter(|p| filter.matches(p)).cloned().collect()
}

/// Featured keeps the input order. Price orders are stable, so equal prices
/// keep their relative input order too.
pub fn sort_properties(mut properties: Vec<Property>, order: SortOrder) -> Vec<Property> {
    match order {
        SortOrder::Featured => {}
        SortOrder::PriceLowToHigh => {
            properties.sort_by(|a, b| a.price_value().total_cmp(&b.price_value()));
        }
        SortOrder::PriceHighToLow => {
            properties.sort_by(|a, b| b.price_value().total_cmp(&a.price_value()));
        }
    }
    properties
}

/// Snaps a requested max price onto the slider: 5..=200 lakhs in steps of 5.
pub fn clamp_max_price(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_MAX_PRICE;
    }
    let snapped = (value / SLIDER_STEP).round() * SLIDER_STEP;
    snapped.clamp(MIN_SLIDER_PRICE, MAX_SLIDER_PRICE)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn apply(&self, all: &[Property]) -> Vec<Property> {
        sort_properties(visible_properties(all, &self.filter), self.sort)
    }

    pub fn reset(&mut self) {
        *self = ListingQuery::default();
    }

    pub fn set_max_price(&mut self, value: f64) {
        self.filter.max_price = clamp_max_price(value);
    }

    pub fn raise_max_price(&mut self) {
        self.set_max_price(self.filter.max_price + SLIDER_STEP);
    }

    pub fn lower_max_price(&mut self) {
        self.set_max_price(self.filter.max_price - SLIDER_STEP);
    }
}

/// Tabs of the hero search box; each one narrows the catalog before the
/// autocomplete runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, EnumString, Serialize, Deserialize,
)]
pub enum SearchTab {
    #[default]
    Buy,
    #[strum(serialize = "Villa/Bungalow")]
    VillaBungalow,
    Residential,
    Commercial,
}

impl SearchTab {
    pub fn admits(&self, property_type: PropertyType) -> bool {
        match self {
            SearchTab::Buy => true,
            SearchTab::VillaBungalow => {
                matches!(property_type, PropertyType::Villa | PropertyType::Bungalow)
            }
            SearchTab::Residential => {
                matches!(property_type, PropertyType::Residential | PropertyType::Plot)
            }
            SearchTab::Commercial => property_type == PropertyType::Commercial,
        }
    }

    pub fn filter(&self, all: &[Property]) -> Vec<Property> {
        all.iter()
            .filter(|p| self.admits(p.property_type))
            .cloned()
            .collect()
    }
}

/// Category chips of the comparison table. "Plot" covers every land type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, EnumString, Serialize, Deserialize,
)]
pub enum CompareCategory {
    #[default]
    All,
    Villa,
    Bungalow,
    Plot,
}

impl CompareCategory {
    pub fn admits(&self, property_type: PropertyType) -> bool {
        match self {
            CompareCategory::All => true,
            CompareCategory::Villa => property_type == PropertyType::Villa,
            CompareCategory::Bungalow => property_type == PropertyType::Bungalow,
            CompareCategory::Plot => matches!(
                property_type,
                PropertyType::Plot | PropertyType::Residential | PropertyType::Commercial
            ),
        }
    }

    pub fn next(self) -> Self {
        match self {
            CompareCategory::All => CompareCategory::Villa,
            CompareCategory::Villa => CompareCategory::Bungalow,
            CompareCategory::Bungalow => CompareCategory::Plot,
            CompareCategory::Plot => CompareCategory::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Catalog;
    use strum::IntoEnumIterator;

    fn priced(id: &str, price: &str) -> Property {
        Property::new(id, id, "Somewhere", price, PropertyType::Plot, "img")
    }

    fn ids(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn default_filter_shows_whole_seed_catalog() {
        let all = Catalog::seed().all_properties();
        assert_eq!(visible_properties(&all, &ListingFilter::default()).len(), all.len());
    }

    #[test]
    fn every_visible_property_satisfies_every_predicate() {
        let all = Catalog::seed().all_properties();
        let type_filters =
            std::iter::once(TypeFilter::All).chain(PropertyType::iter().map(TypeFilter::Only));
        for property_type in type_filters {
            for max_price in [5.0, 9.0, 25.0, 75.0, 100.0, 200.0] {
                for location in ["", "karjat", "NAVI", "pali", "nowhere"] {
                    let filter = ListingFilter {
                        property_type,
                        max_price,
                        location: location.to_string(),
                    };
                    for p in visible_properties(&all, &filter) {
                        assert!(property_type.matches(p.property_type));
                        assert!(p.price_value() <= max_price);
                        assert!(p.location.to_lowercase().contains(&location.to_lowercase()));
                    }
                }
            }
        }
    }

    #[test]
    fn type_filter_is_exact() {
        let all = Catalog::seed().all_properties();
        let filter = ListingFilter {
            property_type: TypeFilter::Only(PropertyType::Bungalow),
            ..Default::default()
        };
        assert_eq!(ids(&visible_properties(&all, &filter)), vec!["h2", "h3"]);
    }

    #[test]
    fn max_price_is_inclusive_and_crore_aware() {
        let all = Catalog::seed().all_properties();
        let filter = ListingFilter {
            max_price: 100.0,
            ..Default::default()
        };
        let visible = visible_properties(&all, &filter);
        assert!(!ids(&visible).contains(&"h4"));

        let filter = ListingFilter {
            max_price: 9.0,
            ..Default::default()
        };
        assert_eq!(ids(&visible_properties(&all, &filter)), vec!["p1", "p4"]);
    }

    #[test]
    fn location_match_ignores_case() {
        let all = Catalog::seed().all_properties();
        let filter = ListingFilter {
            location: "KHOPOLI".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&visible_properties(&all, &filter)), vec!["h3", "p2", "p3"]);
    }

    #[test]
    fn unparseable_price_passes_the_lowest_price_cap() {
        let all = vec![priced("odd", "Price on Request"), priced("cheap", "₹ 9 L")];
        let filter = ListingFilter {
            max_price: 5.0,
            ..Default::default()
        };
        assert_eq!(ids(&visible_properties(&all, &filter)), vec!["odd"]);
    }

    #[test]
    fn sorts_low_to_high_across_units() {
        let list = vec![priced("25l", "₹25 L"), priced("9l", "₹9 L"), priced("12cr", "₹1.2 Cr")];
        let sorted = sort_properties(list, SortOrder::PriceLowToHigh);
        assert_eq!(ids(&sorted), vec!["9l", "25l", "12cr"]);
    }

    #[test]
    fn sorts_high_to_low() {
        let list = vec![priced("25l", "₹25 L"), priced("9l", "₹9 L"), priced("12cr", "₹1.2 Cr")];
        let sorted = sort_properties(list, SortOrder::PriceHighToLow);
        assert_eq!(ids(&sorted), vec!["12cr", "25l", "9l"]);
    }

    #[test]
    fn featured_keeps_seed_order() {
        let all = Catalog::seed().all_properties();
        let sorted = sort_properties(all.clone(), SortOrder::Featured);
        assert_eq!(sorted, all);
    }

    #[test]
    fn unparseable_price_sorts_ahead_of_cheap_listings() {
        let list = vec![priced("cheap", "₹ 9 L"), priced("odd", "On request")];
        let sorted = sort_properties(list, SortOrder::PriceLowToHigh);
        assert_eq!(ids(&sorted), vec!["odd", "cheap"]);
    }

    #[test]
    fn equal_prices_keep_input_order() {
        let all = Catalog::seed().all_properties();
        let sorted = sort_properties(all, SortOrder::PriceLowToHigh);
        assert_eq!(&ids(&sorted)[..2], &["p1", "p4"]);
    }

    #[test]
    fn sort_labels_match_the_dropdown() {
        let labels: Vec<String> = SortOrder::iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["Featured", "Price: Low to High", "Price: High to Low"]);
        assert_eq!(
            SortOrder::from_str("Price: High to Low").unwrap(),
            SortOrder::PriceHighToLow
        );
    }

    #[test]
    fn type_filter_parses_all_and_names() {
        assert_eq!(TypeFilter::from_str("All").unwrap(), TypeFilter::All);
        assert_eq!(TypeFilter::from_str("").unwrap(), TypeFilter::All);
        assert_eq!(
            TypeFilter::from_str("Plot").unwrap(),
            TypeFilter::Only(PropertyType::Plot)
        );
        assert!(TypeFilter::from_str("Castle").is_err());
    }

    #[test]
    fn type_filter_cycles_back_to_all() {
        let mut filter = TypeFilter::All;
        for _ in 0..PropertyType::iter().count() {
            filter = filter.next();
            assert_ne!(filter, TypeFilter::All);
        }
        assert_eq!(filter.next(), TypeFilter::All);
    }

    #[test]
    fn max_price_snaps_to_slider() {
        assert_eq!(clamp_max_price(0.0), 5.0);
        assert_eq!(clamp_max_price(42.0), 40.0);
        assert_eq!(clamp_max_price(43.0), 45.0);
        assert_eq!(clamp_max_price(500.0), 200.0);
        assert_eq!(clamp_max_price(f64::NAN), DEFAULT_MAX_PRICE);
    }

    #[test]
    fn query_reset_restores_defaults() {
        let mut query = ListingQuery::default();
        query.filter.location = "Lonavala".to_string();
        query.sort = SortOrder::PriceHighToLow;
        query.lower_max_price();
        assert_eq!(query.filter.max_price, 195.0);
        query.reset();
        assert_eq!(query, ListingQuery::default());
    }

    #[test]
    fn search_tabs_group_types() {
        let all = Catalog::seed().all_properties();
        assert_eq!(SearchTab::Buy.filter(&all).len(), all.len());
        assert!(SearchTab::VillaBungalow
            .filter(&all)
            .iter()
            .all(|p| matches!(p.property_type, PropertyType::Villa | PropertyType::Bungalow)));
        assert_eq!(ids(&SearchTab::Residential.filter(&all)), vec!["p1", "p3", "p4"]);
        assert!(SearchTab::Commercial.filter(&all).is_empty());
    }

    #[test]
    fn compare_plot_category_covers_all_land() {
        assert!(CompareCategory::Plot.admits(PropertyType::Residential));
        assert!(CompareCategory::Plot.admits(PropertyType::Commercial));
        assert!(!CompareCategory::Plot.admits(PropertyType::Villa));
        assert!(CompareCategory::All.admits(PropertyType::Bungalow));
    }
}
