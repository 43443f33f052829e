use crate::listing::SearchTab;
use crate::types::{LocationItem, Property};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub locations: Vec<String>,
    pub projects: Vec<Property>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Named locations first, then property locations, without duplicates.
pub fn location_suggestions(
    locations: &[LocationItem],
    properties: &[Property],
    query: &str,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    locations
        .iter()
        .map(|l| l.name.as_str())
        .chain(properties.iter().map(|p| p.location.as_str()))
        .filter(|name| seen.insert(*name))
        .filter(|name| contains_ignore_case(name, query))
        .map(str::to_string)
        .collect()
}

pub fn project_suggestions(properties: &[Property], query: &str) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| contains_ignore_case(&p.title, query) || contains_ignore_case(&p.location, query))
        .cloned()
        .collect()
}

pub fn suggest(
    tab: SearchTab,
    locations: &[LocationItem],
    properties: &[Property],
    location_query: &str,
    project_query: &str,
) -> Suggestions {
    let available = tab.filter(properties);
    Suggestions {
        locations: location_suggestions(locations, &available, location_query),
        projects: project_suggestions(&available, project_query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Catalog;

    #[test]
    fn empty_query_lists_every_distinct_location() {
        let catalog = Catalog::seed();
        let all = catalog.all_properties();
        let suggestions = location_suggestions(&catalog.locations, &all, "");
        assert_eq!(suggestions[..4], ["Uran Plots", "Chirle Plots", "Ranjanpada Plots", "Vindhane Plots"]);
        let distinct: HashSet<&String> = suggestions.iter().collect();
        assert_eq!(distinct.len(), suggestions.len());
        assert_eq!(
            suggestions.iter().filter(|s| s.as_str() == "Karjat, Navi Mumbai").count(),
            1
        );
    }

    #[test]
    fn location_query_ignores_case() {
        let catalog = Catalog::seed();
        let all = catalog.all_properties();
        let suggestions = location_suggestions(&catalog.locations, &all, "LONA");
        assert_eq!(suggestions, vec!["Lonavala"]);
    }

    #[test]
    fn projects_match_title_or_location() {
        let all = Catalog::seed().all_properties();
        let by_title: Vec<String> = project_suggestions(&all, "retreat").into_iter().map(|p| p.id).collect();
        assert_eq!(by_title, vec!["h4"]);
        let by_location: Vec<String> =
            project_suggestions(&all, "alibaug").into_iter().map(|p| p.id).collect();
        assert_eq!(by_location, vec!["p1"]);
    }

    #[test]
    fn tab_narrows_projects_before_matching() {
        let catalog = Catalog::seed();
        let all = catalog.all_properties();
        let suggestions = suggest(SearchTab::Residential, &catalog.locations, &all, "", "Khopoli");
        let ids: Vec<&str> = suggestions.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p3"]);
        assert!(!suggestions.locations.contains(&"Lonavala".to_string()));
    }
}
