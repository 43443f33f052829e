use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current page. A selection only exists inside the state that shows it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    Home,
    Listing,
    PropertyDetail(String),
    BlogDetail(String),
}

impl View {
    pub fn selected_property(&self) -> Option<&str> {
        match self {
            View::PropertyDetail(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn selected_blog(&self) -> Option<&str> {
        match self {
            View::BlogDetail(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Listing => "Listing",
            View::PropertyDetail(_) => "PropertyDetail",
            View::BlogDetail(_) => "BlogDetail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavAction {
    SelectProperty(String),
    SelectBlog(String),
    SeeMore,
    Back,
}

/// Side effect the surface must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ScrollToTop,
}

/// Four-state page machine. There is no history: back always lands on Home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    pub fn new() -> Self {
        ViewRouter { current: View::Home }
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn dispatch(&mut self, action: NavAction) -> Navigation {
        let next = match action {
            NavAction::SelectProperty(id) => View::PropertyDetail(id),
            NavAction::SelectBlog(id) => View::BlogDetail(id),
            NavAction::SeeMore => View::Listing,
            NavAction::Back => View::Home,
        };
        debug!("Navigating {} -> {}", self.current.name(), next.name());
        self.current = next;
        Navigation::ScrollToTop
    }

    pub fn select_property(&mut self, id: &str) -> Navigation {
        self.dispatch(NavAction::SelectProperty(id.to_string()))
    }

    pub fn select_blog(&mut self, id: &str) -> Navigation {
        self.dispatch(NavAction::SelectBlog(id.to_string()))
    }

    pub fn see_more(&mut self) -> Navigation {
        self.dispatch(NavAction::SeeMore)
    }

    pub fn back(&mut self) -> Navigation {
        self.dispatch(NavAction::Back)
    }
}
