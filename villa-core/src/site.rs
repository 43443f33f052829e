use crate::admin::AdminGate;
use crate::chat::{ChatSession, Responder, ScriptedResponder};
use crate::compare::{comparison_table, CompareSelection, ComparisonTable, ToggleOutcome};
use crate::config::SiteConfig;
use crate::errors::ErrorKind;
use crate::home::{similar_properties, HomeSections, SIMILAR_LIMIT};
use crate::lead::{Lead, LeadForm, LeadInbox, LeadModal};
use crate::listing::{CompareCategory, ListingQuery, SearchTab};
use crate::router::{Navigation, View, ViewRouter};
use crate::search::{suggest, Suggestions};
use crate::seed::Catalog;
use crate::store::{PropertyStore, SharedPropertyStore};
use crate::types::{BlogItem, Property};
use crate::Result;
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Instant;

/// Everything one visitor sees. Surfaces read through the accessors and
/// mutate only through the methods below.
#[derive(Debug)]
pub struct SiteState {
    config: SiteConfig,
    catalog: Catalog,
    store: SharedPropertyStore,
    router: ViewRouter,
    compare: CompareSelection,
    compare_open: bool,
    compare_category: CompareCategory,
    listing: ListingQuery,
    chat: ChatSession,
    leads: LeadInbox,
    lead_modal: LeadModal,
    admin: AdminGate,
}

impl SiteState {
    pub fn new(config: SiteConfig, catalog: Catalog) -> Self {
        let responder = Arc::new(ScriptedResponder::new(&config.contact));
        Self::with_responder(config, catalog, responder)
    }

    pub fn with_responder(
        config: SiteConfig,
        catalog: Catalog,
        responder: Arc<dyn Responder>,
    ) -> Self {
        let store = PropertyStore::seeded(&catalog).shared();
        let chat = ChatSession::new(&config.brand, responder, config.delays.chat_reply());
        let lead_modal = LeadModal::new(
            Instant::now(),
            config.delays.lead_popup(),
            config.delays.lead_success(),
        );
        let admin = AdminGate::new(config.admin.clone(), config.delays.admin_login());
        SiteState {
            config,
            catalog,
            store,
            router: ViewRouter::new(),
            compare: CompareSelection::new(),
            compare_open: false,
            compare_category: CompareCategory::default(),
            listing: ListingQuery::default(),
            chat,
            leads: LeadInbox::default(),
            lead_modal,
            admin,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> SharedPropertyStore {
        self.store.clone()
    }

    fn locked_store(&self) -> MutexGuard<'_, PropertyStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the live listings, admin changes included.
    pub fn properties(&self) -> Vec<Property> {
        self.locked_store().all().to_vec()
    }

    pub fn home(&self) -> HomeSections {
        HomeSections::build(&self.catalog, &self.properties())
    }

    // Navigation

    pub fn view(&self) -> &View {
        self.router.current()
    }

    pub fn select_property(&mut self, id: &str) -> Navigation {
        self.router.select_property(id)
    }

    pub fn select_blog(&mut self, id: &str) -> Navigation {
        self.router.select_blog(id)
    }

    pub fn see_more(&mut self) -> Navigation {
        self.router.see_more()
    }

    pub fn back(&mut self) -> Navigation {
        self.router.back()
    }

    /// Record behind the detail view, if the view is a detail view.
    pub fn current_property(&self) -> Result<Option<Property>> {
        match self.router.current().selected_property() {
            Some(id) => self
                .locked_store()
                .get(id)
                .cloned()
                .map(Some)
                .ok_or_else(|| ErrorKind::PropertyNotFound(id.to_string()).into()),
            None => Ok(None),
        }
    }

    pub fn current_blog(&self) -> Result<Option<BlogItem>> {
        match self.router.current().selected_blog() {
            Some(id) => self
                .catalog
                .blog(id)
                .cloned()
                .map(Some)
                .ok_or_else(|| ErrorKind::BlogNotFound(id.to_string()).into()),
            None => Ok(None),
        }
    }

    pub fn similar(&self) -> Vec<Property> {
        match self.router.current().selected_property() {
            Some(id) => similar_properties(&self.home().popular, id, SIMILAR_LIMIT),
            None => Vec::new(),
        }
    }

    // Listing

    pub fn listing(&self) -> &ListingQuery {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut ListingQuery {
        &mut self.listing
    }

    pub fn visible_listing(&self) -> Vec<Property> {
        self.listing.apply(&self.properties())
    }

    pub fn search(&self, tab: SearchTab, location: &str, project: &str) -> Suggestions {
        suggest(
            tab,
            &self.catalog.locations,
            &self.properties(),
            location,
            project,
        )
    }

    // Compare

    /// Ids deleted from the store no longer hold a compare slot.
    fn prune_compare(&mut self) {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        self.compare.retain(|id| store.contains(id));
    }

    pub fn toggle_compare(&mut self, id: &str) -> ToggleOutcome {
        self.prune_compare();
        self.compare.toggle(id)
    }

    pub fn is_compared(&self, id: &str) -> bool {
        self.compare.contains(id)
    }

    pub fn remove_compare(&mut self, id: &str) -> bool {
        self.compare.remove(id)
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
    }

    /// The live selection: ids of deleted properties are left out.
    pub fn compare_selection(&self) -> CompareSelection {
        let store = self.locked_store();
        let mut selection = self.compare.clone();
        selection.retain(|id| store.contains(id));
        selection
    }

    pub fn open_compare(&mut self) {
        self.compare_open = true;
    }

    pub fn close_compare(&mut self) {
        self.compare_open = false;
    }

    pub fn is_compare_open(&self) -> bool {
        self.compare_open
    }

    pub fn compare_category(&self) -> CompareCategory {
        self.compare_category
    }

    pub fn set_compare_category(&mut self, category: CompareCategory) {
        self.compare_category = category;
    }

    pub fn comparison(&self) -> ComparisonTable {
        let selected = self.compare.resolve(&self.properties());
        comparison_table(&selected, self.compare_category)
    }

    // Chat

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    // Leads

    pub fn lead_modal(&self) -> &LeadModal {
        &self.lead_modal
    }

    pub fn lead_modal_mut(&mut self) -> &mut LeadModal {
        &mut self.lead_modal
    }

    pub fn leads(&self) -> &LeadInbox {
        &self.leads
    }

    pub fn submit_lead(&mut self, form: LeadForm, now: Instant) -> Result<Lead> {
        self.lead_modal.submit(&mut self.leads, form, now)
    }

    /// Advances timer-driven state. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.lead_modal.tick(now)
    }

    // Admin

    pub fn admin_gate(&self) -> &AdminGate {
        &self.admin
    }
}

impl Default for SiteState {
    fn default() -> Self {
        SiteState::new(SiteConfig::default(), Catalog::seed())
    }
}
