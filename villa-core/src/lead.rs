use crate::errors::FieldErrors;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

const MIN_PHONE_DIGITS: usize = 10;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Interest {
    #[default]
    #[strum(serialize = "Buying Plot")]
    BuyingPlot,
    #[strum(serialize = "Buying Villa")]
    BuyingVilla,
    #[strum(serialize = "Investment")]
    Investment,
    #[strum(serialize = "Selling Property")]
    SellingProperty,
}

impl Interest {
    pub fn next(self) -> Self {
        match self {
            Interest::BuyingPlot => Interest::BuyingVilla,
            Interest::BuyingVilla => Interest::Investment,
            Interest::Investment => Interest::SellingProperty,
            Interest::SellingProperty => Interest::BuyingPlot,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    pub name: String,
    pub phone: String,
    pub interest: Interest,
}

fn valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    allowed && digits >= MIN_PHONE_DIGITS
}

impl LeadForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "is required");
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push("phone", "is required");
        } else if !valid_phone(phone) {
            errors.push("phone", "must be a mobile number with at least 10 digits");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub interest: Interest,
    pub received_at: DateTime<Utc>,
}

/// Submitted leads, kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct LeadInbox {
    leads: Vec<Lead>,
}

impl LeadInbox {
    pub fn submit(&mut self, form: LeadForm) -> Result<Lead> {
        form.validate()?;
        let lead = Lead {
            id: self.leads.len() as u64 + 1,
            name: form.name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            interest: form.interest,
            received_at: Utc::now(),
        };
        info!("Lead {} received: {}", lead.id, lead.interest);
        self.leads.push(lead.clone());
        Ok(lead)
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadModalPhase {
    Closed,
    Open,
    Submitted { at: Instant },
}

/// Lead popup lifecycle. Driven by `tick` from the surface's event loop.
#[derive(Debug, Clone)]
pub struct LeadModal {
    phase: LeadModalPhase,
    started: Instant,
    auto_opened: bool,
    popup_delay: Duration,
    success_delay: Duration,
}

impl LeadModal {
    pub fn new(started: Instant, popup_delay: Duration, success_delay: Duration) -> Self {
        LeadModal {
            phase: LeadModalPhase::Closed,
            started,
            auto_opened: false,
            popup_delay,
            success_delay,
        }
    }

    pub fn phase(&self) -> LeadModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != LeadModalPhase::Closed
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, LeadModalPhase::Submitted { .. })
    }

    pub fn open(&mut self) {
        if self.phase == LeadModalPhase::Closed {
            self.phase = LeadModalPhase::Open;
        }
    }

    pub fn close(&mut self) {
        self.phase = LeadModalPhase::Closed;
    }

    /// Opens once when the popup delay has passed, and closes the success
    /// panel when its delay has passed. Returns true if the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            LeadModalPhase::Closed
                if !self.auto_opened
                    && now.saturating_duration_since(self.started) >= self.popup_delay =>
            {
                self.auto_opened = true;
                self.phase = LeadModalPhase::Open;
                true
            }
            LeadModalPhase::Submitted { at }
                if now.saturating_duration_since(at) >= self.success_delay =>
            {
                self.phase = LeadModalPhase::Closed;
                true
            }
            _ => false,
        }
    }

    /// Files the form into `inbox`. The modal stays open on validation
    /// failure so the visitor can correct it.
    pub fn submit(&mut self, inbox: &mut LeadInbox, form: LeadForm, now: Instant) -> Result<Lead> {
        let lead = inbox.submit(form)?;
        self.auto_opened = true;
        self.phase = LeadModalPhase::Submitted { at: now };
        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::str::FromStr;

    fn form(name: &str, phone: &str) -> LeadForm {
        LeadForm {
            name: name.to_string(),
            phone: phone.to_string(),
            interest: Interest::Investment,
        }
    }

    fn modal(start: Instant) -> LeadModal {
        LeadModal::new(start, Duration::from_secs(5), Duration::from_secs(2))
    }

    #[test]
    fn interest_labels() {
        assert_eq!(Interest::SellingProperty.to_string(), "Selling Property");
        assert_eq!(Interest::from_str("Buying Villa").unwrap(), Interest::BuyingVilla);
        assert_eq!(Interest::SellingProperty.next(), Interest::BuyingPlot);
    }

    #[test]
    fn phone_rules() {
        assert!(form("Asha", "+91 98765-43210").validate().is_ok());
        assert!(form("Asha", "9876543210").validate().is_ok());
        assert!(form("Asha", "98765").validate().is_err());
        assert!(form("Asha", "98765 43210 ext").validate().is_err());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = form(" ", "").validate().unwrap_err();
        match err.kind() {
            ErrorKind::Validation(errors) => {
                assert!(errors.has("name"));
                assert!(errors.has("phone"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn inbox_numbers_and_trims_leads() {
        let mut inbox = LeadInbox::default();
        let first = inbox.submit(form(" Asha ", "9876543210")).unwrap();
        let second = inbox.submit(form("Ravi", "9123456780")).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.name, "Asha");
        assert!(inbox.submit(form("", "")).is_err());
        assert_eq!(inbox.len(), 2);
    }

    #[test]
    fn modal_auto_opens_once() {
        let start = Instant::now();
        let mut modal = modal(start);
        assert!(!modal.tick(start + Duration::from_secs(4)));
        assert!(modal.tick(start + Duration::from_secs(5)));
        assert!(modal.is_open());
        modal.close();
        assert!(!modal.tick(start + Duration::from_secs(60)));
        assert!(!modal.is_open());
    }

    #[test]
    fn success_panel_closes_after_delay() {
        let start = Instant::now();
        let mut modal = modal(start);
        let mut inbox = LeadInbox::default();
        modal.open();
        let at = start + Duration::from_secs(1);
        modal.submit(&mut inbox, form("Asha", "9876543210"), at).unwrap();
        assert!(modal.is_submitted());
        assert!(!modal.tick(at + Duration::from_millis(1999)));
        assert!(modal.tick(at + Duration::from_secs(2)));
        assert_eq!(modal.phase(), LeadModalPhase::Closed);
        // Submitting before the popup fired suppresses the auto-open.
        assert!(!modal.tick(start + Duration::from_secs(10)));
    }

    #[test]
    fn invalid_submit_keeps_modal_open() {
        let start = Instant::now();
        let mut modal = modal(start);
        let mut inbox = LeadInbox::default();
        modal.open();
        assert!(modal.submit(&mut inbox, form("", "1"), start).is_err());
        assert_eq!(modal.phase(), LeadModalPhase::Open);
        assert!(inbox.is_empty());
    }
}
