use crate::config::ContactConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::Display;
use tracing::debug;

pub const QUICK_OPTIONS: [&str; 4] = [
    "View Properties",
    "Request Callback",
    "Investment Plans",
    "Contact Support",
];

/// Quick options stay visible while the transcript is shorter than this.
const QUICK_OPTIONS_UNTIL: usize = 4;

const FALLBACK_REPLY: &str =
    "Thanks for your inquiry! Our agents are currently busy, but we'll get back to you shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ChatCategory {
    Price,
    Location,
    Villa,
    Plot,
    Contact,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ChatRule {
    pub category: ChatCategory,
    pub keywords: &'static [&'static str],
    pub response: String,
}

impl ChatRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(*k))
    }
}

#[async_trait]
pub trait Responder: Send + Sync + std::fmt::Debug {
    async fn respond(&self, text: &str) -> String;
}

/// Keyword table evaluated in order; the first rule whose keyword occurs in
/// the lowercased input wins.
#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    rules: Vec<ChatRule>,
    fallback: String,
}

impl ScriptedResponder {
    pub fn new(contact: &ContactConfig) -> Self {
        fn rule(
            category: ChatCategory,
            keywords: &'static [&'static str],
            response: &str,
        ) -> ChatRule {
            ChatRule {
                category,
                keywords,
                response: response.to_string(),
            }
        }
        ScriptedResponder {
            rules: vec![
                rule(
                    ChatCategory::Price,
                    &["price", "cost"],
                    "Our properties range from ₹9L to ₹2Cr+. Would you like to see properties within a specific budget?",
                ),
                rule(
                    ChatCategory::Location,
                    &["location", "where"],
                    "We have prime properties in Karjat, Alibaug, and near the new Atal Setu. Which location interests you?",
                ),
                rule(
                    ChatCategory::Villa,
                    &["villa", "house"],
                    "Villas are a great choice! We have 3BHK and 4BHK luxury villas available.",
                ),
                rule(
                    ChatCategory::Plot,
                    &["plot", "land"],
                    "Investing in plots is a smart move. We have residential and commercial plots with high ROI potential.",
                ),
                rule(
                    ChatCategory::Contact,
                    &["contact", "call"],
                    &format!(
                        "You can reach us at {} or email {}.",
                        contact.phone, contact.email
                    ),
                ),
            ],
            fallback: FALLBACK_REPLY.to_string(),
        }
    }

    pub fn with_rules(rules: Vec<ChatRule>, fallback: &str) -> Self {
        ScriptedResponder {
            rules,
            fallback: fallback.to_string(),
        }
    }

    /// First rule whose keywords occur in `text`, case-insensitively.
    pub fn matching_rule(&self, text: &str) -> Option<&ChatRule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lowered))
    }

    /// Category and reply from a single pass over the rule table.
    pub fn answer(&self, text: &str) -> (ChatCategory, &str) {
        match self.matching_rule(text) {
            Some(rule) => (rule.category, rule.response.as_str()),
            None => (ChatCategory::Fallback, self.fallback.as_str()),
        }
    }

    pub fn classify(&self, text: &str) -> ChatCategory {
        self.answer(text).0
    }

    pub fn reply_for(&self, text: &str) -> &str {
        self.answer(text).1
    }
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        ScriptedResponder::new(&ContactConfig::default())
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    async fn respond(&self, text: &str) -> String {
        let (category, reply) = self.answer(text);
        debug!("Chat input classified as {category}");
        reply.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    typing: bool,
}

fn time_label() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

impl ChatTranscript {
    pub fn new(brand: &str) -> Self {
        let greetings = [
            format!("Hello! Welcome to {brand}. 👋"),
            "I'm your virtual assistant. How can I help you find your dream property today?"
                .to_string(),
        ];
        let messages: Vec<ChatMessage> = greetings
            .into_iter()
            .enumerate()
            .map(|(idx, text)| ChatMessage {
                id: idx as u64 + 1,
                text,
                sender: Sender::Bot,
                time: "Just now".to_string(),
            })
            .collect();
        let next_id = messages.len() as u64 + 1;
        ChatTranscript {
            messages,
            next_id,
            typing: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn quick_options_visible(&self) -> bool {
        self.messages.len() < QUICK_OPTIONS_UNTIL
    }

    fn push(&mut self, text: &str, sender: Sender) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text: text.to_string(),
            sender,
            time: time_label(),
        });
        id
    }

    /// Appends the visitor's message and starts the typing indicator.
    /// Blank input is ignored.
    pub fn push_user(&mut self, text: &str) -> Option<u64> {
        if text.trim().is_empty() {
            return None;
        }
        self.typing = true;
        Some(self.push(text, Sender::User))
    }

    pub fn push_bot(&mut self, text: &str) -> u64 {
        self.typing = false;
        self.push(text, Sender::Bot)
    }
}

/// A reply that has been asked for but not produced yet.
#[derive(Debug, Clone)]
pub struct PendingReply {
    text: String,
    responder: Arc<dyn Responder>,
    delay: Duration,
}

impl PendingReply {
    pub async fn resolve(self) -> String {
        tokio::time::sleep(self.delay).await;
        self.responder.respond(&self.text).await
    }
}

/// Transcript plus the responder that answers it after a fixed delay.
#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: ChatTranscript,
    responder: Arc<dyn Responder>,
    reply_delay: Duration,
}

impl ChatSession {
    pub fn new(brand: &str, responder: Arc<dyn Responder>, reply_delay: Duration) -> Self {
        ChatSession {
            transcript: ChatTranscript::new(brand),
            responder,
            reply_delay,
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Records the visitor's message and hands back the reply to wait for.
    /// Event loops resolve it elsewhere and call [`ChatSession::finish`].
    pub fn begin(&mut self, text: &str) -> Option<PendingReply> {
        self.transcript.push_user(text)?;
        Some(PendingReply {
            text: text.to_string(),
            responder: self.responder.clone(),
            delay: self.reply_delay,
        })
    }

    pub fn finish(&mut self, reply: &str) -> u64 {
        self.transcript.push_bot(reply)
    }

    /// Returns the bot reply, or `None` for blank input.
    pub async fn send(&mut self, text: &str) -> Option<String> {
        let pending = self.begin(text)?;
        let reply = pending.resolve().await;
        self.finish(&reply);
        Some(reply)
    }
}
