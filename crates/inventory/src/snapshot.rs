//! Read-only, display-ready views of a card.

use serde::{Deserialize, Serialize};

use stockcard_core::{AggregateRoot, ValueObject};

use crate::card::{Card, CardStatus, RECEIPT_DATE_FORMAT};

pub const DEFAULT_CURRENCY: &str = "RUB";

const NOT_SPECIFIED: &str = "not specified";

/// How monetary values are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Suffix appended to costs, e.g. `9.99 RUB`.
    pub currency: String,
}

impl DisplaySettings {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl ValueObject for DisplaySettings {}

/// Immutable view of every card field, formatted for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSnapshot {
    pub id: String,
    pub name: String,
    pub quantity: u64,
    pub status: CardStatus,
    pub supplier: String,
    pub manufacturer: String,
    pub cost: String,
    pub location: String,
    pub article: String,
    pub warranty: String,
    pub receipt_date: String,
}

impl ValueObject for CardSnapshot {}

impl CardSnapshot {
    pub(crate) fn from_card(card: &Card, settings: &DisplaySettings) -> Self {
        Self {
            id: card.id().to_string(),
            name: card.name().to_string(),
            quantity: card.quantity(),
            status: card.status(),
            supplier: card.supplier().to_string(),
            manufacturer: card.manufacturer().to_string(),
            cost: format!("{:.2} {}", card.cost(), settings.currency),
            location: card.location().to_string(),
            article: if card.article().is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                card.article().to_string()
            },
            warranty: match card.warranty_months() {
                0 => "none".to_string(),
                months => format!("{months} months"),
            },
            receipt_date: card
                .receipt_date()
                .map(|date| date.format(RECEIPT_DATE_FORMAT).to_string())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        }
    }

    /// Labelled values in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Quantity", self.quantity.to_string()),
            ("Status", self.status.to_string()),
            ("Supplier", self.supplier.clone()),
            ("Manufacturer", self.manufacturer.clone()),
            ("Cost", self.cost.clone()),
            ("Location", self.location.clone()),
            ("Article", self.article.clone()),
            ("Warranty", self.warranty.clone()),
            ("Receipt date", self.receipt_date.clone()),
        ]
    }
}
