use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use stockcard_core::{AggregateRoot, CardId, DomainError, DomainResult};

use crate::confirmation::{WriteOffConfirmation, WriteOffRequest};
use crate::snapshot::{CardSnapshot, DisplaySettings};

/// Textual format of receipt dates, both for input and display (`DD.MM.YYYY`).
pub const RECEIPT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Card status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Draft,
    InStock,
    WrittenOff,
}

impl CardStatus {
    pub const ALL: [CardStatus; 3] = [
        CardStatus::Draft,
        CardStatus::InStock,
        CardStatus::WrittenOff,
    ];

    /// The only status a card may hold before moving into `self`.
    pub fn required_predecessor(self) -> Option<CardStatus> {
        match self {
            CardStatus::Draft => None,
            CardStatus::InStock => Some(CardStatus::Draft),
            CardStatus::WrittenOff => Some(CardStatus::InStock),
        }
    }

    pub fn can_transition_to(self, next: CardStatus) -> bool {
        matches!(
            (self, next),
            (CardStatus::Draft, CardStatus::InStock) | (CardStatus::InStock, CardStatus::WrittenOff)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == CardStatus::WrittenOff
    }

    fn key(self) -> &'static str {
        match self {
            CardStatus::Draft => "draft",
            CardStatus::InStock => "in_stock",
            CardStatus::WrittenOff => "written_off",
        }
    }
}

impl core::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            CardStatus::Draft => "draft",
            CardStatus::InStock => "in stock",
            CardStatus::WrittenOff => "written off",
        };
        f.write_str(label)
    }
}

impl FromStr for CardStatus {
    type Err = DomainError;

    /// Accepts the machine key (`in_stock`) or the display label (`in stock`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CardStatus::ALL
            .into_iter()
            .find(|status| status.key() == wanted || status.to_string() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<String> = CardStatus::ALL.iter().map(|status| status.to_string()).collect();
                DomainError::validation(format!(
                    "invalid status {s:?}; allowed values: {}",
                    allowed.join(", ")
                ))
            })
    }
}

/// Input for [`Card::create`].
///
/// Numbers are taken signed so that out-of-range operator input reaches the
/// card's own validation instead of being rejected by the type system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFields {
    pub name: String,
    pub quantity: i64,
    pub supplier: String,
    pub manufacturer: String,
    pub cost: f64,
    pub location: String,
    #[serde(default)]
    pub article: String,
    #[serde(default)]
    pub warranty_months: i64,
    /// `DD.MM.YYYY`, or empty for "not specified".
    #[serde(default)]
    pub receipt_date: String,
}

impl CardFields {
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        supplier: impl Into<String>,
        manufacturer: impl Into<String>,
        cost: f64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            supplier: supplier.into(),
            manufacturer: manufacturer.into(),
            cost,
            location: location.into(),
            article: String::new(),
            warranty_months: 0,
            receipt_date: String::new(),
        }
    }

    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        self.article = article.into();
        self
    }

    pub fn with_warranty_months(mut self, months: i64) -> Self {
        self.warranty_months = months;
        self
    }

    pub fn with_receipt_date(mut self, date: impl Into<String>) -> Self {
        self.receipt_date = date.into();
        self
    }
}

/// Sparse input for [`Card::update`]: only the `Some` slots are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub supplier: Option<String>,
    pub manufacturer: Option<String>,
    pub cost: Option<f64>,
    pub location: Option<String>,
    pub article: Option<String>,
    pub warranty_months: Option<i64>,
    pub receipt_date: Option<String>,
}

impl CardPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.supplier.is_none()
            && self.manufacturer.is_none()
            && self.cost.is_none()
            && self.location.is_none()
            && self.article.is_none()
            && self.warranty_months.is_none()
            && self.receipt_date.is_none()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        self.article = Some(article.into());
        self
    }

    pub fn with_warranty_months(mut self, months: i64) -> Self {
        self.warranty_months = Some(months);
        self
    }

    pub fn with_receipt_date(mut self, date: impl Into<String>) -> Self {
        self.receipt_date = Some(date.into());
        self
    }
}

/// Aggregate root: Card.
///
/// One product record. Owned by exactly one registry entry; callers outside
/// the registry only ever see `&Card` or a [`CardSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    name: String,
    quantity: u64,
    supplier: String,
    manufacturer: String,
    cost: f64,
    location: String,
    article: String,
    warranty_months: u32,
    receipt_date: Option<NaiveDate>,
    status: CardStatus,
    version: u64,
}

impl Card {
    /// Create an empty, not-yet-populated card in `Draft` status.
    pub fn empty(id: CardId) -> Self {
        Self {
            id,
            name: String::new(),
            quantity: 0,
            supplier: String::new(),
            manufacturer: String::new(),
            cost: 0.0,
            location: String::new(),
            article: String::new(),
            warranty_months: 0,
            receipt_date: None,
            status: CardStatus::Draft,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> &CardId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn article(&self) -> &str {
        &self.article
    }

    pub fn warranty_months(&self) -> u32 {
        self.warranty_months
    }

    pub fn receipt_date(&self) -> Option<NaiveDate> {
        self.receipt_date
    }

    pub fn status(&self) -> CardStatus {
        self.status
    }

    pub fn is_written_off(&self) -> bool {
        self.status.is_terminal()
    }
}

impl AggregateRoot for Card {
    type Id = CardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn required_text(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn non_negative<T: TryFrom<i64>>(value: i64, field: &str) -> DomainResult<T> {
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    T::try_from(value).map_err(|_| DomainError::validation(format!("{field} is too large")))
}

// Field setters. Each validates first and only assigns on success; none
// accepts a value once the card is written off.
impl Card {
    /// Fails with `InvalidState` once the card is written off.
    pub fn ensure_mutable(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state(format!(
                "card {} is written off and cannot be modified",
                self.id
            )));
        }
        Ok(())
    }

    pub fn set_name(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.name = required_text(value, "name")?;
        Ok(())
    }

    pub fn set_quantity(&mut self, value: i64) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.quantity = non_negative(value, "quantity")?;
        Ok(())
    }

    pub fn set_supplier(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.supplier = required_text(value, "supplier")?;
        Ok(())
    }

    pub fn set_manufacturer(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.manufacturer = required_text(value, "manufacturer")?;
        Ok(())
    }

    pub fn set_cost(&mut self, value: f64) -> DomainResult<()> {
        self.ensure_mutable()?;
        if !value.is_finite() {
            return Err(DomainError::validation("cost must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation("cost cannot be negative"));
        }
        // Normalises -0.0 so it never renders as "-0.00".
        self.cost = value + 0.0;
        Ok(())
    }

    pub fn set_location(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.location = required_text(value, "location")?;
        Ok(())
    }

    /// Article code is optional; blank input clears it.
    pub fn set_article(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.article = value.trim().to_string();
        Ok(())
    }

    pub fn set_warranty_months(&mut self, value: i64) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.warranty_months = non_negative(value, "warranty")?;
        Ok(())
    }

    /// Blank input unsets the date.
    pub fn set_receipt_date(&mut self, value: &str) -> DomainResult<()> {
        self.ensure_mutable()?;
        let value = value.trim();
        if value.is_empty() {
            self.receipt_date = None;
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(value, RECEIPT_DATE_FORMAT).map_err(|_| {
            DomainError::validation("receipt date must be in DD.MM.YYYY format")
        })?;
        self.receipt_date = Some(date);
        Ok(())
    }

    /// Transitions are driven by [`Card::create`] and [`Card::decommission`].
    pub(crate) fn set_status(&mut self, next: CardStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            let message = match next.required_predecessor() {
                Some(required) => format!(
                    "status '{next}' requires current status '{required}' (card is '{}')",
                    self.status
                ),
                None => format!("status '{next}' is only valid for a new card"),
            };
            return Err(DomainError::invalid_state(message));
        }
        if next == CardStatus::InStock {
            self.ensure_populated()?;
        }
        self.status = next;
        Ok(())
    }

    fn ensure_populated(&self) -> DomainResult<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("supplier", &self.supplier),
            ("manufacturer", &self.manufacturer),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(DomainError::invalid_state(format!(
                "status '{}' requires {} to be set",
                CardStatus::InStock,
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

// Lifecycle operations.
impl Card {
    /// Populate a `Draft` card and promote it to `InStock`.
    ///
    /// Fields are assigned in declaration order; the first invalid one aborts
    /// and the card stays `Draft`.
    pub fn create(&mut self, fields: &CardFields) -> DomainResult<()> {
        if self.status != CardStatus::Draft {
            return Err(DomainError::invalid_state(format!(
                "create requires status '{}'",
                CardStatus::Draft
            )));
        }

        self.populate(fields)
            .inspect_err(|e| debug!(card_id = %self.id, error = %e, "card creation rejected"))?;
        self.set_status(CardStatus::InStock)?;
        self.version += 1;

        info!(card_id = %self.id, "card created");
        Ok(())
    }

    fn populate(&mut self, fields: &CardFields) -> DomainResult<()> {
        self.set_name(&fields.name)?;
        self.set_quantity(fields.quantity)?;
        self.set_supplier(&fields.supplier)?;
        self.set_manufacturer(&fields.manufacturer)?;
        self.set_cost(fields.cost)?;
        self.set_location(&fields.location)?;
        self.set_article(&fields.article)?;
        self.set_warranty_months(fields.warranty_months)?;
        self.set_receipt_date(&fields.receipt_date)
    }

    /// Apply the present slots of `patch`, in declaration order.
    ///
    /// Not atomic: when a later slot fails validation, earlier slots stay
    /// applied.
    pub fn update(&mut self, patch: &CardPatch) -> DomainResult<()> {
        self.ensure_mutable()
            .inspect_err(|_| debug!(card_id = %self.id, "update rejected for written off card"))?;
        if patch.is_empty() {
            return Ok(());
        }

        self.apply_patch(patch)
            .inspect_err(|e| debug!(card_id = %self.id, error = %e, "card update stopped"))?;
        self.version += 1;

        info!(card_id = %self.id, "card updated");
        Ok(())
    }

    fn apply_patch(&mut self, patch: &CardPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            self.set_name(name)?;
        }
        if let Some(quantity) = patch.quantity {
            self.set_quantity(quantity)?;
        }
        if let Some(supplier) = &patch.supplier {
            self.set_supplier(supplier)?;
        }
        if let Some(manufacturer) = &patch.manufacturer {
            self.set_manufacturer(manufacturer)?;
        }
        if let Some(cost) = patch.cost {
            self.set_cost(cost)?;
        }
        if let Some(location) = &patch.location {
            self.set_location(location)?;
        }
        if let Some(article) = &patch.article {
            self.set_article(article)?;
        }
        if let Some(months) = patch.warranty_months {
            self.set_warranty_months(months)?;
        }
        if let Some(date) = &patch.receipt_date {
            self.set_receipt_date(date)?;
        }
        Ok(())
    }

    /// Move an `InStock` card to the terminal `WrittenOff` status.
    ///
    /// Stock still on hand needs the operator's confirmation; an empty card is
    /// written off without asking.
    pub fn decommission(&mut self, confirmation: &mut dyn WriteOffConfirmation) -> DomainResult<()> {
        if self.status != CardStatus::InStock {
            return Err(DomainError::invalid_state(format!(
                "write-off requires status '{}' (card is '{}')",
                CardStatus::InStock,
                self.status
            )));
        }

        if self.quantity > 0 {
            let request = WriteOffRequest {
                card_id: &self.id,
                name: &self.name,
                remaining: self.quantity,
            };
            if !confirmation.confirm(&request) {
                warn!(card_id = %self.id, remaining = self.quantity, "write-off cancelled");
                return Err(DomainError::cancelled("write-off cancelled by operator"));
            }
        }

        self.set_status(CardStatus::WrittenOff)?;
        self.version += 1;

        info!(card_id = %self.id, "card written off");
        Ok(())
    }

    /// Read-only view with the default display settings.
    pub fn snapshot(&self) -> CardSnapshot {
        self.snapshot_with(&DisplaySettings::default())
    }

    pub fn snapshot_with(&self, settings: &DisplaySettings) -> CardSnapshot {
        CardSnapshot::from_card(self, settings)
    }
}
