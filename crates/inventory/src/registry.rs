//! In-memory card registry.
//!
//! Owns every card for the lifetime of one session. Lookups go through a
//! hash index; the backing vector keeps insertion order for listing.

use std::collections::HashMap;

use tracing::debug;

use stockcard_core::{AggregateRoot, CardId, DomainError, DomainResult};

use crate::card::{Card, CardFields, CardPatch, CardStatus};
use crate::confirmation::WriteOffConfirmation;
use crate::snapshot::{CardSnapshot, DisplaySettings};

pub const EMPTY_LISTING_MESSAGE: &str = "No cards created";

/// Keyed collection of cards, explicitly constructed and owned by its caller.
#[derive(Debug, Default)]
pub struct Registry {
    cards: Vec<Card>,
    index: HashMap<CardId, usize>,
    settings: DisplaySettings,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DisplaySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    /// Cards in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Register a new card under `id`.
    ///
    /// The card is stored only if [`Card::create`] succeeds.
    pub fn create_card(&mut self, id: CardId, fields: &CardFields) -> DomainResult<&Card> {
        if self.contains(&id) {
            debug!(card_id = %id, "duplicate card id rejected");
            return Err(DomainError::duplicate(id.as_str()));
        }

        let mut card = Card::empty(id.clone());
        card.create(fields)?;

        let position = self.cards.len();
        self.cards.push(card);
        self.index.insert(id, position);
        Ok(&self.cards[position])
    }

    pub fn update_card(&mut self, id: &CardId, patch: &CardPatch) -> DomainResult<&Card> {
        let card = self.card_mut(id)?;
        card.update(patch)?;
        Ok(&*card)
    }

    pub fn get_card(&self, id: &CardId) -> DomainResult<CardSnapshot> {
        let card = self.get_card_object(id)?;
        Ok(card.snapshot_with(&self.settings))
    }

    /// Borrow the card itself, e.g. to branch on its status before mutating.
    pub fn get_card_object(&self, id: &CardId) -> DomainResult<&Card> {
        self.index
            .get(id)
            .map(|&position| &self.cards[position])
            .ok_or_else(|| DomainError::not_found(id.as_str()))
    }

    pub fn write_off_card(
        &mut self,
        id: &CardId,
        confirmation: &mut dyn WriteOffConfirmation,
    ) -> DomainResult<&Card> {
        let card = self.card_mut(id)?;
        card.decommission(confirmation)?;
        Ok(&*card)
    }

    pub fn list_cards(&self) -> CardListing {
        CardListing {
            lines: self
                .cards
                .iter()
                .map(|card| CardListLine {
                    id: card.id().clone(),
                    name: card.name().to_string(),
                    status: card.status(),
                    quantity: card.quantity(),
                })
                .collect(),
        }
    }

    fn card_mut(&mut self, id: &CardId) -> DomainResult<&mut Card> {
        match self.index.get(id) {
            Some(&position) => Ok(&mut self.cards[position]),
            None => Err(DomainError::not_found(id.as_str())),
        }
    }
}

/// One summary row of [`Registry::list_cards`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardListLine {
    pub id: CardId,
    pub name: String,
    pub status: CardStatus,
    pub quantity: u64,
}

impl core::fmt::Display for CardListLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {} | {} | {} pcs.",
            self.id, self.name, self.status, self.quantity
        )
    }
}

/// Summary of the whole registry, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardListing {
    lines: Vec<CardListLine>,
}

impl CardListing {
    pub fn lines(&self) -> &[CardListLine] {
        &self.lines
    }

    pub fn total(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text lines for display: the empty-state message, or one line per card
    /// followed by the total.
    pub fn render(&self) -> Vec<String> {
        if self.lines.is_empty() {
            return vec![EMPTY_LISTING_MESSAGE.to_string()];
        }
        let mut out: Vec<String> = self.lines.iter().map(ToString::to_string).collect();
        out.push(format!("Total cards: {}", self.total()));
        out
    }
}

impl core::fmt::Display for CardListing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::{Confirm, WriteOffRequest};

    fn id(raw: &str) -> CardId {
        CardId::parse(raw).unwrap()
    }

    fn mouse_fields() -> CardFields {
        CardFields::new("Mouse", 5, "S", "M", 9.99, "Shelf1")
    }

    #[test]
    fn create_card_registers_in_stock_card() {
        let mut registry = Registry::new();
        let card = registry.create_card(id("A1"), &mouse_fields()).unwrap();

        assert_eq!(card.status(), CardStatus::InStock);
        assert_eq!(card.quantity(), 5);
        assert_eq!(registry.len(), 1);

        let snapshot = registry.get_card(&id("A1")).unwrap();
        assert_eq!(snapshot.quantity, 5);
        assert_eq!(snapshot.status, CardStatus::InStock);
        assert_eq!(snapshot.cost, "9.99 RUB");
    }

    #[test]
    fn create_card_rejects_duplicate_and_keeps_original() {
        let mut registry = Registry::new();
        registry.create_card(id("A1"), &mouse_fields()).unwrap();
        let before = registry.get_card_object(&id("A1")).unwrap().clone();

        let other = CardFields::new("Keyboard", 1, "S2", "M2", 30.0, "Shelf2");
        match registry.create_card(id("A1"), &other) {
            Err(DomainError::Duplicate(dup)) => assert_eq!(dup, "A1"),
            other => panic!("Expected Duplicate error, got {other:?}"),
        }
        assert_eq!(registry.get_card_object(&id("A1")).unwrap(), &before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_create_stores_nothing() {
        let mut registry = Registry::new();
        let bad = CardFields::new("Mouse", -5, "S", "M", 9.99, "Shelf1");

        assert!(matches!(
            registry.create_card(id("A1"), &bad),
            Err(DomainError::Validation(_))
        ));
        assert!(registry.is_empty());
        assert!(!registry.contains(&id("A1")));

        // The id is still free afterwards.
        registry.create_card(id("A1"), &mouse_fields()).unwrap();
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut registry = Registry::new();
        let missing = id("nope");

        assert!(matches!(registry.get_card(&missing), Err(DomainError::NotFound(_))));
        assert!(matches!(
            registry.get_card_object(&missing),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            registry.update_card(&missing, &CardPatch::new()),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            registry.write_off_card(&missing, &mut Confirm::Always),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn update_card_rejects_negative_quantity() {
        let mut registry = Registry::new();
        registry.create_card(id("A1"), &mouse_fields()).unwrap();

        let err = registry
            .update_card(&id("A1"), &CardPatch::new().with_quantity(-1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(registry.get_card(&id("A1")).unwrap().quantity, 5);
    }

    #[test]
    fn update_card_with_empty_patch_returns_unchanged_card() {
        let mut registry = Registry::new();
        registry.create_card(id("A1"), &mouse_fields()).unwrap();
        let before = registry.get_card_object(&id("A1")).unwrap().clone();

        let after = registry.update_card(&id("A1"), &CardPatch::new()).unwrap();
        assert_eq!(after, &before);
        assert_eq!(after.version(), before.version());
    }

    #[test]
    fn write_off_declined_keeps_card_in_stock() {
        let mut registry = Registry::new();
        registry.create_card(id("A1"), &mouse_fields()).unwrap();

        match registry.write_off_card(&id("A1"), &mut Confirm::Never) {
            Err(DomainError::Cancelled(_)) => {}
            other => panic!("Expected Cancelled error, got {other:?}"),
        }
        assert_eq!(
            registry.get_card_object(&id("A1")).unwrap().status(),
            CardStatus::InStock
        );
    }

    #[test]
    fn write_off_then_update_is_rejected() {
        let mut registry = Registry::new();
        registry.create_card(id("A1"), &mouse_fields()).unwrap();

        let mut asked_for = Vec::new();
        let mut confirm = |req: &WriteOffRequest<'_>| {
            asked_for.push(req.card_id.clone());
            true
        };
        let card = registry.write_off_card(&id("A1"), &mut confirm).unwrap();
        assert_eq!(card.status(), CardStatus::WrittenOff);
        assert_eq!(asked_for, vec![id("A1")]);

        assert!(matches!(
            registry.update_card(&id("A1"), &CardPatch::new().with_name("X")),
            Err(DomainError::InvalidState(_))
        ));
        assert!(matches!(
            registry.write_off_card(&id("A1"), &mut Confirm::Always),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn get_card_uses_registry_currency() {
        let mut registry = Registry::with_settings(DisplaySettings::new("USD"));
        registry.create_card(id("A1"), &mouse_fields()).unwrap();
        assert_eq!(registry.get_card(&id("A1")).unwrap().cost, "9.99 USD");
    }

    #[test]
    fn empty_listing_has_distinct_message() {
        let listing = Registry::new().list_cards();
        assert!(listing.is_empty());
        assert!(listing.lines().is_empty());
        assert_eq!(listing.render(), vec![EMPTY_LISTING_MESSAGE.to_string()]);
    }

    #[test]
    fn listing_preserves_insertion_order_and_reports_total() {
        let mut registry = Registry::new();
        registry.create_card(id("Z9"), &mouse_fields()).unwrap();
        registry
            .create_card(id("A1"), &CardFields::new("Cable", 0, "S", "M", 1.5, "Bin"))
            .unwrap();
        registry.write_off_card(&id("A1"), &mut Confirm::Never).unwrap();

        let listing = registry.list_cards();
        assert_eq!(listing.total(), 2);
        assert_eq!(
            listing.render(),
            vec![
                "Z9: Mouse | in stock | 5 pcs.".to_string(),
                "A1: Cable | written off | 0 pcs.".to_string(),
                "Total cards: 2".to_string(),
            ]
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: listing order equals creation order and ids stay unique.
            #[test]
            fn listing_follows_creation_order(
                ids in proptest::collection::vec("[A-Z][0-9]{1,3}", 1..20)
            ) {
                let mut registry = Registry::new();
                let mut expected: Vec<String> = Vec::new();

                for raw in &ids {
                    let created = registry.create_card(id(raw), &mouse_fields());
                    if expected.contains(raw) {
                        let is_duplicate = matches!(created, Err(DomainError::Duplicate(_)));
                        prop_assert!(is_duplicate);
                    } else {
                        prop_assert!(created.is_ok());
                        expected.push(raw.clone());
                    }
                }

                let listed: Vec<String> = registry
                    .list_cards()
                    .lines()
                    .iter()
                    .map(|line| line.id.to_string())
                    .collect();
                prop_assert_eq!(listed, expected);
            }
        }
    }
}
