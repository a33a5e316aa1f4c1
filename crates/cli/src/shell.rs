//! Menu loop: one action per iteration until exit or end of input.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use stockcard_core::{CardId, DomainError};
use stockcard_inventory::{CardFields, CardPatch, CardSnapshot, Registry};

use crate::config::OutputFormat;
use crate::prompt::Prompter;

const MENU_RULE: &str = "========================================";
const VIEW_RULE: &str = "----------------------------------------";
const LIST_RULE: &str = "============================================================";

/// Failure of a single menu action.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Input ended; the session is over.
    #[error("end of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Operator text could not be turned into a value.
    #[error("input error: {0}")]
    Input(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}

fn parse_number<T: core::str::FromStr>(raw: &str, field: &str) -> Result<T, ShellError> {
    raw.parse()
        .map_err(|_| ShellError::Input(format!("{field} must be a number, got {raw:?}")))
}

fn parse_card_id(raw: &str) -> Result<CardId, ShellError> {
    CardId::parse(raw).map_err(|_| ShellError::Input("card ID cannot be empty".to_string()))
}

pub struct Shell<R, W> {
    registry: Registry,
    prompter: Prompter<R, W>,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(registry: Registry, input: R, output: W, format: OutputFormat) -> Self {
        Self {
            registry,
            prompter: Prompter::new(input, output),
            format,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_parts(self) -> (Registry, W) {
        (self.registry, self.prompter.into_output())
    }

    /// Run until the operator exits or input ends.
    ///
    /// Action failures are printed and the menu is shown again; only I/O
    /// errors end the session early.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            match self.step() {
                Ok(true) => continue,
                Ok(false) | Err(ShellError::Eof) => return Ok(()),
                Err(ShellError::Io(e)) => return Err(e),
                Err(e) => {
                    debug!(error = %e, "menu action failed");
                    self.report(&e)?;
                }
            }
        }
    }

    fn report(&mut self, err: &ShellError) -> io::Result<()> {
        match self.prompter.say(format_args!("Error: {err}")) {
            Err(ShellError::Io(e)) => Err(e),
            _ => Ok(()),
        }
    }

    /// One menu round; `Ok(false)` means the operator chose to exit.
    fn step(&mut self) -> Result<bool, ShellError> {
        self.print_menu()?;
        let choice = self.prompter.ask("Choose an action (1-6): ")?;

        match choice.as_str() {
            "1" => self.create_card()?,
            "2" => self.update_card()?,
            "3" => self.view_card()?,
            "4" => self.write_off_card()?,
            "5" => self.list_cards()?,
            "6" => {
                self.prompter.say("Goodbye!")?;
                return Ok(false);
            }
            _ => self.prompter.say("Invalid choice. Please choose 1-6")?,
        }
        Ok(true)
    }

    fn print_menu(&mut self) -> Result<(), ShellError> {
        self.prompter.say("")?;
        self.prompter.say(MENU_RULE)?;
        for item in [
            "1. Create card",
            "2. Update card",
            "3. View card",
            "4. Write off card",
            "5. List all cards",
            "6. Exit",
        ] {
            self.prompter.say(item)?;
        }
        Ok(())
    }

    fn create_card(&mut self) -> Result<(), ShellError> {
        let id = parse_card_id(&self.prompter.ask("Card ID: ")?)?;

        let p = &mut self.prompter;
        let name = p.ask("Name: ")?;
        let quantity: i64 = parse_number(&p.ask("Quantity: ")?, "quantity")?;
        let supplier = p.ask("Supplier: ")?;
        let manufacturer = p.ask("Manufacturer: ")?;
        let cost: f64 = parse_number(&p.ask("Cost: ")?, "cost")?;
        let location = p.ask("Location: ")?;
        let article = p.ask("Article: ")?;
        let warranty: i64 = match p.ask_optional("Warranty (months): ")? {
            Some(raw) => parse_number(&raw, "warranty")?,
            None => 0,
        };
        let receipt_date = p.ask("Receipt date (DD.MM.YYYY): ")?;

        let fields = CardFields::new(name, quantity, supplier, manufacturer, cost, location)
            .with_article(article)
            .with_warranty_months(warranty)
            .with_receipt_date(receipt_date);

        self.registry.create_card(id.clone(), &fields)?;
        info!(card_id = %id, "card created from shell");
        self.prompter.say(format_args!("Card {id} created"))
    }

    fn update_card(&mut self) -> Result<(), ShellError> {
        let Some(raw_id) = self.prompter.ask_optional("Card ID: ")? else {
            return Ok(());
        };
        let id = parse_card_id(&raw_id)?;

        // Refuse before prompting for any field.
        self.registry.get_card_object(&id)?.ensure_mutable()?;

        let p = &mut self.prompter;
        p.say("(Leave a field empty to keep its current value)")?;

        let mut patch = CardPatch::new();
        if let Some(name) = p.ask_optional("New name: ")? {
            patch = patch.with_name(name);
        }
        if let Some(raw) = p.ask_optional("New quantity: ")? {
            patch = patch.with_quantity(parse_number(&raw, "quantity")?);
        }
        if let Some(supplier) = p.ask_optional("New supplier: ")? {
            patch = patch.with_supplier(supplier);
        }
        if let Some(manufacturer) = p.ask_optional("New manufacturer: ")? {
            patch = patch.with_manufacturer(manufacturer);
        }
        if let Some(raw) = p.ask_optional("New cost: ")? {
            patch = patch.with_cost(parse_number(&raw, "cost")?);
        }
        if let Some(location) = p.ask_optional("New location: ")? {
            patch = patch.with_location(location);
        }
        if let Some(article) = p.ask_optional("New article: ")? {
            patch = patch.with_article(article);
        }
        if let Some(raw) = p.ask_optional("New warranty (months): ")? {
            patch = patch.with_warranty_months(parse_number(&raw, "warranty")?);
        }
        if let Some(date) = p.ask_optional("New receipt date (DD.MM.YYYY): ")? {
            patch = patch.with_receipt_date(date);
        }

        if patch.is_empty() {
            return self.prompter.say("Nothing to change");
        }

        self.registry.update_card(&id, &patch)?;
        self.prompter.say(format_args!("Card {id} updated"))
    }

    fn view_card(&mut self) -> Result<(), ShellError> {
        let Some(raw_id) = self.prompter.ask_optional("Card ID: ")? else {
            return Ok(());
        };
        let snapshot = self.registry.get_card(&parse_card_id(&raw_id)?)?;
        self.render_snapshot(&snapshot)
    }

    fn render_snapshot(&mut self, snapshot: &CardSnapshot) -> Result<(), ShellError> {
        match self.format {
            OutputFormat::Text => {
                self.prompter.say("")?;
                self.prompter.say(VIEW_RULE)?;
                for (label, value) in snapshot.entries() {
                    self.prompter.say(format_args!("{label}: {value}"))?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(snapshot)?;
                self.prompter.say(json)
            }
        }
    }

    fn write_off_card(&mut self) -> Result<(), ShellError> {
        let Some(raw_id) = self.prompter.ask_optional("Card ID: ")? else {
            return Ok(());
        };
        let id = parse_card_id(&raw_id)?;

        self.registry.write_off_card(&id, &mut self.prompter)?;
        self.prompter.say(format_args!("Card {id} written off"))
    }

    fn list_cards(&mut self) -> Result<(), ShellError> {
        let listing = self.registry.list_cards();

        self.prompter.say("")?;
        if !listing.is_empty() {
            self.prompter.say(LIST_RULE)?;
        }
        for line in listing.render() {
            self.prompter.say(line)?;
        }
        Ok(())
    }
}
