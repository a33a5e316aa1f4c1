//! Write-off confirmation port.
//!
//! Writing off a card that still has stock on hand needs an explicit yes/no
//! from the operator. The domain asks through this trait so it never touches
//! stdin itself; the shell supplies an interactive implementation and tests
//! supply closures or [`Confirm`].

use stockcard_core::CardId;

/// What the operator is being asked to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOffRequest<'a> {
    pub card_id: &'a CardId,
    pub name: &'a str,
    /// Units still on hand; always greater than zero when a request is made.
    pub remaining: u64,
}

/// Synchronous yes/no decision for a pending write-off.
pub trait WriteOffConfirmation {
    /// Return `true` to proceed with the write-off.
    fn confirm(&mut self, request: &WriteOffRequest<'_>) -> bool;
}

impl<F> WriteOffConfirmation for F
where
    F: FnMut(&WriteOffRequest<'_>) -> bool,
{
    fn confirm(&mut self, request: &WriteOffRequest<'_>) -> bool {
        self(request)
    }
}

/// Fixed answer, for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Always,
    Never,
}

impl WriteOffConfirmation for Confirm {
    fn confirm(&mut self, _request: &WriteOffRequest<'_>) -> bool {
        matches!(self, Confirm::Always)
    }
}
