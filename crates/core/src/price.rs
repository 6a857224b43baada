//! Price and stock coercion from form text.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A strictly positive, finite price in FCFA.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount <= 0.0 {
            return Err(DomainError::validation("price must be greater than 0"));
        }
        Ok(Self(amount))
    }

    /// Coerce the text of a price input into a number.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| DomainError::validation(format!("price is not a number: {trimmed:?}")))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Shopper-facing label, e.g. `15000 FCFA`.
    pub fn label(&self) -> String {
        format!("{} FCFA", format_amount(self.0))
    }
}

/// Render an amount the way a vendor typed it: no trailing `.0` on whole values.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        let text = format!("{amount:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Optional non-negative stock quantity; blank input means "not specified".
pub fn parse_stock_quantity(text: &str) -> DomainResult<Option<u32>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| DomainError::validation(format!("stock quantity must be a non-negative integer: {trimmed:?}")))
}
