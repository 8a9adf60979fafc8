//! Checkout form validation and order confirmation.
//!
//! No payment is taken. A valid submission is acknowledged with an
//! [`OrderConfirmation`] and the cart is emptied by the caller.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use haqq_core::Price;

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid regex"));

static CARD_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|6(?:011|5[0-9][0-9])[0-9]{12}|3[47][0-9]{13}|3(?:0[0-5]|[68][0-9])[0-9]{11}|(?:2131|1800|35\d{3})\d{11})$",
    )
    .expect("Invalid regex")
});

static EXPIRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])\s*/?\s*([0-9]{4}|[0-9]{2})$").expect("Invalid regex")
});

static CVC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("Invalid regex"));

/// Country pre-filled on the checkout form.
pub const DEFAULT_COUNTRY: &str = "USA";

/// Checkout form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvc: String,
}

impl CheckoutForm {
    /// A blank form with the default country filled in.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            ..Self::default()
        }
    }

    /// Check every field, collecting one message per invalid field.
    ///
    /// # Errors
    ///
    /// Returns the field errors if any field is invalid.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if !min_chars(&self.name, 2) {
            errors.add("name", "Name must be at least 2 characters.");
        }
        if !min_chars(&self.address, 5) {
            errors.add("address", "Please enter a valid address.");
        }
        if !min_chars(&self.city, 2) {
            errors.add("city", "Please enter a valid city.");
        }
        if !ZIP_RE.is_match(&self.zip) {
            errors.add("zip", "Please enter a valid ZIP code.");
        }
        if !min_chars(&self.country, 2) {
            errors.add("country", "Please enter a valid country.");
        }
        if !min_chars(&self.card_name, 2) {
            errors.add("card_name", "Name on card is required.");
        }
        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !CARD_NUMBER_RE.is_match(&digits) {
            errors.add("card_number", "Invalid card number.");
        }
        if !EXPIRY_RE.is_match(&self.expiry) {
            errors.add("expiry", "Invalid expiry date (MM/YY).");
        }
        if !CVC_RE.is_match(&self.cvc) {
            errors.add("cvc", "Invalid CVC.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The form with card fields blanked, for re-rendering after an error.
    #[must_use]
    pub fn without_card_data(&self) -> Self {
        Self {
            card_number: String::new(),
            expiry: String::new(),
            cvc: String::new(),
            ..self.clone()
        }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, &'static str>,
}

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.errors.insert(field, message);
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Names of the invalid fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub line_count: usize,
    pub total: Decimal,
}

impl OrderConfirmation {
    #[must_use]
    pub fn new(line_count: usize, total: Decimal) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            line_count,
            total,
        }
    }

    /// Total formatted for display.
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::usd(self.total).display()
    }
}
