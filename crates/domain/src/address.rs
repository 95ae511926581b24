//! Shipping address.

use common::AddressId;
use serde::{Deserialize, Serialize};

/// A customer shipping address.
///
/// Orders hold an owned copy taken at checkout time, so later edits to
/// the address book do not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub building: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl Address {
    /// Creates an address with a fresh identifier.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        street: impl Into<String>,
        building: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: AddressId::new(),
            street: street.into(),
            building: building.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            postal_code: postal_code.into(),
        }
    }
}
