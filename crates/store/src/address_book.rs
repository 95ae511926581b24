//! In-memory address book.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::AddressId;
use domain::collaborators::{AddressBook, Result};
use domain::Address;

/// In-memory shipping address book.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressBook {
    addresses: Arc<RwLock<HashMap<AddressId, Address>>>,
}

impl InMemoryAddressBook {
    /// Creates an empty address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an address, returning its ID.
    pub async fn put_address(&self, address: Address) -> AddressId {
        let id = address.id;
        self.addresses.write().unwrap().insert(id, address);
        id
    }
}

#[async_trait]
impl AddressBook for InMemoryAddressBook {
    async fn get_address(&self, address_id: AddressId) -> Result<Option<Address>> {
        Ok(self.addresses.read().unwrap().get(&address_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get_address() {
        let book = InMemoryAddressBook::new();
        let address = Address::new("1 Main St", "Unit 4", "Springfield", "IL", "USA", "627010");
        let id = book.put_address(address.clone()).await;

        assert_eq!(book.get_address(id).await.unwrap(), Some(address));
    }

    #[tokio::test]
    async fn test_missing_address_is_none() {
        let book = InMemoryAddressBook::new();
        assert!(book.get_address(AddressId::new()).await.unwrap().is_none());
    }
}
