use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("`{id}` is not stackable, got quantity {quantity}")]
    NotStackable { id: String, quantity: u32 },
    #[error("the bag has not been acquired yet")]
    BagNotAcquired,
    #[error("inventory is full")]
    Full,
    #[error("`{id}` is not in the inventory")]
    NotFound { id: String },
}

impl InventoryError {
    /// 调用方的 bug，而不是运行时状况
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            InventoryError::InvalidQuantity | InventoryError::NotStackable { .. }
        )
    }
}
