//! Data-context port.
//!
//! Handlers read restaurants through [`RestaurantStore`] and persist every
//! mutation of a request as one [`ChangeSet`] committed by
//! [`RestaurantStore::save_changes`]. Nothing is written before that call.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use bistro_core::{DishId, RestaurantId};
use bistro_restaurants::{Dish, Restaurant, RestaurantDetails};

/// Store-level fault. Never used for "row not found", which is `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

/// One pending mutation.
///
/// Changes are row-level: each touches only the rows it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// New restaurant with its initial dishes.
    Insert(Restaurant),
    /// Overwrite the restaurant row. Dish rows are left alone.
    UpdateDetails(RestaurantId, RestaurantDetails),
    /// Append one dish row.
    AddDish(RestaurantId, Dish),
    /// Drop one dish row. Already-gone dishes affect zero rows.
    RemoveDish(RestaurantId, DishId),
    /// Remove a restaurant and, by cascade, its dishes.
    Delete(RestaurantId),
}

/// Ordered list of mutations applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, restaurant: Restaurant) -> Self {
        self.changes.push(Change::Insert(restaurant));
        self
    }

    pub fn update_details(mut self, id: RestaurantId, details: RestaurantDetails) -> Self {
        self.changes.push(Change::UpdateDetails(id, details));
        self
    }

    pub fn add_dish(mut self, restaurant_id: RestaurantId, dish: Dish) -> Self {
        self.changes.push(Change::AddDish(restaurant_id, dish));
        self
    }

    pub fn remove_dish(mut self, restaurant_id: RestaurantId, dish_id: DishId) -> Self {
        self.changes.push(Change::RemoveDish(restaurant_id, dish_id));
        self
    }

    pub fn delete(mut self, id: RestaurantId) -> Self {
        self.changes.push(Change::Delete(id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Persistence port for restaurants and their dishes.
///
/// Reads load dishes eagerly. `save_changes` is all-or-nothing and returns
/// the number of affected rows (restaurant rows plus dish rows).
/// Implementations must return [`StoreError::Cancelled`] without committing
/// once `cancel` fires.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Restaurant>, StoreError>;

    async fn find(&self, id: RestaurantId, cancel: &CancellationToken) -> Result<Option<Restaurant>, StoreError>;

    async fn save_changes(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<usize, StoreError>;
}

#[async_trait]
impl<S> RestaurantStore for Arc<S>
where
    S: RestaurantStore + ?Sized,
{
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Restaurant>, StoreError> {
        (**self).all(cancel).await
    }

    async fn find(&self, id: RestaurantId, cancel: &CancellationToken) -> Result<Option<Restaurant>, StoreError> {
        (**self).find(id, cancel).await
    }

    async fn save_changes(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<usize, StoreError> {
        (**self).save_changes(changes, cancel).await
    }
}
