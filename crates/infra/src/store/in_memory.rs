use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bistro_application::{Change, ChangeSet, RestaurantStore, StoreError};
use bistro_core::{Entity, RestaurantId};
use bistro_restaurants::Restaurant;

/// In-memory restaurant store.
///
/// Intended for tests/dev. Rows are kept ordered by id. A change set is
/// applied to a copy of the table and swapped in only if every change
/// succeeds.
#[derive(Debug, Default)]
pub struct InMemoryRestaurantStore {
    rows: RwLock<BTreeMap<RestaurantId, Restaurant>>,
}

impl InMemoryRestaurantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored restaurants.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(rows: &mut BTreeMap<RestaurantId, Restaurant>, change: Change) -> Result<usize, StoreError> {
        match change {
            Change::Insert(restaurant) => {
                let id = restaurant.id();
                if rows.contains_key(&id) {
                    return Err(StoreError::Database(format!("restaurant {id} already exists")));
                }
                let affected = 1 + restaurant.dishes().len();
                rows.insert(id, restaurant);
                Ok(affected)
            }
            Change::UpdateDetails(id, details) => {
                existing(rows, id)?.update_details(details);
                Ok(1)
            }
            Change::AddDish(id, dish) => {
                let restaurant = existing(rows, id)?;
                if restaurant.dish(dish.id()).is_some() {
                    return Err(StoreError::Database(format!("dish {} already exists", dish.id())));
                }
                restaurant.add_dish(dish);
                Ok(1)
            }
            Change::RemoveDish(id, dish_id) => Ok(existing(rows, id)?.remove_dish(dish_id).map_or(0, |_| 1)),
            Change::Delete(id) => {
                let removed = rows
                    .remove(&id)
                    .ok_or_else(|| StoreError::Database(format!("restaurant {id} does not exist")))?;
                Ok(1 + removed.dishes().len())
            }
        }
    }
}

fn existing(rows: &mut BTreeMap<RestaurantId, Restaurant>, id: RestaurantId) -> Result<&mut Restaurant, StoreError> {
    rows.get_mut(&id)
        .ok_or_else(|| StoreError::Database(format!("restaurant {id} does not exist")))
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

#[async_trait]
impl RestaurantStore for InMemoryRestaurantStore {
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Restaurant>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }

    async fn find(&self, id: RestaurantId, cancel: &CancellationToken) -> Result<Option<Restaurant>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn save_changes(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<usize, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if changes.is_empty() {
            return Ok(0);
        }

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let mut staged = rows.clone();
        let mut affected = 0;
        for change in changes {
            affected += Self::apply(&mut staged, change)?;
        }
        *rows = staged;

        tracing::debug!(affected, "in-memory change set committed");
        Ok(affected)
    }
}
