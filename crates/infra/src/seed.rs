//! Sample data for development databases.

use tokio_util::sync::CancellationToken;

use bistro_application::{ChangeSet, RestaurantStore, StoreError};
use bistro_core::{DishId, RestaurantId};
use bistro_restaurants::{Address, Dish, Restaurant, RestaurantDetails};

/// Insert a small sample menu when the store holds no restaurants.
///
/// Returns the number of rows written; 0 when the store was already
/// populated.
pub async fn seed_sample_data(store: &dyn RestaurantStore, cancel: &CancellationToken) -> Result<usize, StoreError> {
    if !store.all(cancel).await?.is_empty() {
        tracing::debug!("store already populated; skipping sample data");
        return Ok(0);
    }

    let changes = sample_restaurants()
        .into_iter()
        .fold(ChangeSet::new(), ChangeSet::insert);
    let rows = store.save_changes(changes, cancel).await?;

    tracing::info!(rows, "sample restaurants seeded");
    Ok(rows)
}

fn sample_restaurants() -> Vec<Restaurant> {
    let mut kfc = Restaurant::new(
        RestaurantId::new(),
        RestaurantDetails {
            name: "KFC".to_string(),
            description: "Fried chicken restaurant chain founded in Corbin, Kentucky.".to_string(),
            category: "Fast Food".to_string(),
            has_delivery: true,
            contact_email: Some("contact@kfc.com".to_string()),
            contact_number: None,
            address: Some(Address {
                city: "London".to_string(),
                street: "Cork St 5".to_string(),
                postal_code: "WC2N 5DU".to_string(),
            }),
        },
    );
    kfc.add_dish(Dish::new(
        DishId::new(),
        "Nashville Hot Chicken",
        "Spicy fried chicken with pickles.",
        1030,
    ));
    kfc.add_dish(Dish::new(
        DishId::new(),
        "Chicken Nuggets",
        "Crispy boneless chicken bites.",
        530,
    ));

    let mcdonald = Restaurant::new(
        RestaurantId::new(),
        RestaurantDetails {
            name: "McDonald's".to_string(),
            description: "Burger restaurant chain founded in San Bernardino, California.".to_string(),
            category: "Fast Food".to_string(),
            has_delivery: true,
            contact_email: Some("contact@mcdonald.com".to_string()),
            contact_number: None,
            address: Some(Address {
                city: "London".to_string(),
                street: "Boots 193".to_string(),
                postal_code: "W1F 8SR".to_string(),
            }),
        },
    );

    vec![kfc, mcdonald]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRestaurantStore;

    #[tokio::test]
    async fn seeds_an_empty_store_once() {
        let store = InMemoryRestaurantStore::new();
        let cancel = CancellationToken::new();

        let rows = seed_sample_data(&store, &cancel).await.unwrap();
        assert_eq!(rows, 4);
        assert_eq!(store.len(), 2);

        let again = seed_sample_data(&store, &cancel).await.unwrap();
        assert_eq!(again, 0);
        assert_eq!(store.len(), 2);
    }
}
