//! Integration tests for the full request pipeline.
//!
//! Tests: Request → Dispatcher → Logging → Validation → Handler → Store
//!
//! Verifies:
//! - Created restaurants read back equal to their input
//! - Not-found, update and delete semantics
//! - Invalid requests never reach the store
//! - Cancellation leaves the store untouched
//! - Interleaved writes to one restaurant do not undo each other

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    use bistro_application::restaurants::{
        self, AddDish, CreateRestaurant, DeleteRestaurant, GetRestaurantById, GetRestaurants, NewDish, RemoveDish,
        UpdateRestaurant,
    };
    use bistro_application::{ChangeSet, DispatchError, Dispatcher, RestaurantStore, StoreError};
    use bistro_core::{DishId, ErrorKind, RestaurantId, Rule};
    use bistro_restaurants::{Address, Restaurant, RestaurantDetails};

    use crate::store::InMemoryRestaurantStore;

    fn setup() -> (Dispatcher, Arc<InMemoryRestaurantStore>) {
        let store = Arc::new(InMemoryRestaurantStore::new());
        let dispatcher = restaurants::register(Dispatcher::builder(), store.clone()).build();
        (dispatcher, store)
    }

    fn details() -> RestaurantDetails {
        RestaurantDetails {
            name: "Test Restaurant".to_string(),
            description: "Test Description".to_string(),
            category: "Italian".to_string(),
            has_delivery: true,
            contact_email: Some("test@test.com".to_string()),
            contact_number: Some("+123456789".to_string()),
            address: Some(Address {
                city: "Test City".to_string(),
                street: "Test Street".to_string(),
                postal_code: "12345".to_string(),
            }),
        }
    }

    fn create_command() -> CreateRestaurant {
        CreateRestaurant {
            details: details(),
            dishes: vec![NewDish {
                name: "Risotto".to_string(),
                description: "Mushroom risotto".to_string(),
                price: 1600,
            }],
        }
    }

    async fn create(dispatcher: &Dispatcher, command: CreateRestaurant) -> RestaurantId {
        dispatcher
            .send(command, &CancellationToken::new())
            .await
            .unwrap()
            .into_value()
    }

    #[tokio::test]
    async fn created_restaurant_reads_back_equal_to_input() {
        let (dispatcher, _store) = setup();
        let command = create_command();
        let id = create(&dispatcher, command.clone()).await;

        let got = dispatcher
            .send(GetRestaurantById { id }, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();

        assert_eq!(got.id, id);
        assert_eq!(got.name, command.details.name);
        assert_eq!(got.description, command.details.description);
        assert_eq!(got.category, command.details.category);
        assert_eq!(got.has_delivery, command.details.has_delivery);
        assert_eq!(got.contact_email, command.details.contact_email);
        assert_eq!(got.contact_number, command.details.contact_number);
        let address = got.address.unwrap();
        assert_eq!(address.city, "Test City");
        assert_eq!(address.street, "Test Street");
        assert_eq!(address.postal_code, "12345");
        assert_eq!(got.dishes.len(), 1);
        assert_eq!(got.dishes[0].name, "Risotto");
        assert_eq!(got.dishes[0].price, 1600);
    }

    #[tokio::test]
    async fn get_by_id_of_unknown_restaurant_is_not_found_with_the_id() {
        let (dispatcher, _store) = setup();
        let id = RestaurantId::new();

        let outcome = dispatcher
            .send(GetRestaurantById { id }, &CancellationToken::new())
            .await
            .unwrap();

        let error = outcome.error();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.message().contains(&id.to_string()));
    }

    #[tokio::test]
    async fn get_all_on_empty_store_is_an_empty_success() {
        let (dispatcher, _store) = setup();

        let outcome = dispatcher.send(GetRestaurants, &CancellationToken::new()).await.unwrap();

        assert!(outcome.is_success());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn get_all_lists_every_restaurant() {
        let (dispatcher, _store) = setup();
        create(&dispatcher, create_command()).await;
        create(&dispatcher, create_command()).await;

        let all = dispatcher
            .send(GetRestaurants, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_of_unknown_restaurant_fails_and_writes_nothing() {
        let (dispatcher, store) = setup();
        create(&dispatcher, create_command()).await;
        let before = store.all(&CancellationToken::new()).await.unwrap();

        let outcome = dispatcher
            .send(
                UpdateRestaurant {
                    id: RestaurantId::new(),
                    details: details(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.error().kind(), ErrorKind::NotFound);
        assert_eq!(store.all(&CancellationToken::new()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_replaces_every_field_and_clears_absent_address() {
        let (dispatcher, _store) = setup();
        let id = create(&dispatcher, create_command()).await;

        let replacement = RestaurantDetails {
            name: "Updated Restaurant".to_string(),
            description: "Updated Description".to_string(),
            category: "Mexican".to_string(),
            has_delivery: false,
            contact_email: None,
            contact_number: None,
            address: None,
        };
        let outcome = dispatcher
            .send(
                UpdateRestaurant {
                    id,
                    details: replacement.clone(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.is_success());

        let got = dispatcher
            .send(GetRestaurantById { id }, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();
        assert_eq!(got.name, replacement.name);
        assert_eq!(got.description, replacement.description);
        assert_eq!(got.category, replacement.category);
        assert!(!got.has_delivery);
        assert_eq!(got.contact_email, None);
        assert_eq!(got.contact_number, None);
        assert_eq!(got.address, None);
        // Dishes are not part of the update.
        assert_eq!(got.dishes.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_restaurant_and_repeated_delete_keeps_failing() {
        let (dispatcher, store) = setup();
        let id = create(&dispatcher, create_command()).await;

        let first = dispatcher
            .send(DeleteRestaurant { id }, &CancellationToken::new())
            .await
            .unwrap();
        assert!(first.is_success());
        assert!(store.is_empty());

        let lookup = dispatcher
            .send(GetRestaurantById { id }, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(lookup.error().kind(), ErrorKind::NotFound);

        for _ in 0..2 {
            let again = dispatcher
                .send(DeleteRestaurant { id }, &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(again.error().kind(), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn invalid_create_is_rejected_for_exactly_the_bad_field() {
        let (dispatcher, store) = setup();
        let mut command = create_command();
        command.details.contact_email = Some("not-an-email".to_string());

        let outcome = dispatcher.send(command, &CancellationToken::new()).await.unwrap();

        let error = outcome.error();
        assert_eq!(error.kind(), ErrorKind::Validation);
        let fields: Vec<_> = error.failures().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["contact_email"]);
        assert_eq!(error.failures()[0].rule, Rule::Email);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn invalid_update_never_reaches_the_store() {
        let (dispatcher, store) = setup();
        let id = create(&dispatcher, create_command()).await;
        let before = store.all(&CancellationToken::new()).await.unwrap();

        let mut bad = details();
        bad.contact_number = Some("abc".to_string());
        let outcome = dispatcher
            .send(UpdateRestaurant { id, details: bad }, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.error().failures()[0].field, "contact_number");
        assert_eq!(store.all(&CancellationToken::new()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn add_and_remove_dish() {
        let (dispatcher, _store) = setup();
        let restaurant_id = create(&dispatcher, create_command()).await;

        let dish_id = dispatcher
            .send(
                AddDish {
                    restaurant_id,
                    dish: NewDish {
                        name: "Tiramisu".to_string(),
                        description: "Coffee dessert".to_string(),
                        price: 700,
                    },
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap()
            .into_value();

        let got = dispatcher
            .send(GetRestaurantById { id: restaurant_id }, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();
        assert!(got.dishes.iter().any(|d| d.id == dish_id && d.name == "Tiramisu"));

        let removed = dispatcher
            .send(RemoveDish { restaurant_id, dish_id }, &CancellationToken::new())
            .await
            .unwrap();
        assert!(removed.is_success());

        let missing = dispatcher
            .send(RemoveDish { restaurant_id, dish_id }, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(missing.error().code(), "Dish.NotFound");
    }

    #[tokio::test]
    async fn add_dish_to_unknown_restaurant_is_not_found() {
        let (dispatcher, _store) = setup();

        let outcome = dispatcher
            .send(
                AddDish {
                    restaurant_id: RestaurantId::new(),
                    dish: NewDish {
                        name: "Soup".to_string(),
                        description: "Hot".to_string(),
                        price: 400,
                    },
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.error().code(), "Restaurant.NotFound");

        let outcome = dispatcher
            .send(
                RemoveDish {
                    restaurant_id: RestaurantId::new(),
                    dish_id: DishId::new(),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.error().code(), "Restaurant.NotFound");
    }

    #[tokio::test]
    async fn cancelled_create_writes_nothing() {
        let (dispatcher, store) = setup();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = dispatcher.send(create_command(), &cancel).await.unwrap_err();

        assert_eq!(err, DispatchError::Cancelled);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn every_restaurant_request_is_registered() {
        let (dispatcher, _store) = setup();
        assert!(restaurants::ensure_registered(&dispatcher).is_ok());
        assert!(restaurants::ensure_registered(&Dispatcher::builder().build()).is_err());
    }

    /// Holds the next `save_changes` until released, so a second request can
    /// commit between the first request's read and its write.
    struct GatedStore {
        inner: InMemoryRestaurantStore,
        armed: AtomicBool,
        parked: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: InMemoryRestaurantStore::new(),
                armed: AtomicBool::new(false),
                parked: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl RestaurantStore for GatedStore {
        async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Restaurant>, StoreError> {
            self.inner.all(cancel).await
        }

        async fn find(&self, id: RestaurantId, cancel: &CancellationToken) -> Result<Option<Restaurant>, StoreError> {
            self.inner.find(id, cancel).await
        }

        async fn save_changes(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<usize, StoreError> {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.parked.notify_one();
                self.release.notified().await;
            }
            self.inner.save_changes(changes, cancel).await
        }
    }

    #[tokio::test]
    async fn update_does_not_drop_a_dish_added_while_it_was_in_flight() {
        let store = Arc::new(GatedStore::new());
        let dispatcher = Arc::new(restaurants::register(Dispatcher::builder(), store.clone()).build());
        let id = create(&dispatcher, create_command()).await;

        store.armed.store(true, Ordering::SeqCst);
        let mut renamed = details();
        renamed.name = "Renamed".to_string();
        let update = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move {
                dispatcher
                    .send(UpdateRestaurant { id, details: renamed }, &CancellationToken::new())
                    .await
            }
        });
        store.parked.notified().await;

        let added = dispatcher
            .send(
                AddDish {
                    restaurant_id: id,
                    dish: NewDish {
                        name: "Tiramisu".to_string(),
                        description: "Coffee dessert".to_string(),
                        price: 700,
                    },
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(added.is_success());

        store.release.notify_one();
        assert!(update.await.unwrap().unwrap().is_success());

        let got = dispatcher
            .send(GetRestaurantById { id }, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();
        assert_eq!(got.name, "Renamed");
        assert_eq!(got.dishes.len(), 2);
        assert!(got.dishes.iter().any(|d| d.id == *added.value()));
    }

    #[tokio::test]
    async fn concurrent_dish_additions_both_survive() {
        let store = Arc::new(GatedStore::new());
        let dispatcher = Arc::new(restaurants::register(Dispatcher::builder(), store.clone()).build());
        let restaurant_id = create(&dispatcher, create_command()).await;
        let dish = |name: &str| AddDish {
            restaurant_id,
            dish: NewDish {
                name: name.to_string(),
                description: "Dessert".to_string(),
                price: 500,
            },
        };

        store.armed.store(true, Ordering::SeqCst);
        let first = tokio::spawn({
            let dispatcher = dispatcher.clone();
            let request = dish("Panna cotta");
            async move { dispatcher.send(request, &CancellationToken::new()).await }
        });
        store.parked.notified().await;

        let second = dispatcher.send(dish("Cannoli"), &CancellationToken::new()).await.unwrap();
        assert!(second.is_success());
        store.release.notify_one();
        assert!(first.await.unwrap().unwrap().is_success());

        let got = dispatcher
            .send(GetRestaurantById { id: restaurant_id }, &CancellationToken::new())
            .await
            .unwrap()
            .into_value();
        let mut names: Vec<_> = got.dishes.iter().map(|d| d.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Cannoli", "Panna cotta", "Risotto"]);
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread().build().unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn create_enforces_category_length_through_the_pipeline(len in 45usize..56) {
            let (dispatcher, store) = setup();
            let mut command = create_command();
            command.details.category = "c".repeat(len);

            let outcome = runtime()
                .block_on(dispatcher.send(command, &CancellationToken::new()))
                .unwrap();

            if len <= 50 {
                prop_assert!(outcome.is_success());
                prop_assert_eq!(store.len(), 1);
            } else {
                let error = outcome.error();
                prop_assert_eq!(error.kind(), ErrorKind::Validation);
                prop_assert_eq!(error.failures().len(), 1);
                prop_assert_eq!(error.failures()[0].field.as_str(), "category");
                prop_assert!(store.is_empty());
            }
        }
    }
}
