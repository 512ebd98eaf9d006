//! Postgres-backed restaurant store.
//!
//! ## Layout
//!
//! | Table | Columns |
//! |-------|---------|
//! | `restaurants` | `id`, `name`, `description`, `category`, `has_delivery`, `contact_email`, `contact_number`, `address_city`, `address_street`, `address_postal_code` |
//! | `dishes` | `id`, `restaurant_id` (FK, `ON DELETE CASCADE`), `name`, `description`, `price` |
//!
//! The address is embedded in the restaurant row; all three `address_*`
//! columns are either set or NULL together.
//!
//! ## Cancellation
//!
//! Every operation races against the request's cancellation token. A
//! cancelled `save_changes` drops its open transaction, which rolls it back.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;

use bistro_application::{Change, ChangeSet, RestaurantStore, StoreError};
use bistro_core::{DishId, Entity, RestaurantId};
use bistro_restaurants::limits::*;
use bistro_restaurants::{Address, Dish, Restaurant, RestaurantDetails};

const SELECT_RESTAURANTS: &str = r#"
    SELECT id, name, description, category, has_delivery,
           contact_email, contact_number,
           address_city, address_street, address_postal_code
    FROM restaurants
"#;

const SELECT_DISHES: &str = r#"
    SELECT id, restaurant_id, name, description, price
    FROM dishes
"#;

/// Restaurant store over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresRestaurantStore {
    pool: PgPool,
}

impl PostgresRestaurantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in schema_statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Restaurant>, StoreError> {
        let restaurant_rows = sqlx::query(&format!("{SELECT_RESTAURANTS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("all_restaurants", e))?;
        let dish_rows = sqlx::query(&format!("{SELECT_DISHES} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("all_dishes", e))?;

        let mut menus: HashMap<Uuid, Vec<Dish>> = HashMap::new();
        for row in &dish_rows {
            let restaurant_id: Uuid = column(row, "restaurant_id")?;
            menus.entry(restaurant_id).or_default().push(dish_from_row(row)?);
        }

        restaurant_rows
            .iter()
            .map(|row| {
                let id: Uuid = column(row, "id")?;
                restaurant_from_row(row, menus.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn load_one(&self, id: RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_RESTAURANTS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_restaurant", e))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let dish_rows = sqlx::query(&format!("{SELECT_DISHES} WHERE restaurant_id = $1 ORDER BY id"))
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_dishes", e))?;
        let dishes = dish_rows.iter().map(dish_from_row).collect::<Result<Vec<_>, _>>()?;

        restaurant_from_row(&row, dishes).map(Some)
    }

    async fn commit(&self, changes: ChangeSet) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut affected = 0;
        for change in changes {
            affected += match change {
                Change::Insert(restaurant) => insert(&mut tx, &restaurant).await?,
                Change::UpdateDetails(id, details) => update_details(&mut tx, id, &details).await?,
                Change::AddDish(id, dish) => {
                    insert_dish(&mut tx, id, &dish).await?;
                    1
                }
                Change::RemoveDish(id, dish_id) => remove_dish(&mut tx, id, dish_id).await?,
                Change::Delete(id) => delete(&mut tx, id).await?,
            };
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(affected)
    }
}

#[async_trait]
impl RestaurantStore for PostgresRestaurantStore {
    #[instrument(skip(self, cancel), err)]
    async fn all(&self, cancel: &CancellationToken) -> Result<Vec<Restaurant>, StoreError> {
        cancellable(cancel, self.load_all()).await
    }

    #[instrument(skip(self, cancel), fields(restaurant_id = %id), err)]
    async fn find(&self, id: RestaurantId, cancel: &CancellationToken) -> Result<Option<Restaurant>, StoreError> {
        cancellable(cancel, self.load_one(id)).await
    }

    #[instrument(skip(self, changes, cancel), fields(changes = changes.len()), err)]
    async fn save_changes(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<usize, StoreError> {
        if changes.is_empty() {
            return Ok(0);
        }
        cancellable(cancel, self.commit(changes)).await
    }
}

/// Resolve `operation` unless `cancel` fires first, in which case the
/// operation future is dropped.
async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StoreError::Cancelled),
        result = operation => result,
    }
}

fn schema_statements() -> Vec<String> {
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id UUID PRIMARY KEY,
                name VARCHAR({NAME_MAX}) NOT NULL,
                description VARCHAR({DESCRIPTION_MAX}) NOT NULL,
                category VARCHAR({CATEGORY_MAX}) NOT NULL,
                has_delivery BOOLEAN NOT NULL,
                contact_email VARCHAR({CONTACT_EMAIL_MAX}),
                contact_number VARCHAR({CONTACT_NUMBER_MAX}),
                address_city VARCHAR({CITY_MAX}),
                address_street VARCHAR({STREET_MAX}),
                address_postal_code VARCHAR({POSTAL_CODE_MAX})
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS dishes (
                id UUID PRIMARY KEY,
                restaurant_id UUID NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
                name VARCHAR({DISH_NAME_MAX}) NOT NULL,
                description VARCHAR({DISH_DESCRIPTION_MAX}) NOT NULL,
                price BIGINT NOT NULL CHECK (price >= 0)
            )
            "#
        ),
        "CREATE INDEX IF NOT EXISTS ix_dishes_restaurant_id ON dishes (restaurant_id)".to_string(),
    ]
}

async fn insert(tx: &mut Transaction<'_, Postgres>, restaurant: &Restaurant) -> Result<usize, StoreError> {
    let details = restaurant.details();
    let address = details.address.as_ref();

    sqlx::query(
        r#"
        INSERT INTO restaurants (
            id, name, description, category, has_delivery,
            contact_email, contact_number,
            address_city, address_street, address_postal_code
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(restaurant.id().as_uuid())
    .bind(&details.name)
    .bind(&details.description)
    .bind(&details.category)
    .bind(details.has_delivery)
    .bind(&details.contact_email)
    .bind(&details.contact_number)
    .bind(address.map(|a| a.city.as_str()))
    .bind(address.map(|a| a.street.as_str()))
    .bind(address.map(|a| a.postal_code.as_str()))
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_restaurant", e))?;

    for dish in restaurant.dishes() {
        insert_dish(tx, restaurant.id(), dish).await?;
    }

    Ok(1 + restaurant.dishes().len())
}

async fn update_details(
    tx: &mut Transaction<'_, Postgres>,
    id: RestaurantId,
    details: &RestaurantDetails,
) -> Result<usize, StoreError> {
    let address = details.address.as_ref();

    let updated = sqlx::query(
        r#"
        UPDATE restaurants
        SET name = $2, description = $3, category = $4, has_delivery = $5,
            contact_email = $6, contact_number = $7,
            address_city = $8, address_street = $9, address_postal_code = $10
        WHERE id = $1
        "#,
    )
    .bind(id.as_uuid())
    .bind(&details.name)
    .bind(&details.description)
    .bind(&details.category)
    .bind(details.has_delivery)
    .bind(&details.contact_email)
    .bind(&details.contact_number)
    .bind(address.map(|a| a.city.as_str()))
    .bind(address.map(|a| a.street.as_str()))
    .bind(address.map(|a| a.postal_code.as_str()))
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_restaurant", e))?;

    if updated.rows_affected() == 0 {
        return Err(StoreError::Database(format!("restaurant {id} does not exist")));
    }
    Ok(1)
}

async fn remove_dish(tx: &mut Transaction<'_, Postgres>, id: RestaurantId, dish_id: DishId) -> Result<usize, StoreError> {
    let deleted = sqlx::query("DELETE FROM dishes WHERE id = $1 AND restaurant_id = $2")
        .bind(dish_id.as_uuid())
        .bind(id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("delete_dish", e))?;
    Ok(deleted.rows_affected() as usize)
}

async fn delete(tx: &mut Transaction<'_, Postgres>, id: RestaurantId) -> Result<usize, StoreError> {
    let dishes: i64 = sqlx::query("SELECT COUNT(*) AS dishes FROM dishes WHERE restaurant_id = $1")
        .bind(id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("count_dishes", e))
        .and_then(|row| column(&row, "dishes"))?;

    let deleted = sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("delete_restaurant", e))?;

    if deleted.rows_affected() == 0 {
        return Err(StoreError::Database(format!("restaurant {id} does not exist")));
    }

    Ok(1 + dishes as usize)
}

async fn insert_dish(tx: &mut Transaction<'_, Postgres>, restaurant_id: RestaurantId, dish: &Dish) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO dishes (id, restaurant_id, name, description, price)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(dish.id().as_uuid())
    .bind(restaurant_id.as_uuid())
    .bind(dish.name())
    .bind(dish.description())
    .bind(price_to_db(dish.price())?)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_dish", e))?;
    Ok(())
}

fn price_to_db(price: u64) -> Result<i64, StoreError> {
    i64::try_from(price).map_err(|_| StoreError::Database(format!("price {price} exceeds column range")))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| StoreError::Corrupt(format!("failed to read column {name}: {e}")))
}

fn dish_from_row(row: &PgRow) -> Result<Dish, StoreError> {
    let id: Uuid = column(row, "id")?;
    let price: i64 = column(row, "price")?;
    let price = u64::try_from(price).map_err(|_| StoreError::Corrupt(format!("dish {id} has negative price")))?;

    Ok(Dish::new(
        DishId::from_uuid(id),
        column::<String>(row, "name")?,
        column::<String>(row, "description")?,
        price,
    ))
}

fn restaurant_from_row(row: &PgRow, dishes: Vec<Dish>) -> Result<Restaurant, StoreError> {
    let id: Uuid = column(row, "id")?;

    let address = match (
        column::<Option<String>>(row, "address_city")?,
        column::<Option<String>>(row, "address_street")?,
        column::<Option<String>>(row, "address_postal_code")?,
    ) {
        (Some(city), Some(street), Some(postal_code)) => Some(Address {
            city,
            street,
            postal_code,
        }),
        (None, None, None) => None,
        _ => {
            return Err(StoreError::Corrupt(format!("restaurant {id} has a partial address")));
        }
    };

    let details = RestaurantDetails {
        name: column(row, "name")?,
        description: column(row, "description")?,
        category: column(row, "category")?,
        has_delivery: column(row, "has_delivery")?,
        contact_email: column(row, "contact_email")?,
        contact_number: column(row, "contact_number")?,
        address,
    };

    Ok(Restaurant::from_parts(RestaurantId::from_uuid(id), details, dishes))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Database(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => StoreError::Database(format!("connection pool closed in {operation}")),
        sqlx::Error::ColumnDecode { index, source } => {
            StoreError::Corrupt(format!("failed to decode column {index} in {operation}: {source}"))
        }
        other => StoreError::Database(format!("sqlx error in {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_uses_column_limits_and_cascade() {
        let statements = schema_statements().join("\n");
        assert!(statements.contains("name VARCHAR(100) NOT NULL"));
        assert!(statements.contains("category VARCHAR(50) NOT NULL"));
        assert!(statements.contains("address_postal_code VARCHAR(20)"));
        assert!(statements.contains("REFERENCES restaurants(id) ON DELETE CASCADE"));
    }

    #[test]
    fn prices_beyond_bigint_are_rejected() {
        assert_eq!(price_to_db(950), Ok(950));
        assert!(matches!(price_to_db(u64::MAX), Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn cancellable_prefers_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = cancellable(&cancel, async { Ok::<_, StoreError>(1) }).await;
        assert_eq!(result, Err(StoreError::Cancelled));
    }

    #[tokio::test]
    async fn cancellable_returns_the_operation_result() {
        let cancel = CancellationToken::new();
        let result = cancellable(&cancel, async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
