use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};

use bistro_application::restaurants::{
    AddDish, CreateRestaurant, DeleteRestaurant, GetRestaurantById, GetRestaurants, NewDish, RemoveDish,
    UpdateRestaurant,
};
use bistro_core::{DishId, RestaurantId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route(
            "/:id",
            get(get_restaurant).put(update_restaurant).delete(delete_restaurant),
        )
        .route("/:id/dishes", post(add_dish))
        .route("/:id/dishes/:dish_id", delete(remove_dish))
}

pub async fn list_restaurants(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    errors::respond(services.dispatch(GetRestaurants).await, |list| Json(list).into_response())
}

pub async fn get_restaurant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_restaurant_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    errors::respond(services.dispatch(GetRestaurantById { id }).await, |restaurant| {
        Json(restaurant).into_response()
    })
}

pub async fn create_restaurant(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateRestaurantRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let command = CreateRestaurant::from(body);

    errors::respond(services.dispatch(command).await, |id| {
        (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/api/restaurants/{id}"))],
            Json(dto::CreatedResponse { id: id.to_string() }),
        )
            .into_response()
    })
}

pub async fn update_restaurant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateRestaurantRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_restaurant_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let command = UpdateRestaurant {
        id,
        details: body.into(),
    };
    errors::respond(services.dispatch(command).await, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}

pub async fn delete_restaurant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_restaurant_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    errors::respond(services.dispatch(DeleteRestaurant { id }).await, |()| {
        StatusCode::NO_CONTENT.into_response()
    })
}

pub async fn add_dish(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::DishBody>, JsonRejection>,
) -> axum::response::Response {
    let restaurant_id = match parse_restaurant_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let command = AddDish {
        restaurant_id,
        dish: NewDish::from(body),
    };
    errors::respond(services.dispatch(command).await, |dish_id| {
        (
            StatusCode::CREATED,
            Json(dto::CreatedResponse {
                id: dish_id.to_string(),
            }),
        )
            .into_response()
    })
}

pub async fn remove_dish(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, dish_id)): Path<(String, String)>,
) -> axum::response::Response {
    let restaurant_id = match parse_restaurant_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let dish_id = match dish_id.parse::<DishId>() {
        Ok(id) => id,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid dish id"),
    };

    errors::respond(
        services.dispatch(RemoveDish { restaurant_id, dish_id }).await,
        |()| StatusCode::NO_CONTENT.into_response(),
    )
}

fn parse_restaurant_id(raw: &str) -> Result<RestaurantId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid restaurant id"))
}
