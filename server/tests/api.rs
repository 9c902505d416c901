use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Days, Local, Months};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use carpool_data_management::{generate_api_token, hash_password, DataManager, NewUser};
use carpool_lib::{place::Place, user::{Gender, User}, vehicle::Vehicle};
use server::{api, server_state::ServerState};

async fn test_app() -> (Router, DataManager) {
    let data_manager = DataManager::start_in_memory().await.unwrap();
    let app = api::router(Arc::new(ServerState {
        data_manager: data_manager.clone(),
    }));
    (app, data_manager)
}

async fn register_user(data_manager: &DataManager, username: &str) -> User {
    data_manager
        .register_user(&NewUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password("testpass123"),
            gender: Gender::default(),
            birth_date: None,
            is_staff: false,
            is_superuser: false,
            api_token: generate_api_token(),
        })
        .await
        .unwrap()
}

async fn seed(data_manager: &DataManager) -> (User, Vehicle, Place, Place) {
    let user = register_user(data_manager, "vince").await;
    let vehicle = data_manager
        .register_vehicle(user.user_id, "Make", "Model", "1234", None)
        .await
        .unwrap();
    let origin = data_manager.register_place("Origin").await.unwrap();
    let destination = data_manager.register_place("Destination").await.unwrap();
    (user, vehicle, origin, destination)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_places() {
    let (app, data_manager) = test_app().await;
    data_manager.register_place("Pretoria").await.unwrap();

    let response = app.oneshot(get("/api/v1/places/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{"id": 1, "name": "Pretoria"}])
    );
}

#[tokio::test]
async fn get_place() {
    let (app, data_manager) = test_app().await;
    data_manager.register_place("Pretoria").await.unwrap();

    let response = app.oneshot(get("/api/v1/places/1/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"id": 1, "name": "Pretoria"}));
}

#[tokio::test]
async fn places_ordered_by_name() {
    let (app, data_manager) = test_app().await;
    data_manager.register_place("Pretoria").await.unwrap();
    data_manager.register_place("Cape Town").await.unwrap();

    let body = body_json(app.oneshot(get("/api/v1/places/")).await.unwrap()).await;
    assert_eq!(body[0]["name"], "Cape Town");
    assert_eq!(body[1]["name"], "Pretoria");
}

#[tokio::test]
async fn unknown_place_is_404() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get("/api/v1/places/99/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_vehicles() {
    let (app, data_manager) = test_app().await;
    seed(&data_manager).await;

    let response = app.oneshot(get("/api/v1/vehicles/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{
            "id": 1,
            "url": "/api/v1/vehicles/1/",
            "make": "Make",
            "model": "Model",
            "reg_number": "1234",
            "image": null,
            "owner_url": "/api/v1/users/1/"
        }])
    );
}

#[tokio::test]
async fn add_vehicle_unauthenticated_forbidden() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/vehicles/",
            None,
            &json!({"make": "Make", "model": "Model", "reg_number": "1234"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn add_vehicle_sets_owner_from_requester() {
    let (app, data_manager) = test_app().await;
    let user = register_user(&data_manager, "vince").await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/vehicles/",
            Some(&user.api_token),
            &json!({"make": "Make", "model": "Model", "reg_number": "1234"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["owner_url"], format!("/api/v1/users/{}/", user.user_id));

    let vehicle = data_manager.get_vehicle(body["id"].as_i64().unwrap()).await.unwrap();
    assert_eq!(vehicle.user_id, user.user_id);
}

#[tokio::test]
async fn blank_vehicle_fields_rejected() {
    let (app, data_manager) = test_app().await;
    let user = register_user(&data_manager, "vince").await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/vehicles/",
            Some(&user.api_token),
            &json!({"make": "", "model": "Model", "reg_number": "1234"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"make": ["This field may not be blank"]})
    );
}

#[tokio::test]
async fn delete_vehicle_by_owner() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, _, _) = seed(&data_manager).await;

    let response = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/vehicles/{}/", vehicle.vehicle_id),
            Some(&user.api_token),
            &json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(data_manager.count_vehicles().await.unwrap(), 0);
}

#[tokio::test]
async fn delete_vehicle_by_non_owner_forbidden() {
    let (app, data_manager) = test_app().await;
    let (_, vehicle, _, _) = seed(&data_manager).await;
    let other = register_user(&data_manager, "sarah").await;

    let response = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/vehicles/{}/", vehicle.vehicle_id),
            Some(&other.api_token),
            &json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(data_manager.count_vehicles().await.unwrap(), 1);
}

#[tokio::test]
async fn update_vehicle_by_owner() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, _, _) = seed(&data_manager).await;

    let response = app
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/vehicles/{}/", vehicle.vehicle_id),
            Some(&user.api_token),
            &json!({"make": "Fiat", "model": "Uno", "reg_number": "1234"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["make"], "Fiat");
    assert_eq!(body["model"], "Uno");
}

#[tokio::test]
async fn create_trip() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, destination) = seed(&data_manager).await;
    let today = Local::now().date_naive();

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/trips/",
            Some(&user.api_token),
            &json!({
                "trip_date": today,
                "origin_id": origin.place_id,
                "destination_id": destination.place_id,
                "vehicle_id": vehicle.vehicle_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["driver"]["username"], "vince");
    assert_eq!(body["origin"]["name"], "Origin");
    assert_eq!(body["destination"]["name"], "Destination");
    assert_eq!(body["vehicle"]["owner_url"], format!("/api/v1/users/{}/", user.user_id));
    assert_eq!(body["num_seats"], 1);

    let trip = data_manager.get_trip(body["id"].as_i64().unwrap()).await.unwrap();
    assert_eq!(trip.user_id, user.user_id);
}

#[tokio::test]
async fn create_trip_unauthenticated_forbidden() {
    let (app, data_manager) = test_app().await;
    let (_, vehicle, origin, destination) = seed(&data_manager).await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/trips/",
            None,
            &json!({
                "trip_date": Local::now().date_naive(),
                "origin_id": origin.place_id,
                "destination_id": destination.place_id,
                "vehicle_id": vehicle.vehicle_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_trip_in_past_rejected() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, destination) = seed(&data_manager).await;
    let yesterday = Local::now().date_naive().checked_sub_days(Days::new(1)).unwrap();

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/trips/",
            Some(&user.api_token),
            &json!({
                "trip_date": yesterday,
                "origin_id": origin.place_id,
                "destination_id": destination.place_id,
                "vehicle_id": vehicle.vehicle_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"trip_date": ["Trip date cannot be in the past"]})
    );
}

#[tokio::test]
async fn create_trip_same_origin_and_destination_rejected() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, _) = seed(&data_manager).await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/trips/",
            Some(&user.api_token),
            &json!({
                "trip_date": Local::now().date_naive(),
                "origin_id": origin.place_id,
                "destination_id": origin.place_id,
                "vehicle_id": vehicle.vehicle_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"non_field_errors": ["Origin and destination cannot be the same"]})
    );
}

#[tokio::test]
async fn create_trip_with_foreign_vehicle_rejected() {
    let (app, data_manager) = test_app().await;
    let (_, vehicle, origin, destination) = seed(&data_manager).await;
    let other = register_user(&data_manager, "sarah").await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/trips/",
            Some(&other.api_token),
            &json!({
                "trip_date": Local::now().date_naive(),
                "origin_id": origin.place_id,
                "destination_id": destination.place_id,
                "vehicle_id": vehicle.vehicle_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"vehicle_id": ["Vehicle does not exist"]})
    );
}

#[tokio::test]
async fn trips_ordered_by_date_with_nested_objects() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, destination) = seed(&data_manager).await;
    let today = Local::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap();

    data_manager
        .register_trip(user.user_id, origin.place_id, destination.place_id, vehicle.vehicle_id, tomorrow, 2)
        .await
        .unwrap();
    data_manager
        .register_trip(user.user_id, destination.place_id, origin.place_id, vehicle.vehicle_id, today, 4)
        .await
        .unwrap();

    let body = body_json(app.oneshot(get("/api/v1/trips/")).await.unwrap()).await;
    let trips = body.as_array().unwrap();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0]["trip_date"], today.to_string());
    assert_eq!(trips[1]["trip_date"], tomorrow.to_string());

    assert_eq!(trips[0]["origin"]["name"], "Destination");
    assert_eq!(trips[0]["vehicle"]["owner_url"], format!("/api/v1/users/{}/", user.user_id));
    assert_eq!(trips[0]["driver"]["username"], "vince");
    assert!(trips[0]["driver"].get("password_hash").is_none());
    assert!(trips[0]["driver"].get("api_token").is_none());
}

#[tokio::test]
async fn trip_filters() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, destination) = seed(&data_manager).await;
    let today = Local::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap();

    data_manager
        .register_trip(user.user_id, origin.place_id, destination.place_id, vehicle.vehicle_id, tomorrow, 3)
        .await
        .unwrap();
    data_manager
        .register_trip(user.user_id, destination.place_id, origin.place_id, vehicle.vehicle_id, today, 1)
        .await
        .unwrap();

    let body = body_json(
        app.clone()
            .oneshot(get(&format!("/api/v1/trips/?trip_date={tomorrow}")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["num_seats"], 3);

    let body = body_json(app.clone().oneshot(get("/api/v1/trips/?num_seats=2")).await.unwrap()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Case-insensitive exact match on place names.
    let body = body_json(app.clone().oneshot(get("/api/v1/trips/?origin=ORIGIN")).await.unwrap()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["origin"]["name"], "Origin");

    let body = body_json(
        app.oneshot(get("/api/v1/trips/?origin=origin&destination=destination&num_seats=4"))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_and_delete_trip_restricted_to_driver() {
    let (app, data_manager) = test_app().await;
    let (user, vehicle, origin, destination) = seed(&data_manager).await;
    let other = register_user(&data_manager, "sarah").await;
    let today = Local::now().date_naive();

    let trip = data_manager
        .register_trip(user.user_id, origin.place_id, destination.place_id, vehicle.vehicle_id, today, 1)
        .await
        .unwrap();
    let uri = format!("/api/v1/trips/{}/", trip.trip_id);
    let write = json!({
        "trip_date": today,
        "origin_id": origin.place_id,
        "destination_id": destination.place_id,
        "vehicle_id": vehicle.vehicle_id,
        "num_seats": 3,
    });

    let response = app
        .clone()
        .oneshot(request(Method::PUT, &uri, Some(&other.api_token), &write))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(Method::PUT, &uri, Some(&user.api_token), &write))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["num_seats"], 3);

    let response = app
        .clone()
        .oneshot(request(Method::DELETE, &uri, Some(&other.api_token), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(Method::DELETE, &uri, Some(&user.api_token), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(data_manager.count_trips().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_trip_is_404() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get("/api/v1/trips/99/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_users_hides_credentials() {
    let (app, data_manager) = test_app().await;
    register_user(&data_manager, "vince").await;

    let response = app.oneshot(get("/api/v1/users/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([{
            "username": "vince",
            "email": "vince@test.com",
            "first_name": "",
            "last_name": "",
            "gender": "wont-say",
            "birth_date": null,
            "url": "/api/v1/users/1/",
            "profile_pic": null
        }])
    );
}

#[tokio::test]
async fn user_can_update_own_profile_only() {
    let (app, data_manager) = test_app().await;
    let user = register_user(&data_manager, "vince").await;
    let other = register_user(&data_manager, "sarah").await;
    let uri = format!("/api/v1/users/{}/", user.user_id);
    let write = json!({
        "username": "vince",
        "email": "vince@test.com",
        "first_name": "Vince",
        "gender": "male",
    });

    let response = app
        .clone()
        .oneshot(request(Method::PUT, &uri, None, &write))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(Method::PUT, &uri, Some(&other.api_token), &write))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(Method::PUT, &uri, Some(&user.api_token), &write))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["first_name"], "Vince");
    assert_eq!(body["gender"], "male");

    let stored = data_manager.get_user(user.user_id).await.unwrap();
    assert_eq!(stored.first_name, "Vince");
}

#[tokio::test]
async fn user_birth_date_rules_enforced_over_api() {
    let (app, data_manager) = test_app().await;
    let user = register_user(&data_manager, "vince").await;
    let uri = format!("/api/v1/users/{}/", user.user_id);
    let today = Local::now().date_naive();

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &uri,
            Some(&user.api_token),
            &json!({
                "username": "vince",
                "email": "vince@test.com",
                "birth_date": today.checked_add_months(Months::new(12)).unwrap(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"birth_date": ["Birth date cannot be in the future"]})
    );

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &uri,
            Some(&user.api_token),
            &json!({
                "username": "vince",
                "email": "vince@test.com",
                "birth_date": today,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"birth_date": ["User should be 18 years or older"]})
    );

    let eighteen = today.checked_sub_months(Months::new(12 * 18)).unwrap();
    let response = app
        .oneshot(request(
            Method::PUT,
            &uri,
            Some(&user.api_token),
            &json!({
                "username": "vince",
                "email": "vince@test.com",
                "birth_date": eighteen,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_users_is_not_allowed() {
    let (app, data_manager) = test_app().await;
    let user = register_user(&data_manager, "vince").await;

    let response = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/users/{}/", user.user_id),
            Some(&user.api_token),
            &json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
