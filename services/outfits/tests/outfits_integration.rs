//! End-to-end tests of the outfit builder routes
//!
//! Every test drives the router with `oneshot` against a fresh in-memory
//! database and the fixture catalog in `tests/fixtures`.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::{Path, PathBuf};
use tower::ServiceExt;

use outfits::{AppState, catalog::Catalog, config::ServerConfig, create_router};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    common::database::run_migrations(&pool).await.unwrap();

    let catalog_path = fixtures().join("images.csv");
    let catalog = Catalog::load(&catalog_path).unwrap();
    let config = ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        secret_key: "integration-test-secret".to_string(),
        session_expiry: 3600,
        catalog_path,
        static_dir: fixtures(),
    };

    create_router(AppState::new(pool, catalog, config))
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
        .unwrap()
}

async fn register(app: &Router, username: &str) -> TestResponse {
    let email = format!("{username}@example.com");
    send(
        app,
        post_form(
            "/register",
            &[
                ("username", username),
                ("email", &email),
                ("password", "wardrobe99"),
            ],
            None,
        ),
    )
    .await
}

/// Log in and return the `session=...` pair to send back as a cookie
async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        post_form(
            "/login",
            &[("username", username), ("password", "wardrobe99")],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn submit(app: &Router, cookie: &str, title: &str, selected: &str) -> TestResponse {
    send(
        app,
        post_form(
            "/submit",
            &[("selectedItems", selected), ("outfitTitle", title)],
            Some(cookie),
        ),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], true);
}

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let app = test_app().await;

    let response = send(&app, get("/explore", None)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/login?next=%2Fexplore");

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.location(), "/login?next=%2F");

    let response = send(&app, get("/explore", Some("session=forged"))).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_invalid_input() {
    let app = test_app().await;

    let response = register(&app, "alice").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.body["user"].get("password_hash").is_none());

    let response = register(&app, "alice").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "Please use a different username.");

    let response = send(
        &app,
        post_form(
            "/register",
            &[
                ("username", "alice2"),
                ("email", "alice@example.com"),
                ("password", "wardrobe99"),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "Please use a different email address.");

    let response = send(
        &app,
        post_form(
            "/register",
            &[
                ("username", "bad name"),
                ("email", "bad@example.com"),
                ("password", "wardrobe99"),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_sets_cookie_and_follows_next() {
    let app = test_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        post_form(
            "/login",
            &[("username", "alice"), ("password", "not-the-password1")],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid username or password");

    let response = send(
        &app,
        post_form(
            "/login?next=%2Fexplore",
            &[("username", "alice"), ("password", "wardrobe99")],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/explore");
    let set_cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let response = send(
        &app,
        post_form(
            "/login?next=https%3A%2F%2Fevil.example%2F",
            &[("username", "alice"), ("password", "wardrobe99")],
            None,
        ),
    )
    .await;
    assert_eq!(response.location(), "/");

    let cookie = login(&app, "alice").await;
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/");
}

#[tokio::test]
async fn test_create_outfit_lists_items_by_type() {
    let app = test_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(&app, get("/create_outfit", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["item_type"], "Fullbody wear");
    assert_eq!(
        response.body["items_by_type"]["Fullbody wear"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(response.body["types"].as_array().unwrap().len(), 4);
    assert!(response.body["selected_items"].as_array().unwrap().is_empty());

    let response = send(
        &app,
        get(
            "/create_outfit/topwear?selectedItems=%5B%222%22%2C%223%22%5D",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.body["item_type"], "Topwear");
    let tops = response.body["items_by_type"]["Topwear"].as_array().unwrap();
    assert_eq!(tops.len(), 2);
    assert!(
        tops.iter()
            .all(|i| !i["file_path"].as_str().unwrap().contains('\\'))
    );
    let selected = response.body["selected_items"].as_array().unwrap();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0]["srno"], 2);
    assert_eq!(selected[0]["file_path"], "images_dataset/tops/2.jpg");
    assert_eq!(selected[1]["type"], "Bottomwear");

    let response = send(
        &app,
        get("/create_outfit/hats?selectedItems=oops", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body["items_by_type"]
            .as_object()
            .unwrap()
            .is_empty()
    );
    assert!(response.body["selected_items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_saves_outfit_and_reports_statistics() {
    let app = test_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = submit(&app, &cookie, "Weekend", "[1, 3, 7]").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["style"], "Casual");
    assert_eq!(response.body["outfit"]["title"], "Weekend");
    assert_eq!(response.body["outfit"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["curated_fits"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["overall_style"], "Casual");
    assert_eq!(response.body["overall_image"], "images_dataset/tops/1.jpg");
    assert!(!response.body["style_chart"].as_str().unwrap().is_empty());
    assert!(!response.body["type_chart"].as_str().unwrap().is_empty());

    // tie between Formal and Casual goes to the first item's style
    let response = submit(&app, &cookie, "Office", r#"["2", "3"]"#).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["style"], "Formal");
    assert_eq!(response.body["curated_fits"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["overall_style"], "Casual");

    let response = submit(&app, &cookie, "Empty", "[]").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = submit(&app, &cookie, "Broken", "not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = submit(&app, &cookie, "   ", "[1]").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_like_toggles_and_rejects_own_outfits() {
    let app = test_app().await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let outfit_id = submit(&app, &alice, "Gala", "[5]").await.body["outfit"]["id"]
        .as_i64()
        .unwrap();
    let like_uri = format!("/like/{outfit_id}");

    let response = send(&app, post_form(&like_uri, &[], Some(&bob))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["likes"], 1);
    assert_eq!(response.body["liked"], true);

    let response = send(&app, get("/", Some(&bob))).await;
    let trending = response.body["trending_outfits"].as_array().unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0]["like_count"], 1);
    assert_eq!(
        response.body["trending_products"][0]["file_path"],
        "images_dataset/full/5.jpg"
    );

    let response = send(&app, post_form(&like_uri, &[], Some(&bob))).await;
    assert_eq!(response.body["likes"], 0);
    assert_eq!(response.body["liked"], false);

    let response = send(&app, post_form(&like_uri, &[], Some(&alice))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "You cannot like your own outfit");

    let response = send(&app, post_form("/like/9999", &[], Some(&bob))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_views_of_outfits() {
    let app = test_app().await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let first = submit(&app, &alice, "First", "[1]").await.body["outfit"]["id"]
        .as_i64()
        .unwrap();
    let second = submit(&app, &alice, "Second", "[6]").await.body["outfit"]["id"]
        .as_i64()
        .unwrap();

    let response = send(&app, get(&format!("/outfit/{first}"), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "First");
    assert_eq!(response.body["creator"], "alice");
    assert_eq!(response.body["like_count"], 0);

    let response = send(&app, get("/outfit/9999", None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Outfit not found");

    let response = send(&app, get("/explore", Some(&bob))).await;
    assert_eq!(response.body["outfits"].as_array().unwrap().len(), 2);
    let response = send(&app, get("/explore", Some(&alice))).await;
    assert!(response.body["outfits"].as_array().unwrap().is_empty());

    let response = send(&app, get("/profile/alice", Some(&bob))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.body["user"].get("email").is_none());
    assert_eq!(response.body["is_own_profile"], false);
    let outfits = response.body["outfits"].as_array().unwrap();
    assert_eq!(outfits.len(), 2);
    assert_eq!(outfits[0]["id"], second);

    let response = send(&app, get("/profile/alice", Some(&alice))).await;
    assert_eq!(response.body["is_own_profile"], true);

    let response = send(&app, get("/profile/nobody", Some(&alice))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = test_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(&app, get("/explore", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/");

    let response = send(&app, get("/explore", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/login?next=%2Fexplore");
}

#[tokio::test]
async fn test_static_files_are_served() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/static/images.csv", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_style_ties_agree_between_submit_and_profile() {
    let app = test_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    submit(&app, &cookie, "A", "[1]").await;
    let submitted = submit(&app, &cookie, "B", "[2]").await;
    assert_eq!(submitted.body["overall_style"], "Casual");
    assert_eq!(submitted.body["overall_image"], "images_dataset/tops/1.jpg");

    let profile = send(&app, get("/profile/alice", Some(&cookie))).await;
    assert_eq!(profile.body["overall_style"], submitted.body["overall_style"]);
    assert_eq!(profile.body["overall_image"], submitted.body["overall_image"]);
    assert_eq!(profile.body["outfits"][0]["title"], "B");
}

#[tokio::test]
async fn test_trending_products_ties_keep_creation_order() {
    let app = test_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    submit(&app, &cookie, "A", "[1]").await;
    submit(&app, &cookie, "B", "[3]").await;

    let response = send(&app, get("/", Some(&cookie))).await;
    let products = response.body["trending_products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["file_path"], "images_dataset/tops/1.jpg");
    assert_eq!(products[1]["file_path"], "images_dataset/bottoms/3.jpg");
}

#[tokio::test]
async fn test_register_accepts_letters_only_password() {
    let app = test_app().await;

    let response = send(
        &app,
        post_form(
            "/register",
            &[
                ("username", "carol"),
                ("email", "carol@example.com"),
                ("password", "password"),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
}
