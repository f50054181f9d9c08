//! API integration tests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use library_server::{api, config::AppConfig, repository::Repository, AppState};

/// Serve the real router over an in-memory database on an ephemeral port
async fn spawn_app(items_per_page: i64) -> String {
    let mut config = AppConfig::default();
    config.pagination.items_per_page = items_per_page;

    let repository = Repository::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    let app = api::create_router(AppState::new(config, repository));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

/// Register a member and return a bearer token for it
async fn get_auth_token(client: &Client, base_url: &str) -> String {
    let response = client
        .post(format!("{}/register", base_url))
        .json(&json!({
            "name": "Alice",
            "email": "a@x.com",
            "password": "pw1"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/login", base_url))
        .json(&json!({
            "email": "a@x.com",
            "password": "pw1"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

async fn create_book(client: &Client, base_url: &str, token: &str, book: Value) -> Value {
    let response = client
        .post(format!("{}/books", base_url))
        .bearer_auth(token)
        .json(&book)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_app(10).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("{}/ready", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_register_and_login() {
    let base_url = spawn_app(10).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/register", base_url))
        .json(&json!({"name": "Alice", "email": "a@x.com", "password": "pw1"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let text = response.text().await.expect("Failed to read response");
    assert!(!text.contains("pw1"));
    assert!(!text.contains("argon2"));
    let body: Value = serde_json::from_str(&text).expect("Failed to parse response");
    assert_eq!(body["message"], "Member registered successfully");

    let response = client
        .post(format!("{}/login", base_url))
        .json(&json!({"email": "a@x.com", "password": "pw1"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    get_auth_token(&client, &base_url).await;

    let response = client
        .post(format!("{}/register", base_url))
        .json(&json!({"name": "Other", "email": "a@x.com", "password": "pw2"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    get_auth_token(&client, &base_url).await;

    let response = client
        .post(format!("{}/login", base_url))
        .json(&json!({"email": "a@x.com", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_unauthorized_access() {
    let base_url = spawn_app(10).await;
    let client = Client::new();

    for path in ["/books", "/books/1", "/members", "/members/1"] {
        let response = client
            .get(format!("{}{}", base_url, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let response = client
        .get(format!("{}/books", base_url))
        .bearer_auth("forged.token.value")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_end_to_end_catalog_flow() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    let body = create_book(
        &client,
        &base_url,
        &token,
        json!({"title": "Dune", "author": "Herbert", "isbn": "1234567890123"}),
    )
    .await;
    assert_eq!(body["message"], "Book added successfully");
    assert_eq!(body["book"]["id"], 1);
    assert_eq!(body["book"]["quantity"], 1);

    let response = client
        .get(format!("{}/books?search=dune", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["books"][0]["id"], 1);
}

#[tokio::test]
async fn test_duplicate_isbn() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    create_book(
        &client,
        &base_url,
        &token,
        json!({"title": "Dune", "author": "Herbert", "isbn": "1234567890123"}),
    )
    .await;

    let response = client
        .post(format!("{}/books", base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "Copy", "author": "Someone", "isbn": "1234567890123"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/books/1", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Dune");
}

#[tokio::test]
async fn test_create_book_validation() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    for book in [
        json!({"author": "Herbert", "isbn": "1"}),
        json!({"title": "Dune", "author": "Herbert", "isbn": "12345678901234"}),
        json!({"title": "Dune", "author": "Herbert", "isbn": "1", "quantity": "many"}),
    ] {
        let response = client
            .post(format!("{}/books", base_url))
            .bearer_auth(&token)
            .json(&book)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", book);
    }
}

#[tokio::test]
async fn test_book_pagination() {
    let base_url = spawn_app(2).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    for i in 0..5 {
        create_book(
            &client,
            &base_url,
            &token,
            json!({"title": format!("Book {}", i), "author": "Author", "isbn": format!("isbn{}", i)}),
        )
        .await;
    }

    for (page, expected) in [(1, 2), (2, 2), (3, 1), (4, 0)] {
        let response = client
            .get(format!("{}/books?page={}", base_url, page))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["books"].as_array().map(Vec::len), Some(expected));
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["total_items"], 5);
        assert_eq!(body["current_page"], page);
    }

    let response = client
        .get(format!("{}/books?page=oops", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["current_page"], 1);
}

#[tokio::test]
async fn test_update_and_delete_book() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    create_book(
        &client,
        &base_url,
        &token,
        json!({"title": "The Hobbit", "author": "J.R.R. Tolkien", "isbn": "9780261102217"}),
    )
    .await;

    let response = client
        .put(format!("{}/books/1", base_url))
        .bearer_auth(&token)
        .json(&json!({"quantity": 3}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["book"]["quantity"], 3);
    assert_eq!(body["book"]["title"], "The Hobbit");
    assert_eq!(body["book"]["author"], "J.R.R. Tolkien");
    assert_eq!(body["book"]["isbn"], "9780261102217");

    let response = client
        .put(format!("{}/books/1", base_url))
        .bearer_auth(&token)
        .json(&json!({"title": null}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put(format!("{}/books/99", base_url))
        .bearer_auth(&token)
        .json(&json!({"quantity": 3}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("{}/books/1", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book deleted successfully");

    for _ in 0..2 {
        let response = client
            .get(format!("{}/books/1", base_url))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = client
        .delete(format!("{}/books/1", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_directory() {
    let base_url = spawn_app(10).await;
    let client = Client::new();
    let token = get_auth_token(&client, &base_url).await;

    let response = client
        .get(format!("{}/members", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["members"][0]["email"], "a@x.com");
    assert!(body["members"][0].get("password").is_none());

    let response = client
        .put(format!("{}/members/1", base_url))
        .bearer_auth(&token)
        .json(&json!({"name": "Alicia", "password": "pw2"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Member updated successfully");
    assert_eq!(body["member"]["name"], "Alicia");
    assert_eq!(body["member"]["email"], "a@x.com");
    assert!(body["member"].get("password").is_none());

    let response = client
        .post(format!("{}/login", base_url))
        .json(&json!({"email": "a@x.com", "password": "pw2"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/members/1", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/members/1", base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
