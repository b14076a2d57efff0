// Product Service API Integration Tests
//
// Purpose: Drive every catalog endpoint through the router against a temporary database.json
// Run with: cargo test --test product_service_tests

#[cfg(feature = "api")]
mod product_service_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use storefront::{create_catalog_router, CatalogApp, CatalogConfig, CatalogState};
    use tempfile::TempDir;
    use tower::ServiceExt; // for oneshot

    // Helper: Create app over a fresh data directory
    fn create_test_app() -> (CatalogApp, TempDir) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = CatalogConfig {
            port: 0,
            data_dir: dir.path().to_path_buf(),
        };
        let state = CatalogState::new(&config).expect("Failed to initialize state");
        (create_catalog_router(state), dir)
    }

    fn database_path(dir: &TempDir) -> PathBuf {
        dir.path().join("database.json")
    }

    fn stored_products(dir: &TempDir) -> Vec<Value> {
        let contents = std::fs::read_to_string(database_path(dir)).unwrap();
        let doc: Value = serde_json::from_str(&contents).unwrap();
        doc["products"].as_array().unwrap().clone()
    }

    // Helper: Send a request and parse the JSON response (Null for empty bodies)
    async fn send(app: &CatalogApp, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Failed to parse JSON")
        };
        (status, value)
    }

    async fn seed(app: &CatalogApp, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let body = json!({"name": name, "price": (i + 1) as f64 * 10.0}).to_string();
            let (status, _) = send(app, "POST", "/products", Some(&body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    // =========================================================================
    // Section 1: Startup + Health
    // =========================================================================

    #[tokio::test]
    async fn test_startup_creates_empty_database() {
        let (app, dir) = create_test_app();

        assert!(database_path(&dir).exists());
        let (status, body) = send(&app, "GET", "/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _dir) = create_test_app();

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Create
    // =========================================================================

    #[tokio::test]
    async fn test_create_product_assigns_max_plus_one() {
        let (app, dir) = create_test_app();
        std::fs::write(
            database_path(&dir),
            r#"{"products": [{"id": 4, "name": "Old", "price": 1, "description": ""}]}"#,
        )
        .unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/products",
            Some(r#"{"name": "Lamp", "price": 25.5, "description": "Desk lamp"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
        assert_eq!(body["name"], "Lamp");
        assert_eq!(body["price"], 25.5);
        assert_eq!(body["description"], "Desk lamp");
        assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));
        assert!(body.get("updatedAt").is_none());

        assert_eq!(stored_products(&dir).len(), 2);
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let (app, dir) = create_test_app();

        for body in [r#"{"name": "Lamp"}"#, r#"{"price": 3}"#, r#"{"name": "", "price": 3}"#, ""] {
            let (status, response) = send(&app, "POST", "/products", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(response["error"], "Name and price are required");
        }
        assert!(stored_products(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_loose_field_types() {
        let (app, dir) = create_test_app();

        let (status, body) = send(&app, "POST", "/products", Some(r#"{"name": "A", "price": "12"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["price"], "12");

        let (status, body) = send(&app, "POST", "/products", Some(r#"{"name": 7, "price": 3}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], 7);

        let stored = stored_products(&dir);
        assert_eq!(stored[0]["price"], "12");
        // Integer prices are written back as integers, not 3.0
        assert!(stored[1]["price"].is_i64(), "got: {}", stored[1]["price"]);
    }

    #[tokio::test]
    async fn test_string_price_database_survives_writes() {
        let (app, dir) = create_test_app();
        std::fs::write(
            database_path(&dir),
            r#"{"products": [
                {"id": 1, "name": "Old", "price": "12", "description": ""},
                {"id": 2, "name": "Older", "price": 5, "description": ""}
            ]}"#,
        )
        .unwrap();

        let (status, body) = send(&app, "GET", "/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(&app, "POST", "/products", Some(r#"{"name": "New", "price": 1}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 3);

        let stored = stored_products(&dir);
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0]["price"], "12");
        assert_eq!(stored[1]["price"], 5);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _dir) = create_test_app();

        let (status, body) = send(&app, "POST", "/products", Some("{ not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request data");

        let (status, body) = send(&app, "PUT", "/products", Some("[1,")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request data");
    }

    #[tokio::test]
    async fn test_bulk_create() {
        let (app, dir) = create_test_app();
        seed(&app, &["First"]).await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/bulk",
            Some(r#"{"products": [{"name": "A", "price": 1}, {"name": "B", "price": 2}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let created = body["products"].as_array().unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0]["id"], 2);
        assert_eq!(created[1]["id"], 3);
        assert_eq!(stored_products(&dir).len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_create_rejects_whole_batch() {
        let (app, dir) = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/products/bulk",
            Some(r#"{"products": [{"name": "A", "price": 1}, {"name": "B"}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and price are required for all products");
        assert!(stored_products(&dir).is_empty());

        let (status, body) = send(&app, "POST", "/products/bulk", Some(r#"{"products": 3}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Products array is required");
    }

    // =========================================================================
    // Section 3: Read
    // =========================================================================

    #[tokio::test]
    async fn test_get_product_by_id() {
        let (app, _dir) = create_test_app();
        seed(&app, &["Chair", "Table"]).await;

        let (status, body) = send(&app, "GET", "/products/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Table");

        let (status, body) = send(&app, "GET", "/products/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_unknown_endpoints() {
        let (app, _dir) = create_test_app();

        for (method, uri) in [
            ("GET", "/products/abc"),
            ("GET", "/products/bulk"),
            ("GET", "/orders"),
            ("PATCH", "/products"),
            ("POST", "/products/1"),
            ("DELETE", "/products/bulk"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            assert_eq!(body["error"], "Endpoint not found", "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_trailing_slashes_are_trimmed() {
        let (app, _dir) = create_test_app();
        seed(&app, &["Chair"]).await;

        let (status, body) = send(&app, "GET", "/products/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/products/1/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Chair");

        let (status, _) = send(&app, "PUT", "/products/1//", Some(r#"{"name": "Stool", "price": 4}"#)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreadable_database_reads_as_empty() {
        let (app, dir) = create_test_app();
        std::fs::write(database_path(&dir), "garbage").unwrap();

        let (status, body) = send(&app, "GET", "/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    // =========================================================================
    // Section 4: Update
    // =========================================================================

    #[tokio::test]
    async fn test_update_product() {
        let (app, dir) = create_test_app();
        seed(&app, &["Chair"]).await;
        let created_at = stored_products(&dir)[0]["createdAt"].clone();

        let (status, body) = send(
            &app,
            "PUT",
            "/products/1",
            Some(r#"{"name": "Armchair", "price": 99}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Armchair");
        assert_eq!(body["price"], 99);
        assert_eq!(body["createdAt"], created_at);
        assert!(body["updatedAt"].is_string());
        assert_eq!(stored_products(&dir)[0]["name"], "Armchair");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_404_before_validation() {
        let (app, _dir) = create_test_app();

        let (status, body) = send(&app, "PUT", "/products/7", Some("{}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_bulk_update() {
        let (app, dir) = create_test_app();
        seed(&app, &["A", "B", "C"]).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/products",
            Some(r#"{"products": [{"id": 1, "name": "A2", "price": 5}, {"id": "3", "name": "C2", "price": 6}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
        let stored = stored_products(&dir);
        assert_eq!(stored[0]["name"], "A2");
        assert_eq!(stored[1]["name"], "B");
        assert_eq!(stored[2]["name"], "C2");
    }

    #[tokio::test]
    async fn test_bulk_update_non_numeric_id_is_404() {
        let (app, _dir) = create_test_app();
        seed(&app, &["A"]).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/products",
            Some(r#"{"products": [{"id": "abc", "name": "A2", "price": 5}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product with id abc not found");
    }

    #[tokio::test]
    async fn test_bulk_update_unknown_id_writes_nothing() {
        let (app, dir) = create_test_app();
        seed(&app, &["A"]).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/products",
            Some(r#"{"products": [{"id": 1, "name": "A2", "price": 5}, {"id": 8, "name": "X", "price": 1}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product with id 8 not found");
        assert_eq!(stored_products(&dir)[0]["name"], "A");
    }

    // =========================================================================
    // Section 5: Delete
    // =========================================================================

    #[tokio::test]
    async fn test_delete_product() {
        let (app, dir) = create_test_app();
        seed(&app, &["A", "B"]).await;

        let (status, body) = send(&app, "DELETE", "/products/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert_eq!(stored_products(&dir).len(), 1);

        let (status, body) = send(&app, "DELETE", "/products/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_delete_by_ids() {
        let (app, dir) = create_test_app();
        seed(&app, &["A", "B", "C"]).await;

        let (status, _) = send(&app, "DELETE", "/products", Some(r#"{"ids": [1, 3]}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let stored = stored_products(&dir);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["id"], 2);

        let (status, body) = send(&app, "DELETE", "/products", Some(r#"{"ids": [42]}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No matching products found");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (app, dir) = create_test_app();
        seed(&app, &["A", "B"]).await;

        let (status, _) = send(&app, "DELETE", "/products", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(stored_products(&dir).is_empty());

        // Ids restart at 1 once the catalog is empty
        let (_, body) = send(&app, "POST", "/products", Some(r#"{"name": "New", "price": 1}"#)).await;
        assert_eq!(body["id"], 1);
    }

    // =========================================================================
    // Section 6: Write failures
    // =========================================================================

    #[tokio::test]
    async fn test_write_failure_is_500() {
        let (app, dir) = create_test_app();
        seed(&app, &["A"]).await;

        // Replace the database with a directory so the rewrite fails
        std::fs::remove_file(database_path(&dir)).unwrap();
        std::fs::create_dir(database_path(&dir)).unwrap();

        let (status, body) = send(&app, "POST", "/products", Some(r#"{"name": "B", "price": 2}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save product");
    }
}
