// bakery-client/tests/http_client.rs
// 针对本地桩服务器的 HTTP 客户端测试

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use bakery_client::{
    Cart, CartItem, ClientConfig, ClientError, DeliveryDetails, HttpClient, MemoryCartStore,
    MemoryTokenStore, TokenStore,
};
use serde_json::{Value, json};

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer good-token");
    if authorized {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user": {"id": "user_account:1", "username": "admin", "email": "a@b.co", "role": "admin"}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "code": 1001, "message": "Invalid token"})),
        )
    }
}

async fn create_order(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["customerName"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "code": 2, "message": "customerName is required"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "order": {
                "id": "order:abc123",
                "customerName": body["customerName"],
                "phone": body["phone"],
                "deliveryLocation": body["deliveryLocation"],
                "items": body["items"],
                "totalAmount": body["totalAmount"],
                "status": "pending",
                "createdAt": 1,
                "updatedAt": 1
            }
        })),
    )
}

async fn spawn_stub() -> ClientConfig {
    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/orders", post(create_order));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ClientConfig::new(format!("http://{}", addr)).with_timeout(5)
}

fn delivery(name: &str) -> DeliveryDetails {
    DeliveryDetails {
        customer_name: name.to_string(),
        phone: "0712345678".to_string(),
        delivery_location: "Kilimani".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_unauthorized_clears_stored_token() {
    let config = spawn_stub().await;
    let store = MemoryTokenStore::default();
    store.save("stale-token").unwrap();
    let client = HttpClient::new(&config, store).unwrap();
    assert!(client.session().is_authenticated());

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(err.requires_login());
    assert!(!client.session().is_authenticated());
    assert!(client.session().store().load().is_none());
}

#[tokio::test]
async fn test_valid_token_is_sent() {
    let config = spawn_stub().await;
    let store = MemoryTokenStore::default();
    store.save("good-token").unwrap();
    let client = HttpClient::new(&config, store).unwrap();

    let user = client.me().await.unwrap();
    assert_eq!(user.username, "admin");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_checkout_clears_cart() {
    let config = spawn_stub().await;
    let client = HttpClient::anonymous(&config).unwrap();
    let mut cart = Cart::load(MemoryCartStore::default());
    cart.add(CartItem {
        cake_id: "cake:a".to_string(),
        name: "Lemon Drizzle".to_string(),
        price: 2500.0,
        quantity: 3,
        image: None,
    })
    .unwrap();

    let order = client.checkout(&mut cart, &delivery("Jane")).await.unwrap();
    assert_eq!(order.id, "order:abc123");
    assert_eq!(order.total_amount, 7500.0);
    assert_eq!(order.items[0].quantity, 3);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_validation_error_keeps_cart() {
    let config = spawn_stub().await;
    let client = HttpClient::anonymous(&config).unwrap();
    let mut cart = Cart::load(MemoryCartStore::default());
    cart.add(CartItem {
        cake_id: "cake:a".to_string(),
        name: "Lemon Drizzle".to_string(),
        price: 2500.0,
        quantity: 1,
        image: None,
    })
    .unwrap();

    let err = client.checkout(&mut cart, &delivery("")).await.unwrap_err();
    match err {
        ClientError::Validation(message) => assert_eq!(message, "customerName is required"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(cart.count(), 1);
}

#[tokio::test]
async fn test_empty_cart_is_rejected_locally() {
    let config = spawn_stub().await;
    let client = HttpClient::anonymous(&config).unwrap();
    let mut cart = Cart::load(MemoryCartStore::default());
    let err = client.checkout(&mut cart, &delivery("Jane")).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}
