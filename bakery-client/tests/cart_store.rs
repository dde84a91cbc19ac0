// bakery-client/tests/cart_store.rs
// 购物车文件持久化

use bakery_client::{Cart, CartItem, CartStore, FileCartStore, FileTokenStore, Session, TokenStore};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn cake_a() -> CartItem {
    CartItem {
        cake_id: "cake:a".to_string(),
        name: "Chocolate Fudge".to_string(),
        price: 2500.0,
        quantity: 1,
        image: Some("https://img.test/a.jpg".to_string()),
    }
}

#[test]
fn test_cart_survives_reload() {
    let dir = TempDir::new().unwrap();

    let mut cart = Cart::load(FileCartStore::new(dir.path()));
    cart.add(cake_a()).unwrap();
    cart.set_quantity("cake:a", 3).unwrap();
    assert!(cart.store().exists());
    assert!(cart.store().path().ends_with("valentine_cart.json"));

    let reloaded = Cart::load(FileCartStore::new(dir.path()));
    assert_eq!(reloaded.items(), cart.items());
    assert_eq!(reloaded.total(), Decimal::from(7500));
    assert_eq!(reloaded.count(), 3);
}

#[test]
fn test_set_quantity_zero_empties_cart() {
    let dir = TempDir::new().unwrap();
    let mut cart = Cart::load(FileCartStore::new(dir.path()));
    cart.add(cake_a()).unwrap();
    cart.set_quantity("cake:a", 0).unwrap();
    assert!(cart.is_empty());

    let reloaded = Cart::load(FileCartStore::new(dir.path()));
    assert!(reloaded.is_empty());
}

#[test]
fn test_clear_deletes_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut cart = Cart::load(FileCartStore::new(dir.path()));
    cart.add(cake_a()).unwrap();
    cart.clear().unwrap();
    assert!(!cart.store().exists());

    let mut store = FileCartStore::new(dir.path());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_is_discarded() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("valentine_cart.json"), "[{\"oops\":").unwrap();

    let cart = Cart::load(FileCartStore::new(dir.path()));
    assert!(cart.is_empty());
    assert!(!cart.store().exists());
}

#[test]
fn test_session_token_file() {
    let dir = TempDir::new().unwrap();
    let session = Session::restore(FileTokenStore::new(dir.path()));
    assert!(!session.is_authenticated());
    session.sign_in("jwt-token").unwrap();

    let restored = Session::restore(FileTokenStore::new(dir.path()));
    assert_eq!(restored.token().as_deref(), Some("jwt-token"));

    restored.sign_out();
    assert!(FileTokenStore::new(dir.path()).load().is_none());
}
