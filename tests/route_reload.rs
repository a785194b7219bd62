//! Route table reloads while serving.

use std::time::Duration;

use commerce_ws::ServiceConfig;
use serde_json::Value;

mod common;

const BASE: &str = "commercews.v2.controller.ProductsController.searchProducts.priority";
const CUSTOM: &str = "commercews.v2.controller.CustomProductsController.searchProducts.priority";

async fn search_handler(server: &common::TestServer) -> String {
    let body: Value = common::client()
        .get(server.url("/electronics/products/search?query=camera"))
        .send()
        .await
        .expect("Server unreachable")
        .json()
        .await
        .unwrap();
    body["handler"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_priority_change_takes_effect_without_restart() {
    let mut config = ServiceConfig::default();
    common::set_priority(&mut config, BASE, 3);
    common::set_priority(&mut config, CUSTOM, 5);
    let server = common::start_server(config.clone()).await;

    assert_eq!(search_handler(&server).await, "CustomProductsController.searchProducts");

    common::set_priority(&mut config, BASE, 8);
    server.updates.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(search_handler(&server).await, "ProductsController.searchProducts");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_listener() {
    let server = common::start_server(ServiceConfig::default()).await;
    let res = common::client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    drop(res);

    server.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = common::client().get(server.url("/health")).send().await;
    assert!(res.is_err(), "Listener should be closed after shutdown");
}
