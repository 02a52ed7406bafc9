//! Client, product, dashboard and profile screens against the fake API

mod support;

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use support::{location, TestEnv, USER_EMAIL};

async fn body(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_client_edit_round_trip_is_identity() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let before = body(env.get("/clients", Some(&cookie)).await).await["data"]["records"].clone();

    for id in [1, 2] {
        let form = body(env.get(&format!("/clients/form?id={}", id), Some(&cookie)).await).await;
        assert_eq!(form["data"]["id"], id);

        let response = env
            .post_json(&format!("/clients/form?id={}", id), &cookie, form["data"]["form"].clone())
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/clients");
    }

    let after = body(env.get("/clients", Some(&cookie)).await).await;
    assert_eq!(after["data"]["records"], before);
    assert_eq!(after["notification"]["message"], "Client updated successfully");
}

#[tokio::test]
async fn test_delete_in_one_session_leaves_other_list_until_refetch() {
    let env = TestEnv::start().await;
    let tab_a = env.login_cookie(USER_EMAIL).await;
    let tab_b = env.login_cookie(USER_EMAIL).await;

    let list_a = body(env.get("/clients", Some(&tab_a)).await).await;
    let list_b = body(env.get("/clients", Some(&tab_b)).await).await;
    assert_eq!(list_a["data"]["records"].as_array().unwrap().len(), 2);

    let response = env.post("/clients/2/delete", &tab_a).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/clients");

    let list_a = body(env.get("/clients", Some(&tab_a)).await).await;
    let records = list_a["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|c| c["id"] != 2));
    assert_eq!(list_a["notification"]["message"], "Client deleted successfully");

    // Tab B still holds what it fetched, and its flash queue is untouched
    assert_eq!(list_b["data"]["records"].as_array().unwrap().len(), 2);
    let list_b = body(env.get("/clients", Some(&tab_b)).await).await;
    assert_eq!(list_b["data"]["records"].as_array().unwrap().len(), 1);
    assert!(list_b.get("notification").is_none());
}

#[tokio::test]
async fn test_filters_are_normalized_and_echoed() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let list = body(env.get("/clients?name=%20acme%20&email=", Some(&cookie)).await).await;
    assert_eq!(list["query"], "name=acme");
    assert_eq!(list["data"]["filter"]["name"], "acme");
    assert_eq!(list["data"]["records"].as_array().unwrap().len(), 1);

    let response = env.get("/clients/reset", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/clients");

    let list = body(env.get("/clients", Some(&cookie)).await).await;
    assert_eq!(list["query"], "");
}

#[tokio::test]
async fn test_superseded_search_is_not_applied() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let slow = env.get("/clients?name=slow", Some(&cookie));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        env.get("/clients?name=globex", Some(&cookie)).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.status(), StatusCode::CONFLICT);
    let slow = body(slow).await;
    assert_eq!(slow["stale"], true);
    assert!(slow["data"].is_null());
    assert_eq!(slow["notification"]["level"], "info");

    assert_eq!(fast.status(), StatusCode::OK);
    let fast = body(fast).await;
    assert_eq!(fast["data"]["records"][0]["name"], "Globex");
}

#[tokio::test]
async fn test_create_client_flashes_on_list() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let form = json!({"name": "Initech", "email": "it@initech.test", "paymentPreferences": "Cash"});
    let response = env.post_json("/clients/form", &cookie, form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let list = body(env.get("/clients", Some(&cookie)).await).await;
    assert_eq!(list["notification"]["level"], "success");
    assert_eq!(list["notification"]["message"], "Client added successfully");
    assert_eq!(list["data"]["records"].as_array().unwrap().len(), 3);

    let list = body(env.get("/clients", Some(&cookie)).await).await;
    assert!(list.get("notification").is_none());
}

#[tokio::test]
async fn test_rejected_client_keeps_form_editable() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let form = json!({"name": "Acme Again", "email": "billing@acme.test", "paymentPreferences": "Cash"});
    let response = env.post_json("/clients/form", &cookie, form).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let screen = body(response).await;
    assert_eq!(screen["screen"], "clients-form");
    assert_eq!(screen["notification"]["message"], "Email already used");
    assert_eq!(screen["data"]["form"]["name"], "Acme Again");
    assert!(screen["data"]["id"].is_null());
}

#[tokio::test]
async fn test_invalid_client_is_blocked_before_the_api() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let response = env
        .post_json("/clients/form", &cookie, json!({"name": " ", "email": "nope"}))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let screen = body(response).await;
    assert_eq!(screen["fieldErrors"]["name"], "Required");
    assert_eq!(screen["fieldErrors"]["email"], "Invalid email");
    assert_eq!(screen["fieldErrors"]["paymentPreferences"], "Required");
    assert_eq!(env.fake.calls_to("POST /clients"), 0);
}

#[tokio::test]
async fn test_product_filters() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let list = body(env.get("/products?minPrice=5", Some(&cookie)).await).await;
    let records = list["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Widget");

    let response = env.get("/products?minPrice=-1", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let screen = body(response).await;
    assert_eq!(screen["fieldErrors"]["minPrice"], "Must not be negative");
}

#[tokio::test]
async fn test_missing_product_redirects_with_notification() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let response = env.get("/products/form?id=99", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let list = body(env.get("/products", Some(&cookie)).await).await;
    assert_eq!(list["notification"]["level"], "error");
    assert_eq!(list["notification"]["message"], "Failed to load product");
}

#[tokio::test]
async fn test_dashboard_figures() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let screen = body(env.get("/dashboard", Some(&cookie)).await).await;
    let stats = &screen["data"];
    assert_eq!(stats["invoiceCount"], 2);
    assert_eq!(stats["paidCount"], 1);
    assert_eq!(stats["unpaidCount"], 1);
    assert_eq!(stats["revenue"].as_f64(), Some(31.5));
    assert_eq!(stats["clientCount"], 2);
}

#[tokio::test]
async fn test_profile_update() {
    let env = TestEnv::start().await;
    let cookie = env.login_cookie(USER_EMAIL).await;

    let screen = body(env.get("/profile", Some(&cookie)).await).await;
    assert_eq!(screen["data"]["name"], "Ana");

    let response = env
        .post_json("/profile", &cookie, json!({"name": "Ana B", "email": USER_EMAIL}))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile");

    let screen = body(env.get("/profile", Some(&cookie)).await).await;
    assert_eq!(screen["data"]["name"], "Ana B");
    assert_eq!(screen["notification"]["message"], "Profile updated successfully");

    let response = env
        .post_json("/profile", &cookie, json!({"name": "", "email": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let screen = body(response).await;
    assert_eq!(screen["fieldErrors"]["name"], "Name is required");
    assert_eq!(screen["fieldErrors"]["email"], "Email is required");
}
