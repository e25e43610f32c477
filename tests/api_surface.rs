//! Integration tests for the delegated-authorization HTTP surface.

use serde_json::Value;

mod common;

#[tokio::test]
async fn lists_access_tokens_with_collection_links() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    let tokens = body["access_tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        body["links"]["self"],
        Value::String("/v3/users/42/OS-OAUTH1/access_tokens".to_string())
    );
    assert!(body["links"]["next"].is_null());
    assert!(body["links"]["previous"].is_null());
}

#[tokio::test]
async fn listing_for_unknown_user_is_empty_not_404() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/nobody/OS-OAUTH1/access_tokens",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["access_tokens"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn gets_one_access_token() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/99",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["access_token"]["id"], "99");
    assert_eq!(body["access_token"]["consumer_id"], "consumer-7");
    assert_eq!(body["access_token"]["authorizing_user_id"], "42");
    assert_eq!(body["access_token"]["expires_at"], "2030-01-01T00:00:00Z");
}

#[tokio::test]
async fn tokens_without_expiry_serialize_null() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/100",
        server.base_url
    ))
    .await
    .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["access_token"]["expires_at"].is_null());
}

#[tokio::test]
async fn unknown_token_returns_error_envelope() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/does-not-exist",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 404);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["title"], "Not Found");
}

#[tokio::test]
async fn revocation_deletes_the_token() {
    let server = common::start_seeded_server().await;
    let client = reqwest::Client::new();
    let url = format!("{}/v3/users/42/OS-OAUTH1/access_tokens/99", server.base_url);

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), 204);

    // Gone for reads and for a second revocation.
    assert_eq!(reqwest::get(&url).await.unwrap().status(), 404);
    assert_eq!(client.delete(&url).send().await.unwrap().status(), 404);

    // The other token is untouched.
    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens",
        server.base_url
    ))
    .await
    .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["access_tokens"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn lists_and_gets_delegated_roles() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/99/roles",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["roles"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["links"]["self"],
        Value::String("/v3/users/42/OS-OAUTH1/access_tokens/99/roles".to_string())
    );

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/99/roles/role-1",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"]["id"], "role-1");
    assert_eq!(body["role"]["name"], "reader");
}

#[tokio::test]
async fn role_not_delegated_by_token_is_404() {
    let server = common::start_seeded_server().await;

    // token 100 delegates no roles
    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens/100/roles/role-1",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn head_is_served_wherever_get_is_declared() {
    let server = common::start_seeded_server().await;
    let client = reqwest::Client::new();

    let res = client
        .head(format!(
            "{}/v3/users/42/OS-OAUTH1/access_tokens",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "");
}

#[tokio::test]
async fn undeclared_verbs_get_405() {
    let server = common::start_seeded_server().await;
    let client = reqwest::Client::new();

    // DELETE is declared on the item, not the collection.
    let res = client
        .delete(format!(
            "{}/v3/users/42/OS-OAUTH1/access_tokens",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    let res = client
        .post(format!(
            "{}/v3/users/42/OS-OAUTH1/access_tokens/99",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);
}

#[tokio::test]
async fn routes_are_only_mounted_under_the_prefix() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/users/42/OS-OAUTH1/access_tokens",
        server.base_url
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 404);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], 404);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let server = common::start_seeded_server().await;

    let res = reqwest::get(format!(
        "{}/v3/users/42/OS-OAUTH1/access_tokens",
        server.base_url
    ))
    .await
    .unwrap();
    let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn client_supplied_request_ids_are_kept() {
    let server = common::start_seeded_server().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/v3/users/42/OS-OAUTH1/access_tokens",
            server.base_url
        ))
        .header("x-request-id", "caller-chosen-id")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("x-request-id").unwrap(),
        "caller-chosen-id"
    );
}
