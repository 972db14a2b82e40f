//! Status handles driven against a mock user service.

mod common;

use std::time::Duration;

use common::{TestContext, payload, user_json};
use userdir_business::{
    CreateUserMutation, DeleteUserMutation, ListUsersQuery, MutationStatus, QueryStatus,
    UpdateUserMutation, UserId,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_list_query_publishes_loaded_data() {
    let ctx = TestContext::new().await;
    ctx.mock_list(vec![user_json(1, "alice"), user_json(2, "bob")])
        .await;

    let query = ListUsersQuery::new(&ctx.client, 1, 10);
    assert_eq!(query.state(), QueryStatus::Idle);
    assert!(!query.loading());

    let status = query.refresh().await;
    assert!(status.is_success());
    assert!(query.success());
    assert!(query.error().is_none());
    assert_eq!(query.data().map(|users| users.len()), Some(2));
}

#[tokio::test]
async fn test_list_query_watch_sees_loading_then_loaded() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "users": [user_json(1, "alice")] }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&ctx.mock_server)
        .await;

    let query = ListUsersQuery::new(&ctx.client, 1, 10);
    let mut rx = query.watch();

    let observer = async {
        rx.changed().await.unwrap();
        let first = rx.borrow_and_update().clone();
        rx.changed().await.unwrap();
        let second = rx.borrow_and_update().clone();
        (first, second)
    };

    let (_, (first, second)) = tokio::join!(query.refresh(), observer);
    assert!(first.is_loading());
    assert!(second.is_success());
}

#[tokio::test]
async fn test_list_query_error_message() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&ctx.mock_server)
        .await;

    let query = ListUsersQuery::new(&ctx.client, 1, 10);
    query.refresh().await;

    assert!(!query.success());
    assert_eq!(
        query.error().as_deref(),
        Some("Request failed with status 500 (status 500)")
    );
    assert!(query.data().is_none());
}

#[tokio::test]
async fn test_list_query_refetch_hits_network_again() {
    let ctx = TestContext::new().await;
    ctx.mock_list(vec![user_json(1, "alice")]).await;

    let query = ListUsersQuery::new(&ctx.client, 1, 10);
    query.refresh().await;
    query.refresh().await;
    assert_eq!(ctx.request_count("GET", "/").await, 1);

    query.refetch().await;
    assert_eq!(ctx.request_count("GET", "/").await, 2);
}

#[tokio::test]
async fn test_list_query_keeps_page_subscribed() {
    let ctx = TestContext::new().await;
    ctx.mock_list(vec![user_json(1, "alice")]).await;

    let mut query = ListUsersQuery::new(&ctx.client, 1, 10);
    let key = query.cache_key().clone();
    assert_eq!(ctx.client.cache().subscriber_count(&key), 1);

    query.set_page(2, 10);
    assert_eq!(ctx.client.cache().subscriber_count(&key), 0);
    assert_eq!(query.page(), 2);
    assert_eq!(query.state(), QueryStatus::Idle);
}

#[tokio::test]
async fn test_create_mutation_success_and_reset() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json(21, "dave")))
        .mount(&ctx.mock_server)
        .await;

    let mutation = CreateUserMutation::new(&ctx.client);
    let user = mutation.call(payload("dave")).await.unwrap();

    assert_eq!(user.id, UserId::new("21"));
    assert!(mutation.success());
    assert_eq!(
        mutation.state().success_response().map(|u| u.username.as_str()),
        Some("dave")
    );

    mutation.reset();
    assert_eq!(mutation.state(), MutationStatus::Idle);
}

#[tokio::test]
async fn test_create_mutation_validation_error() {
    let ctx = TestContext::new().await;

    let mutation = CreateUserMutation::new(&ctx.client);
    let mut request = payload("dave");
    request.password = "123".to_owned();

    let err = mutation.call(request).await.unwrap_err();
    assert!(err.validation_errors().unwrap().contains("password"));
    assert!(mutation.state().is_error());
    assert!(mutation.error().unwrap().contains("password"));
    assert_eq!(ctx.total_requests().await, 0);
}

#[tokio::test]
async fn test_update_and_delete_mutations() {
    let ctx = TestContext::new().await;
    Mock::given(method("PATCH"))
        .and(path("/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(3, "carla")))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "success", "message": "Gone" })),
        )
        .mount(&ctx.mock_server)
        .await;

    let update = UpdateUserMutation::new(&ctx.client);
    let updated = update
        .call((UserId::new("3"), payload("carla")))
        .await
        .unwrap();
    assert_eq!(updated.username, "carla");
    assert!(update.success());

    let delete = DeleteUserMutation::new(&ctx.client);
    let response = delete.call(UserId::new("3")).await.unwrap();
    assert_eq!(response.message, "Gone");
    assert!(!delete.loading());
    assert!(delete.error().is_none());
}
