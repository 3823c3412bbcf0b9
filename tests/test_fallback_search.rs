use mockito::{Matcher, Server, ServerGuard};
use mystere_meal::config::FallbackConfig;
use mystere_meal::{
    ApiClient, AppError, FallbackSource, LocalCatalog, Origin, RecipeSearch, SearchQuery,
};

fn chain_for(server: &ServerGuard, fallback: FallbackConfig) -> FallbackSource {
    let client = ApiClient::with_base_url(&format!("{}/api", server.url()), None).unwrap();
    FallbackSource::with_primary(Box::new(client), LocalCatalog::default(), &fallback)
}

fn no_delay(enabled: bool, retry_attempts: u32) -> FallbackConfig {
    FallbackConfig {
        enabled,
        retry_attempts,
        retry_delay_ms: 0,
    }
}

#[tokio::test]
async fn test_backend_answers_search() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ingredients".into(), "egg,milk".into()),
            Matcher::UrlEncoded("maxTime".into(), "20".into()),
            Matcher::UrlEncoded("isVegetarian".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"_id": "abc123", "title": "Backend Omelette", "ingredients": ["egg", "milk"]}]"#,
        )
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 1));
    let result = RecipeSearch::builder()
        .ingredients(["egg", "milk"])
        .max_time(20)
        .vegetarian()
        .search(&chain)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.origin, Origin::Remote);
    assert_eq!(result.value.len(), 1);
    assert_eq!(result.value[0].id, "abc123");
    assert_eq!(result.value[0].title, "Backend Omelette");
}

#[tokio::test]
async fn test_server_error_falls_back_to_catalog() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"message": "Database unavailable"}"#)
        .expect(2)
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 2));
    let query = SearchQuery::new(
        vec!["tomato".to_string(), "basil".to_string()],
        Default::default(),
    );
    let result = chain.search(&query).await.unwrap();

    mock.assert_async().await;
    assert!(result.is_fallback());
    let ids: Vec<&str> = result.value.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "9", "5", "6", "8"]);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 1));
    let result = RecipeSearch::builder()
        .ingredient("quinoa")
        .search(&chain)
        .await
        .unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.value.len(), 1);
    assert_eq!(result.value[0].title, "Pad Thai Noodles");
}

#[tokio::test]
async fn test_disabled_fallback_surfaces_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(r#"{"message": "Try again later"}"#)
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(false, 1));
    let result = RecipeSearch::builder().ingredient("egg").search(&chain).await;

    match result {
        Err(AppError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Try again later");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recipe_detail_falls_back_with_sample_comments() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recipes/6")
        .with_status(404)
        .with_body(r#"{"message": "Recipe not found"}"#)
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 1));
    let detail = chain.recipe("6").await.unwrap();

    assert!(detail.is_fallback());
    assert_eq!(detail.value.recipe.title, "Greek Salad");
    assert_eq!(detail.value.comments.len(), 2);
    assert_eq!(detail.value.comments[0].username, "Chef Mai");
}

#[tokio::test]
async fn test_unknown_recipe_everywhere_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recipes/nope")
        .with_status(404)
        .with_body(r#"{"message": "Recipe not found"}"#)
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 1));
    match chain.recipe("nope").await {
        Err(AppError::AllSourcesFailed(message)) => {
            assert!(message.contains("backend: "));
            assert!(message.contains("Recipe not found"));
            assert!(message.contains("local: "));
        }
        other => panic!("Expected AllSourcesFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_backend_detail_with_comments() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/recipes/r1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "_id": "r1",
                "title": "Shakshuka",
                "ingredients": ["egg", "tomato"],
                "comments": [
                    {"_id": "c1", "user": {"name": "Ana"}, "text": "Lovely", "rating": 5, "createdAt": "2024-03-02T10:00:00.000Z"},
                    {"_id": "c2", "text": "Fine", "rating": 3, "createdAt": "2024-03-03T08:00:00.000Z"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let chain = chain_for(&server, no_delay(true, 1));
    let detail = chain.recipe("r1").await.unwrap();

    assert_eq!(detail.origin, Origin::Remote);
    let comments = &detail.value.comments;
    assert_eq!(comments[0].username, "Ana");
    assert_eq!(comments[0].created_at, "2024-03-02");
    assert_eq!(comments[1].username, "Anonymous");
    assert_eq!(detail.value.average_comment_rating(), Some(4.0));
}
