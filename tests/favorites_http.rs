mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use mangaverse_api::{
    app::create_app,
    models::{ContentKind, FavoriteKey, NewFavorite, User},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn request(method: Method, uri: &str, user: Option<&User>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, common::bearer_for(user));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn app_with_user(username: &str) -> anyhow::Result<(AppState, Router, User)> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, username).await?;
    let app = create_app(state.clone());
    Ok((state, app, user))
}

#[tokio::test]
async fn unauthenticated_check_is_a_soft_failure() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let app = create_app(state);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/favorites/check?contentId=1&contentType=anime", None, None),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["isFavorite"], json!(false));
    assert_eq!(body["message"], json!("Not authenticated"));
    Ok(())
}

#[tokio::test]
async fn toggle_adds_then_removes() -> anyhow::Result<()> {
    let (_state, app, user) = app_with_user("yuji").await?;
    let payload = json!({
        "contentId": "456",
        "contentType": "manga",
        "title": "Jujutsu Kaisen",
        "imageUrl": "https://cdn.example.com/jjk.jpg",
        "score": "8.7",
        "year": 2018
    });

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/favorites/toggle", Some(&user), Some(payload.clone())),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "isFavorite": true, "message": "Added to favorites" })
    );

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/favorites/check?contentId=456&contentType=manga", Some(&user), None),
    )
    .await?;
    assert_eq!(body, json!({ "success": true, "isFavorite": true }));

    let (_, body) = send(
        &app,
        request(Method::POST, "/api/favorites/toggle", Some(&user), Some(payload)),
    )
    .await?;
    assert_eq!(
        body,
        json!({ "success": true, "isFavorite": false, "message": "Removed from favorites" })
    );
    Ok(())
}

#[tokio::test]
async fn toggle_failures_are_reported_in_the_body() -> anyhow::Result<()> {
    let (_state, app, user) = app_with_user("megumi").await?;

    // No identity at all.
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/favorites/toggle",
            None,
            Some(json!({ "contentId": "1", "contentType": "anime" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("isFavorite").is_none());

    // Unknown content type.
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/favorites/toggle",
            Some(&user),
            Some(json!({ "contentId": "1", "contentType": "novel" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap_or_default().contains("contentType"));

    // Not JSON.
    let bad = Request::builder()
        .method(Method::POST)
        .uri("/api/favorites/toggle")
        .header(header::AUTHORIZATION, common::bearer_for(&user))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&app, bad).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn token_for_deleted_account_is_user_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let app = create_app(state);
    let ghost = User {
        id: uuid::Uuid::new_v4(),
        username: "ghost".into(),
        email: "ghost@example.com".into(),
        created_at: chrono::Utc::now(),
    };

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/api/favorites/remove?contentId=1&contentType=anime", Some(&ghost), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap_or_default().contains("User not found"));

    let (status, _) = send(&app, request(Method::GET, "/api/favorites", Some(&ghost), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn remove_endpoint_is_idempotent() -> anyhow::Result<()> {
    let (state, app, user) = app_with_user("nobara").await?;
    state
        .favorites
        .add(&user, NewFavorite::new(FavoriteKey::new("9", ContentKind::Anime)))
        .await?;

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            request(Method::DELETE, "/api/favorites/remove?contentId=9&contentType=anime", Some(&user), None),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Removed from favorites" }));
    }
    assert_eq!(state.favorites.count(&user).await?, 0);

    let (_, body) = send(
        &app,
        request(Method::DELETE, "/api/favorites/remove?contentId=9", Some(&user), None),
    )
    .await?;
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn favorites_page_lists_items_with_total_and_username() -> anyhow::Result<()> {
    let (_state, app, user) = app_with_user("gojo").await?;

    for (id, kind) in [("1", "anime"), ("2", "manga")] {
        send(
            &app,
            request(
                Method::POST,
                "/api/favorites/toggle",
                Some(&user),
                Some(json!({ "contentId": id, "contentType": kind })),
            ),
        )
        .await?;
    }

    let (status, body) = send(&app, request(Method::GET, "/api/favorites", Some(&user), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("gojo"));
    assert_eq!(body["data"]["totalFavorites"], json!(2));
    assert_eq!(body["data"]["favorites"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["meta"]["total"], json!(2));

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/favorites?contentType=manga", Some(&user), None),
    )
    .await?;
    assert_eq!(body["data"]["totalFavorites"], json!(1));
    assert_eq!(body["data"]["favorites"][0]["contentId"], json!("2"));

    let (status, _) = send(&app, request(Method::GET, "/api/favorites", None, None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn pages_fall_back_to_guest() -> anyhow::Result<()> {
    let (_state, app, user) = app_with_user("nanami").await?;

    let (status, body) = send(&app, request(Method::GET, "/api/pages/dashboard", None, None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("Guest"));

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/pages/catalog/manga", Some(&user), None),
    )
    .await?;
    assert_eq!(body["data"]["username"], json!("nanami"));
    assert_eq!(body["data"]["page"], json!("catalogManga"));
    Ok(())
}

#[tokio::test]
async fn malformed_key_query_is_reported_in_the_body() -> anyhow::Result<()> {
    let (_state, app, user) = app_with_user("nobara").await?;
    let duplicated = "contentId=1&contentId=2&contentType=anime";

    let (status, body) = send(
        &app,
        request(Method::DELETE, &format!("/api/favorites/remove?{duplicated}"), Some(&user), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("isFavorite").is_none());
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Could not remove the favorite: ")
    );

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/favorites/check?{duplicated}"), Some(&user), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["isFavorite"], json!(false));
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Server error: ")
    );

    // Without a token the identity failure wins over the bad query.
    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/favorites/check?{duplicated}"), None, None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": false, "isFavorite": false, "message": "Not authenticated" })
    );
    Ok(())
}
