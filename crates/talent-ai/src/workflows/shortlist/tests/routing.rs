use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::shortlist::domain::Recommendation;
use crate::workflows::shortlist::router::shortlist_router;
use crate::workflows::shortlist::service::ShortlistGenerator;

fn shortlist_request(entity_id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/entities/{entity_id}/shortlist"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn shortlist_route_returns_ranked_candidates() {
    let (generator, _) = generator_with(vec![
        scored("a", Some(91), Some(Recommendation::Recommended)),
        scored("b", Some(97), Some(Recommendation::HighlyRecommended)),
        scored("c", Some(40), Some(Recommendation::HighlyRecommended)),
    ]);
    let router = shortlist_router(Arc::new(generator));

    let response = router
        .oneshot(shortlist_request(
            "gig-42",
            json!({ "kind": "gig", "maxCandidates": 1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["shortlist"]["entityId"], json!("gig-42"));
    assert_eq!(payload["shortlist"]["candidates"][0]["id"], json!("b"));
    assert_eq!(payload["shortlist"]["totalCandidates"], json!(2));
    assert_eq!(payload["shortlist"]["options"]["minScore"], json!(70));
    assert_eq!(payload["headline"], json!("showing 1 of 2"));
}

#[tokio::test]
async fn shortlist_route_rejects_invalid_options() {
    let (generator, _) = generator_with(Vec::new());
    let router = shortlist_router(Arc::new(generator));

    let response = router
        .oneshot(shortlist_request("gig-42", json!({ "minScore": 150 })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("minScore"));
}

#[tokio::test]
async fn shortlist_route_surfaces_source_failures() {
    let router = shortlist_router(Arc::new(ShortlistGenerator::new(Arc::new(UnavailableScores))));

    let response = router
        .oneshot(shortlist_request("gig-42", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("scoring store unavailable: scoring store offline"));
}
