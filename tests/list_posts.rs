#![cfg(feature = "inmem-store")]

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{empty_request, harness, response_json};
use lambda_http::{Request, RequestExt};
use sitelog::handlers::list;
use sitelog::models::{with_image_urls, Post};
use sitelog::repo::{inmem::InMemRepo, PostRepo};

fn post(created_at: &str, build_site: &str, image_names: Option<Vec<String>>) -> Post {
    Post {
        id: "POSTS".into(),
        post_id: format!("post-{created_at}"),
        created_at: created_at.into(),
        name: "crew".into(),
        hours: "8".into(),
        costs: "120".into(),
        report: "poured slab".into(),
        build_site: build_site.into(),
        image_names,
        image_urls: None,
    }
}

async fn seeded_repo() -> Arc<InMemRepo> {
    let repo = Arc::new(InMemRepo::new());
    for p in [
        post("2024-03-01T09:00:00+11:00", "site1", None),
        post(
            "2024-03-02T09:00:00+11:00",
            "site2",
            Some(vec!["a.png".into(), "b.png".into()]),
        ),
        post("2024-03-03T09:00:00+11:00", "site1", None),
    ] {
        repo.put_post(&p).await.unwrap();
    }
    repo
}

fn list_request(params: &[(&str, &str)]) -> Request {
    let map: HashMap<String, String> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    empty_request("GET").with_query_string_parameters(map)
}

#[tokio::test]
async fn returns_all_posts_newest_first() {
    let h = harness(seeded_repo().await);

    let resp = list::handle(&h.state, empty_request("GET")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Access-Control-Allow-Methods"], "GET");

    let body = response_json(&resp);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["createdAt"], "2024-03-03T09:00:00+11:00");
    assert_eq!(posts[1]["createdAt"], "2024-03-02T09:00:00+11:00");
    assert_eq!(posts[2]["createdAt"], "2024-03-01T09:00:00+11:00");
    assert!(body.get("continuationToken").is_none());
}

#[tokio::test]
async fn limit_two_of_three_pages_with_token() {
    let h = harness(seeded_repo().await);

    let resp = list::handle(&h.state, list_request(&[("limit", "2")])).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = response_json(&resp);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["createdAt"], "2024-03-03T09:00:00+11:00");
    assert_eq!(posts[1]["createdAt"], "2024-03-02T09:00:00+11:00");
    let token = body["continuationToken"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // follow the cursor; the contract stays HTTP 200 even on the last page
    let resp = list::handle(
        &h.state,
        list_request(&[("limit", "2"), ("continuationToken", &token)]),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = response_json(&resp);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["createdAt"], "2024-03-01T09:00:00+11:00");
    assert!(body.get("continuationToken").is_none());
}

#[tokio::test]
async fn build_site_filter_applies() {
    let h = harness(seeded_repo().await);

    let resp = list::handle(&h.state, list_request(&[("buildSite", "site1")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = response_json(&resp);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p["buildSite"] == "site1"));
}

#[tokio::test]
async fn image_urls_derived_from_cdn_base() {
    let h = harness(seeded_repo().await);

    let resp = list::handle(&h.state, empty_request("GET")).await.unwrap();
    let body = response_json(&resp);
    let posts = body["posts"].as_array().unwrap();

    let with_images = &posts[1];
    assert_eq!(
        with_images["imageUrls"],
        serde_json::json!(["https://cdn.test/a.png", "https://cdn.test/b.png"])
    );
    // records without image names never gain the field
    assert!(posts[0].get("imageUrls").is_none());
    assert!(posts[2].get("imageUrls").is_none());
}

#[tokio::test]
async fn image_url_derivation_is_idempotent() {
    let p = post(
        "2024-03-02T09:00:00+11:00",
        "site2",
        Some(vec!["a.png".into()]),
    );
    let once = with_image_urls(p.clone(), "https://cdn.test/");
    let twice = with_image_urls(once.clone(), "https://cdn.test/");
    assert_eq!(once, twice);

    let bare = post("2024-03-01T09:00:00+11:00", "site1", None);
    let derived = with_image_urls(bare.clone(), "https://cdn.test/");
    assert_eq!(bare, derived);
}

#[tokio::test]
async fn bad_limit_is_a_generic_500() {
    let h = harness(seeded_repo().await);

    for bad in ["0", "-3", "lots"] {
        let resp = list::handle(&h.state, list_request(&[("limit", bad)])).await.unwrap();
        assert_eq!(resp.status(), 500, "limit={bad}");
        assert!(response_json(&resp)["message"].is_string());
    }
}
