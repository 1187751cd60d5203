// Shared test doubles; not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use lambda_http::{Body, Request, Response};
use sitelog::cdn::{Cdn, CdnError};
use sitelog::handlers::AppState;
use sitelog::repo::PostRepo;
use sitelog::storage::{ImageStore, ImageStoreError};
use sitelog::Config;

// ---------------- Mock ImageStore (tests only) ----------------
#[derive(Default)]
pub struct MockImageStore {
    /// Image names whose deletion should fail.
    pub fail_deletes: Mutex<HashSet<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub presigned: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ImageStore for MockImageStore {
    async fn upload_url(&self, name: &str) -> Result<String, ImageStoreError> {
        self.presigned.lock().unwrap().push(name.to_string());
        Ok(format!("https://uploads.test/{name}?sig=mock"))
    }

    async fn delete(&self, name: &str) -> Result<(), ImageStoreError> {
        if self.fail_deletes.lock().unwrap().contains(name) {
            return Err(ImageStoreError::Delete {
                name: name.to_string(),
                reason: "mock failure".into(),
            });
        }
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

// ---------------- Mock Cdn (tests only) ----------------
#[derive(Default)]
pub struct MockCdn {
    pub fail: Mutex<bool>,
    pub invalidated: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Cdn for MockCdn {
    async fn invalidate(&self, path: &str) -> Result<(), CdnError> {
        if *self.fail.lock().unwrap() {
            return Err(CdnError::Invalidation {
                path: path.to_string(),
                reason: "mock failure".into(),
            });
        }
        self.invalidated.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        region: "ap-southeast-2".into(),
        table_name: "posts-test".into(),
        bucket_name: "post-images-test".into(),
        cdn_base_url: "https://cdn.test/".into(),
        cdn_distribution_id: "DIST123".into(),
        partition_id: "POSTS".into(),
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub images: Arc<MockImageStore>,
    pub cdn: Arc<MockCdn>,
}

pub fn harness(repo: Arc<dyn PostRepo>) -> TestHarness {
    let images = Arc::new(MockImageStore::default());
    let cdn = Arc::new(MockCdn::default());
    let state = AppState {
        repo,
        images: images.clone(),
        cdn: cdn.clone(),
        config: test_config(),
    };
    TestHarness { state, images, cdn }
}

pub fn json_request(method: &str, body: serde_json::Value) -> Request {
    lambda_http::http::Request::builder()
        .method(method)
        .uri("/posts")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str) -> Request {
    lambda_http::http::Request::builder()
        .method(method)
        .uri("/posts")
        .body(Body::Empty)
        .unwrap()
}

pub fn response_json(resp: &Response<Body>) -> serde_json::Value {
    serde_json::from_slice(resp.body()).unwrap()
}
