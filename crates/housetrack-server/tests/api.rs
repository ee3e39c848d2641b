use std::net::SocketAddr;
use std::path::Path;

use housetrack_core::auth::Session;
use housetrack_core::{DataStore, SchemeApi};
use housetrack_server::{app, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

struct TestServer {
    addr: SocketAddr,
    client: Client,
    // Holds the seed files and session file for the life of the test
    dir: TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/session/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request")
            .json()
            .await
            .expect("login body");
        body["token"].as_str().expect("token").to_string()
    }
}

fn seed_houses() -> Value {
    json!({
        "beneficiaries": [
            {
                "id": 1,
                "beneficiaryName": "Ramesh Kumar",
                "constituency": "Barabanki",
                "village": "Dewa",
                "stage": "Foundation",
                "progress": 20,
                "lastUpdated": "2024-03-10",
                "assignedOfficer": "Anil Verma",
                "fundDetails": {
                    "allocated": "Rs. 1,20,000",
                    "released": "Rs. 60,000",
                    "utilized": "Rs. 45,000",
                    "remaining": "Rs. 75,000"
                }
            },
            {
                "id": 2,
                "beneficiaryName": "Sunita Devi",
                "constituency": "Barabanki",
                "village": "Fatehpur",
                "stage": "Completed",
                "progress": 100,
                "lastUpdated": "2024-02-02",
                "assignedOfficer": "Anil Verma",
                "fundDetails": {
                    "allocated": "Rs. 1,20,000",
                    "released": "Rs. 1,20,000",
                    "utilized": "Rs. 1,20,000",
                    "remaining": "Rs. 0"
                }
            },
            {
                "id": 3,
                "beneficiaryName": "Mohan Lal",
                "constituency": "Sitapur",
                "village": "Biswan",
                "stage": "Walls",
                "progress": 45,
                "lastUpdated": "2024-03-21",
                "assignedOfficer": "Priya Singh"
            }
        ]
    })
}

fn seed_officers() -> Value {
    json!([
        {
            "id": 1,
            "name": "Anil Verma",
            "designation": "Block Development Officer",
            "constituency": "Barabanki",
            "contactNumber": "9876543210",
            "email": "anil.verma@example.gov.in",
            "assignedHouses": [1, 2]
        },
        {
            "id": 2,
            "name": "Priya Singh",
            "designation": "Junior Engineer",
            "constituency": "Sitapur",
            "contactNumber": "9123456780",
            "email": "priya.singh@example.gov.in",
            "assignedHouses": [3]
        }
    ])
}

fn write_seed(dir: &Path) {
    std::fs::write(
        dir.join("beneficiaries.json"),
        serde_json::to_string_pretty(&seed_houses()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("officers.json"),
        serde_json::to_string_pretty(&seed_officers()).unwrap(),
    )
    .unwrap();
}

async fn spawn_server() -> TestServer {
    let dir = tempdir().unwrap();
    write_seed(dir.path());

    let store = DataStore::load(dir.path()).unwrap();
    let api = SchemeApi::immediate(store);
    let session = Session::new(dir.path().join("session"));
    let state = AppState::new(api, session, dir.path().to_path_buf());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    TestServer {
        addr,
        client: Client::new(),
        dir,
    }
}

#[tokio::test]
async fn houses_endpoint_serves_file_verbatim() {
    let server = spawn_server().await;

    let resp = server.client.get(server.url("/api/houses")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, seed_houses());

    std::fs::remove_file(server.dir.path().join("beneficiaries.json")).unwrap();
    let resp = server.client.get(server.url("/api/houses")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to load beneficiary data" }));

    // In-memory data is unaffected by the file going away
    let resp = server
        .client
        .get(server.url("/api/beneficiaries"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_and_filter_beneficiaries() {
    let server = spawn_server().await;

    let all: Vec<Value> = server
        .client
        .get(server.url("/api/beneficiaries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["fundDetails"]["remaining"], "Rs. 75,000");

    let filtered: Vec<Value> = server
        .client
        .get(server.url("/api/beneficiaries?constituency=Barabanki&hidden=Completed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], 1);

    let searched: Vec<Value> = server
        .client
        .get(server.url("/api/beneficiaries?search=biswan"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0]["beneficiaryName"], "Mohan Lal");

    let resp = server
        .client
        .get(server.url("/api/beneficiaries/99"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn writes_require_a_session_token() {
    let server = spawn_server().await;
    let new_house = json!({ "beneficiaryName": "Kamla Devi", "constituency": "Sitapur" });

    let resp = server
        .client
        .post(server.url("/api/beneficiaries"))
        .json(&new_house)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .post(server.url("/api/beneficiaries"))
        .bearer_auth("not-a-token")
        .json(&new_house)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let officer = server.login("officer", "officer123").await;
    let resp = server
        .client
        .post(server.url("/api/beneficiaries"))
        .bearer_auth(&officer)
        .json(&new_house)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = server
        .client
        .delete(server.url("/api/beneficiaries/1"))
        .bearer_auth(&officer)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_create_update_delete() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin123").await;

    let resp = server
        .client
        .post(server.url("/api/beneficiaries"))
        .bearer_auth(&admin)
        .json(&json!({
            "beneficiaryName": "Kamla Devi",
            "constituency": "Sitapur",
            "fundDetails": { "allocated": "Rs. 1,20,000", "utilized": "Rs. 0" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 4);
    assert_eq!(created["stage"], "Not Started");

    let resp = server
        .client
        .put(server.url("/api/beneficiaries/4"))
        .bearer_auth(&admin)
        .json(&json!({
            "village": "Laharpur",
            "fundDetails": { "utilized": "Rs. 30,000" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["village"], "Laharpur");
    assert_eq!(updated["fundDetails"]["allocated"], "Rs. 1,20,000");
    assert_eq!(updated["fundDetails"]["remaining"], "Rs. 90,000");

    let fetched: Value = server
        .client
        .get(server.url("/api/beneficiaries/4"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, updated);

    let resp = server
        .client
        .delete(server.url("/api/beneficiaries/4"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server
        .client
        .get(server.url("/api/beneficiaries/4"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server
        .client
        .delete(server.url("/api/beneficiaries/4"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn officer_progress_update_moves_stage() {
    let server = spawn_server().await;
    let officer = server.login("officer", "officer123").await;

    let updated: Value = server
        .client
        .put(server.url("/api/beneficiaries/3/progress"))
        .bearer_auth(&officer)
        .json(&json!({ "progress": 100 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["progress"], 100);
    assert_eq!(updated["stage"], "Completed");

    let resp = server
        .client
        .put(server.url("/api/beneficiaries/3/progress"))
        .bearer_auth(&officer)
        .json(&json!({ "progress": 150 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin123").await;

    let responses = vec![
        server
            .client
            .put(server.url("/api/beneficiaries/1/progress"))
            .bearer_auth(&admin)
            .json(&json!({ "progress": 300 }))
            .send()
            .await
            .unwrap(),
        server
            .client
            .get(server.url("/api/beneficiaries/abc"))
            .send()
            .await
            .unwrap(),
        server
            .client
            .get(server.url("/api/beneficiaries?minProgress=lots"))
            .send()
            .await
            .unwrap(),
        server
            .client
            .post(server.url("/api/beneficiaries"))
            .bearer_auth(&admin)
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap(),
    ];

    for resp in responses {
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn officer_routes() {
    let server = spawn_server().await;

    let officers: Vec<Value> = server
        .client
        .get(server.url("/api/officers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(officers.len(), 2);

    let houses: Vec<Value> = server
        .client
        .get(server.url("/api/officers/1/beneficiaries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = houses.iter().filter_map(|h| h["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);

    let resp = server
        .client
        .get(server.url("/api/officers/9/beneficiaries"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn image_upload_round_trip() {
    let server = spawn_server().await;
    let officer = server.login("officer", "officer123").await;
    let data_url = "data:image/png;base64,iVBORw0KGgo=";

    let resp = server
        .client
        .post(server.url("/api/images"))
        .bearer_auth(&officer)
        .json(&json!({ "dataUrl": data_url }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/api/images/img_"));

    let image: Value = server
        .client
        .get(server.url(&url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(image["dataUrl"], data_url);

    let resp = server
        .client
        .post(server.url("/api/images"))
        .bearer_auth(&officer)
        .json(&json!({ "dataUrl": "https://example.com/a.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .get(server.url("/api/images/img_missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_lifecycle() {
    let server = spawn_server().await;

    let resp = server
        .client
        .post(server.url("/api/session/login"))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = server.login("Admin", "admin123").await;
    assert!(token.starts_with("dummy-jwt-token-admin-"));
    assert!(server.dir.path().join("session").join("session.json").exists());

    let status: Value = server
        .client
        .get(server.url("/api/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["role"], "admin");

    let resp = server
        .client
        .post(server.url("/api/session/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The old token no longer authorizes writes
    let resp = server
        .client
        .delete(server.url("/api/beneficiaries/1"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reports() {
    let server = spawn_server().await;

    let summary: Value = server
        .client
        .get(server.url("/api/reports/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["totalHouses"], 3);
    assert_eq!(summary["completedHouses"], 1);

    let stages: Vec<Value> = server
        .client
        .get(server.url("/api/reports/stages?constituency=Barabanki"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let total: i64 = stages.iter().filter_map(|s| s["count"].as_i64()).sum();
    assert_eq!(total, 2);

    let constituencies: Vec<String> = server
        .client
        .get(server.url("/api/reports/constituencies"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(constituencies, vec!["Barabanki", "Sitapur"]);

    let report: Value = server
        .client
        .get(server.url("/api/reports/constituency?name=Barabanki"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["totalHouses"], 2);
    assert_eq!(report["villages"].as_array().unwrap().len(), 2);

    let monthly: Value = server
        .client
        .get(server.url("/api/reports/monthly?month=3&year=2024"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(monthly["houseIds"], json!([1, 3]));

    let months: Vec<String> = server
        .client
        .get(server.url("/api/reports/months"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(months.len(), 12);

    let resp = server
        .client
        .get(server.url("/api/reports/monthly?month=13&year=2024"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let financial: Value = server
        .client
        .get(server.url("/api/reports/financial?period=last-year"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(financial["period"], "Last Year");

    let utilization: Vec<Value> = server
        .client
        .get(server.url("/api/reports/fund-utilization"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(utilization[0]["constituency"], "Barabanki");
    assert_eq!(utilization[0]["total"], 165000);
}

#[tokio::test]
async fn concurrent_reads_agree() {
    let server = spawn_server().await;

    let requests = (0..8).map(|_| {
        let client = server.client.clone();
        let url = server.url("/api/beneficiaries");
        async move {
            client
                .get(url)
                .send()
                .await
                .unwrap()
                .json::<Vec<Value>>()
                .await
                .unwrap()
        }
    });
    let results = futures::future::join_all(requests).await;
    assert!(results.iter().all(|r| r == &results[0]));
}
