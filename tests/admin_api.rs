//! Integration tests for the admin API: reload, healthcheck, stats.

use std::net::SocketAddr;
use std::sync::Arc;

use sha1::{Digest, Sha1};
use signpost::admin::StatsResponse;
use signpost::server::{self, AppState};
use signpost::store::model::{RouteRecord, RouteSet, RouteType};
use signpost::store::sources::memory::MemorySource;
use signpost::store::SourceResolver;

struct TestInstance {
    admin: SocketAddr,
    router: SocketAddr,
    source: Arc<MemorySource>,
    _shutdown: tokio::sync::watch::Sender<bool>,
}

async fn serve(router: axum::Router, mut shutdown: tokio::sync::watch::Receiver<bool>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .unwrap();
    });
    addr
}

async fn start_instance(routes: Vec<RouteRecord>) -> TestInstance {
    let source = Arc::new(MemorySource::new(RouteSet::new(routes)));
    let state = Arc::new(AppState::new(SourceResolver::new(
        Box::new(source.clone()),
        None,
    )));
    state.reload().await.unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let router = serve(server::build_router(state.clone()), shutdown_rx.clone()).await;
    let admin = serve(server::build_admin_router(state), shutdown_rx).await;

    TestInstance {
        admin,
        router,
        source,
        _shutdown: shutdown_tx,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn admin_request(instance: &TestInstance, method: reqwest::Method, path: &str) -> reqwest::Response {
    client()
        .request(method, format!("http://{}{path}", instance.admin))
        .send()
        .await
        .unwrap()
}

async fn fetch_stats(instance: &TestInstance) -> StatsResponse {
    let resp = admin_request(instance, reqwest::Method::GET, "/stats").await;
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

fn sha1_hex(parts: &[&str]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

// -- reload --

#[tokio::test]
async fn post_reload_returns_reset_content() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::POST, "/reload").await;
    assert_eq!(resp.status(), 205);
}

#[tokio::test]
async fn unknown_admin_paths_return_not_found() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::POST, "/foo").await;
    assert_eq!(resp.status(), 404);
    let resp = admin_request(&instance, reqwest::Method::POST, "/reload/foo").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn get_reload_is_method_not_allowed() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::GET, "/reload").await;
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.headers().get("allow").unwrap(), "POST");
}

#[tokio::test]
async fn reload_publishes_new_routes() {
    let instance = start_instance(Vec::new()).await;
    let url = format!("http://{}/foo", instance.router);
    assert_eq!(client().get(&url).send().await.unwrap().status(), 404);

    instance
        .source
        .replace(RouteSet::new(vec![RouteRecord::redirect(
            "/foo",
            RouteType::Exact,
            "/bar",
        )]))
        .await;

    // Not visible until reloaded
    assert_eq!(client().get(&url).send().await.unwrap().status(), 404);

    let resp = admin_request(&instance, reqwest::Method::POST, "/reload").await;
    assert_eq!(resp.status(), 205);

    let resp = client().get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 301);
    assert_eq!(resp.headers().get("location").unwrap(), "/bar");
}

#[tokio::test]
async fn failed_reload_keeps_previous_table() {
    let instance = start_instance(vec![RouteRecord::redirect(
        "/foo",
        RouteType::Exact,
        "/bar",
    )])
    .await;
    let before = fetch_stats(&instance).await;

    instance.source.set_available(false);
    let resp = admin_request(&instance, reqwest::Method::POST, "/reload").await;
    assert_eq!(resp.status(), 500);
    assert!(resp.text().await.unwrap().contains("reload failed"));

    let after = fetch_stats(&instance).await;
    assert_eq!(after.routes, before.routes);
    assert_eq!(after.reloads.state, "failed");
    assert_eq!(after.reloads.failed, 1);

    let resp = client()
        .get(format!("http://{}/foo", instance.router))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 301);
}

#[tokio::test]
async fn invalid_snapshot_is_rejected_whole() {
    let instance = start_instance(vec![RouteRecord::redirect(
        "/foo",
        RouteType::Exact,
        "/bar",
    )])
    .await;

    instance
        .source
        .replace(RouteSet::new(vec![
            RouteRecord::redirect("/good", RouteType::Exact, "/fine"),
            RouteRecord::redirect("no-slash", RouteType::Exact, "/x"),
        ]))
        .await;

    let resp = admin_request(&instance, reqwest::Method::POST, "/reload").await;
    assert_eq!(resp.status(), 500);

    let stats = fetch_stats(&instance).await;
    assert_eq!(stats.routes.count, 1);
    let resp = client()
        .get(format!("http://{}/good", instance.router))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

// -- healthcheck --

#[tokio::test]
async fn healthcheck_returns_ok() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::GET, "/healthcheck").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn healthcheck_rejects_other_verbs() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::POST, "/healthcheck").await;
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.headers().get("allow").unwrap(), "GET");
}

#[tokio::test]
async fn healthcheck_ok_even_when_store_is_down() {
    let instance = start_instance(Vec::new()).await;
    instance.source.set_available(false);
    let resp = admin_request(&instance, reqwest::Method::GET, "/healthcheck").await;
    assert_eq!(resp.status(), 200);
}

// -- stats --

#[tokio::test]
async fn stats_reports_count_and_checksum() {
    let instance = start_instance(vec![
        RouteRecord::redirect("/foo", RouteType::Prefix, "/bar"),
        RouteRecord::redirect("/baz", RouteType::Prefix, "/qux"),
        RouteRecord::redirect("/foo", RouteType::Exact, "/bar/baz"),
    ])
    .await;

    let stats = fetch_stats(&instance).await;
    assert_eq!(stats.routes.count, 3);
    assert_eq!(
        stats.routes.checksum,
        sha1_hex(&["/baz(true)", "/foo(false)", "/foo(true)"])
    );
}

#[tokio::test]
async fn stats_with_no_routes_is_empty_digest() {
    let instance = start_instance(Vec::new()).await;
    let stats = fetch_stats(&instance).await;
    assert_eq!(stats.routes.count, 0);
    assert_eq!(stats.routes.checksum, sha1_hex(&[]));
    assert_eq!(
        stats.routes.checksum,
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
}

#[tokio::test]
async fn stats_routes_object_has_exact_shape() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::GET, "/stats").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let routes = body["routes"].as_object().unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes["count"].is_u64());
    assert!(routes["checksum"].is_string());
}

#[tokio::test]
async fn stats_rejects_other_verbs() {
    let instance = start_instance(Vec::new()).await;
    let resp = admin_request(&instance, reqwest::Method::POST, "/stats").await;
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.headers().get("allow").unwrap(), "GET");
}

#[tokio::test]
async fn stats_counts_requests() {
    let instance = start_instance(vec![RouteRecord::redirect(
        "/foo",
        RouteType::Exact,
        "/bar",
    )])
    .await;
    let c = client();
    c.get(format!("http://{}/foo", instance.router)).send().await.unwrap();
    c.get(format!("http://{}/nope", instance.router)).send().await.unwrap();

    let stats = fetch_stats(&instance).await;
    assert_eq!(stats.requests.redirects, 1);
    assert_eq!(stats.requests.not_found, 1);
    assert_eq!(stats.reloads.source, "memory");
    assert_eq!(stats.reloads.state, "idle");
}
