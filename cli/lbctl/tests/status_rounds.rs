//! Fetch-round behavior against mock stats endpoints.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lbctl::client::{LbClient, NodeEndpoint};
use lbctl::commands::update::fetch_round;
use lbctl::config::Credentials;
use lbctl::error::CliError;
use lbfleet_haproxy::StatsError;

const BACKEND: &str = "pool";

// base64("admin:hunter2")
const BASIC_AUTH: &str = "Basic YWRtaW46aHVudGVyMg==";

fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "hunter2".to_string(),
    }
}

fn feed(rows: &[(&str, &str)], instance_id: &str) -> String {
    let mut feed = String::from("# pxname,svname,status,check_status,iid,type,bck\n");
    for (name, status) in rows {
        feed.push_str(&format!("pool,{name},{status},L7OK,{instance_id},2,0\n"));
    }
    feed
}

async fn mount_feed(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/haproxy-stats;csv"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_round_merges_all_nodes() {
    let lb1 = MockServer::start().await;
    let lb2 = MockServer::start().await;
    mount_feed(&lb1, feed(&[("web1", "UP"), ("web2", "UP")], "3")).await;
    mount_feed(&lb2, feed(&[("web1", "UP"), ("web2", "DRAIN")], "9")).await;

    let endpoints = vec![
        NodeEndpoint::new("lb1", lb1.uri()),
        NodeEndpoint::new("lb2", lb2.uri()),
    ];
    let client = LbClient::new(credentials()).unwrap();

    let matrix = fetch_round(&client, &endpoints, BACKEND).await.unwrap();

    assert_eq!(matrix.nodes(), ["lb1", "lb2"]);
    assert_eq!(matrix.server_names(), ["web1", "web2"]);
    // Divergent per-node states stay distinct.
    assert_eq!(matrix.record("web2", "lb1").unwrap().status, "UP");
    assert_eq!(matrix.record("web2", "lb2").unwrap().status, "DRAIN");
    // Each node's backend instance id is captured separately.
    assert_eq!(matrix.instance_id("lb1"), Some("3"));
    assert_eq!(matrix.instance_id("lb2"), Some("9"));
}

#[tokio::test]
async fn unauthenticated_request_never_matches() {
    let lb1 = MockServer::start().await;
    mount_feed(&lb1, feed(&[("web1", "UP")], "3")).await;

    let endpoints = vec![NodeEndpoint::new("lb1", lb1.uri())];
    let client = LbClient::new(Credentials {
        username: "admin".to_string(),
        password: "wrong".to_string(),
    })
    .unwrap();

    // The mock requires the right Authorization header, so the request
    // falls through to the mock server's 404.
    let err = fetch_round(&client, &endpoints, BACKEND).await.unwrap_err();
    assert!(matches!(err, CliError::NodeStatus { .. }));
}

#[tokio::test]
async fn one_failing_node_fails_the_whole_round() {
    let lb1 = MockServer::start().await;
    let lb2 = MockServer::start().await;
    mount_feed(&lb1, feed(&[("web1", "UP")], "3")).await;
    Mock::given(method("GET"))
        .and(path("/haproxy-stats;csv"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&lb2)
        .await;

    let endpoints = vec![
        NodeEndpoint::new("lb1", lb1.uri()),
        NodeEndpoint::new("lb2", lb2.uri()),
    ];
    let client = LbClient::new(credentials()).unwrap();

    let err = fetch_round(&client, &endpoints, BACKEND).await.unwrap_err();
    match err {
        CliError::NodeStatus { node, status } => {
            assert_eq!(node, "lb2");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn feed_with_conflicting_instance_ids_is_a_fetch_error() {
    let lb1 = MockServer::start().await;
    let body = "\
# pxname,svname,status,check_status,iid,type,bck
pool,web1,UP,L7OK,3,2,0
pool,web2,UP,L7OK,4,2,0
";
    mount_feed(&lb1, body.to_string()).await;

    let endpoints = vec![NodeEndpoint::new("lb1", lb1.uri())];
    let client = LbClient::new(credentials()).unwrap();

    let err = fetch_round(&client, &endpoints, BACKEND).await.unwrap_err();
    match err {
        CliError::Feed { node, source } => {
            assert_eq!(node, "lb1");
            assert!(matches!(source, StatsError::InconsistentInstanceId { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_feed_is_a_fetch_error() {
    let lb1 = MockServer::start().await;
    mount_feed(&lb1, "# pxname,svname,status\n".to_string()).await;

    let endpoints = vec![NodeEndpoint::new("lb1", lb1.uri())];
    let client = LbClient::new(credentials()).unwrap();

    let err = fetch_round(&client, &endpoints, BACKEND).await.unwrap_err();
    assert!(matches!(
        err,
        CliError::Feed {
            source: StatsError::MissingColumn(_),
            ..
        }
    ));
}
