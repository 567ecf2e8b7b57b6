use super::*;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{ContractType, FunctionalRequirement, ShardTarget};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct StudioServerState {
    generate_bodies: Arc<Mutex<Vec<Value>>>,
    generate_replies: Arc<Mutex<Vec<Value>>>,
}

async fn handle_generate(
    State(state): State<StudioServerState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.generate_bodies.lock().await.push(body);
    let mut replies = state.generate_replies.lock().await;
    if replies.is_empty() {
        Json(json!({ "error": "no reply scripted" }))
    } else {
        Json(replies.remove(0))
    }
}

async fn handle_account(Path(address): Path<String>) -> Json<Value> {
    Json(json!({ "address": address, "balance": 250 }))
}

async fn handle_create_endpoints(Json(body): Json<Value>) -> Json<Value> {
    let has_names = body["endpoints"]
        .as_array()
        .map(|names| names.iter().any(|name| name.as_str() != Some("")))
        .unwrap_or(false);
    Json(json!({ "success": has_names }))
}

async fn spawn_studio_server(state: StudioServerState) -> Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/generate-rust", post(handle_generate))
        .route("/create-endpoints", post(handle_create_endpoints))
        .route("/accounts/:address", get(handle_account))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}"))?)
}

async fn connect(state: StudioServerState) -> StudioClient {
    let url = spawn_studio_server(state).await.expect("spawn server");
    let mut options = ConnectOptions::new(url.clone(), url);
    options.request_timeout = Duration::from_secs(5);
    StudioClient::connect(options).expect("connect")
}

#[tokio::test]
async fn nft_scenario_yields_success_and_clears_prior_failure() {
    let state = StudioServerState::default();
    state.generate_replies.lock().await.extend([
        json!({ "error": "Error generating Rust code." }),
        json!({ "rustCode": "fn x(){}" }),
    ]);
    let client = connect(state.clone()).await;

    let form = GenerationForm::default()
        .with_description("")
        .with_contract_type(ContractType::Nft)
        .with_shard_target(ShardTarget::Multi)
        .with_requirement(FunctionalRequirement::TokenMinting, true);

    let first = client.generate(&form).await;
    assert!(!first.is_success());
    assert_eq!(client.generator().shown(), Some(first));

    let second = client.generate(&form).await;
    assert_eq!(
        second,
        GenerationResult::Success {
            code: "fn x(){}".into()
        }
    );
    assert_eq!(client.generator().shown(), Some(second));

    let bodies = state.generate_bodies.lock().await;
    assert_eq!(
        bodies[1],
        json!({
            "description": "",
            "contractType": "nft",
            "shardTarget": "multi",
            "functionalRequirements": ["Token minting"],
            "uploadedRustContent": null,
        })
    );
}

#[tokio::test]
async fn ingested_file_travels_as_uploaded_content() {
    let state = StudioServerState::default();
    state
        .generate_replies
        .lock()
        .await
        .push(json!({ "rustCode": "pub trait Ported {}" }));
    let client = connect(state.clone()).await;

    let file = tempfile::NamedTempFile::new().expect("temp file");
    std::fs::write(file.path(), "interface Token {}").expect("write");
    client
        .ingestor()
        .ingest(&SelectedFile::from_path(file.path()))
        .await
        .expect("ingest");

    let form = GenerationForm::default().with_description("convert to MultiversX");
    let result = client.generate(&form).await;
    assert!(result.is_success());

    let bodies = state.generate_bodies.lock().await;
    assert_eq!(bodies[0]["description"], "convert to MultiversX");
    assert_eq!(bodies[0]["uploadedRustContent"], "interface Token {}");
}

#[tokio::test]
async fn balance_binding_queries_account_route() {
    let client = connect(StudioServerState::default()).await;

    let edit = client
        .balance()
        .set_address("erd1qqqq")
        .expect("address changed");
    edit.lookup.expect("lookup spawned").await.expect("lookup task");

    assert_eq!(client.balance().display().text(), "250 EGLD");
}

#[tokio::test]
async fn endpoint_submission_reports_backend_verdict() {
    let client = connect(StudioServerState::default()).await;

    let mut form = ScaffoldForm::new();
    assert_eq!(
        client.submit_endpoints(&form).await,
        EndpointSubmission::Rejected
    );

    form.set_endpoint(0, "stake").expect("edit row");
    assert_eq!(
        client.submit_endpoints(&form).await,
        EndpointSubmission::Accepted
    );
}

#[tokio::test]
async fn missing_backend_degrades_to_display_failures() {
    let client = StudioClient::new();

    assert_eq!(
        client.submit_endpoints(&ScaffoldForm::new()).await,
        EndpointSubmission::Failed
    );
    assert_eq!(
        client.generate(&GenerationForm::default()).await,
        GenerationResult::Failure {
            message: "Error generating Rust code.".into()
        }
    );
    assert_eq!(
        client.storage().refresh_smart_contracts().await,
        RefreshOutcome::Failed {
            reason: "Error refreshing smart contracts.".into()
        }
    );
}
