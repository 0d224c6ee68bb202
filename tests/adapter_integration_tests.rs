//! HTTP adapter tests against wiremock doubles
//!
//! Exercises the degrade-to-nothing contract: adapters must never surface
//! network or protocol failures to the cascade.

mod common;

use common::wiremock_helpers::*;
use sectorfinder::ai::{GeminiClient, SectorModel};
use sectorfinder::registry::{GouvRegistryClient, RegistrySearch};
use sectorfinder::websearch::{DuckDuckGoClient, SnippetSearch};
use serde_json::json;

#[tokio::test]
async fn registry_client_parses_results() {
    let results = json!([
        {
            "nom_complet": "ACME CONSEIL SAS",
            "activite_principale": "62.02A",
            "tranche_effectif_salarie": "21",
            "siren": "123456789",
            "siege": {
                "adresse": "1 rue de la Paix 75002 Paris",
                "libelle_region": "Île-de-France",
                "code_postal": "75002"
            }
        },
        { "nom_complet": "ACME HOLDING" }
    ]);
    let server = mock_registry_server("acme", results).await;

    let client = GouvRegistryClient::with_base_url(format!("{}/search", server.uri()));
    let records = client.search("acme").await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].legal_name, "ACME CONSEIL SAS");
    assert_eq!(records[0].industry_code.as_deref(), Some("62.02A"));
    assert_eq!(records[0].region.as_deref(), Some("Île-de-France"));
    assert_eq!(records[0].siren.as_deref(), Some("123456789"));
    assert_eq!(records[1].legal_name, "ACME HOLDING");
    assert!(records[1].industry_code.is_none());
}

#[tokio::test]
async fn registry_client_treats_error_status_as_no_results() {
    let server = mock_error_server(503).await;
    let client = GouvRegistryClient::with_base_url(format!("{}/search", server.uri()));

    let records = client.search("acme").await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn registry_client_treats_unreachable_host_as_no_results() {
    // Port 1 is never listening
    let client = GouvRegistryClient::with_base_url("http://127.0.0.1:1/search");
    let records = client.search("acme").await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn registry_client_treats_garbage_body_as_no_results() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = GouvRegistryClient::with_base_url(format!("{}/search", server.uri()));
    let records = client.search("acme").await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn search_client_returns_top_snippet() {
    let server = mock_search_server(
        "ACME - Conseil en logiciel",
        "https://acme.example/",
        "ACME accompagne la transformation digitale",
    )
    .await;

    let client = DuckDuckGoClient::with_base_url(server.uri());
    let snippet = client.search_top("acme").await.expect("snippet expected");

    assert_eq!(snippet.title, "ACME - Conseil en logiciel");
    assert_eq!(snippet.url, "https://acme.example/");
    assert!(snippet.body.contains("transformation digitale"));
}

#[tokio::test]
async fn search_client_degrades_on_error_status() {
    let server = mock_error_server(500).await;
    let client = DuckDuckGoClient::with_base_url(server.uri());
    assert!(client.search_top("acme").await.is_none());
}

#[tokio::test]
async fn ai_client_accepts_listed_sector() {
    let server = mock_ai_server(json!({
        "sector": "Tech / Software",
        "confidence": "Haut",
        "reasoning": "éditeur de logiciels"
    }))
    .await;

    let client = GeminiClient::with_url_and_key(format!("{}/generate", server.uri()), "test-key");
    let allowed = vec!["Tech / Software".to_string(), "Retail".to_string()];

    let verdict = client.classify("Doctolib", &allowed).await.expect("verdict expected");
    assert_eq!(verdict.sector, "Tech / Software");
    assert_eq!(verdict.confidence_label, "Haut");
}

#[tokio::test]
async fn ai_client_rejects_unknown_and_off_list() {
    let allowed = vec!["Tech / Software".to_string()];

    let server = mock_ai_server(json!({
        "sector": "Unknown",
        "confidence": "Bas",
        "reasoning": ""
    }))
    .await;
    let client = GeminiClient::with_url_and_key(format!("{}/generate", server.uri()), "test-key");
    assert!(client.classify("nobody", &allowed).await.is_none());

    let server = mock_ai_server(json!({
        "sector": "Basket Weaving",
        "confidence": "Haut",
        "reasoning": "invented"
    }))
    .await;
    let client = GeminiClient::with_url_and_key(format!("{}/generate", server.uri()), "test-key");
    assert!(client.classify("nobody", &allowed).await.is_none());
}

#[tokio::test]
async fn ai_client_degrades_on_malformed_model_answer() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }]
            })),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::with_url_and_key(format!("{}/generate", server.uri()), "test-key");
    let allowed = vec!["Tech / Software".to_string()];
    assert!(client.classify("acme", &allowed).await.is_none());
}
