//! Citation service tests: references, user style preferences and caching.

use std::fs;

use serde_json::json;
use uuid::Uuid;

use cite_server::config::Config;
use cite_server::error::CitationError;
use cite_server::models::{
    FormatRequest, OutputKind, Reference, ReferenceDraft, User, VerifiedIdentity,
};
use cite_server::service::CitationService;

const STYLES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/styles");

fn service() -> CitationService {
    CitationService::new(&Config::new(STYLES_DIR, None))
}

fn draft(style: &str) -> ReferenceDraft {
    serde_json::from_value(json!({
        "citationData": {
            "type": "book",
            "title": "Structure and Interpretation of Computer Programs",
            "author": [{"family": "Abelson", "given": "Harold"}, {"family": "Sussman", "given": "Gerald Jay"}],
            "issued": {"date-parts": [[1985]]},
            "publisher": "MIT Press"
        },
        "formattingStyle": style
    }))
    .unwrap()
}

fn user() -> User {
    User::from_identity(
        VerifiedIdentity {
            id: "google-oauth2|1234".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            picture: None,
        },
        None,
    )
}

#[tokio::test]
async fn test_format_request() {
    let request: FormatRequest = serde_json::from_value(json!({
        "metadata": {"title": "On Computable Numbers", "author": "Turing,Alan", "year": 1936},
        "style": "apa",
        "output": "text"
    }))
    .unwrap();

    let formatted = service().format(request).await.unwrap();
    assert_eq!(formatted.output, OutputKind::Text);
    assert!(formatted.text.contains("1936"), "{}", formatted.text);
    assert!(formatted.to_json().get("citationText").is_some());
}

#[tokio::test]
async fn test_format_reference_uses_its_style() {
    let svc = service();
    let owner = Uuid::new_v4();
    let reference = Reference::new(owner, draft("mla"));

    let text = svc.format_reference(&reference, OutputKind::Text).await.unwrap();
    assert!(text.contains("Abelson"), "{text}");

    let expected = svc
        .format_item(&reference.citation_data, "mla", OutputKind::Text)
        .await
        .unwrap();
    assert_eq!(text, expected);
}

#[tokio::test]
async fn test_format_reference_with_removed_style() {
    let reference = Reference::new(Uuid::new_v4(), draft("harvard"));
    let err = service().format_reference(&reference, OutputKind::Html).await.unwrap_err();
    assert!(matches!(err, CitationError::StyleNotFound { .. }));
}

#[tokio::test]
async fn test_styles_for_user() {
    let svc = service();
    let mut user = user();

    let offered: Vec<String> = svc.styles_for(&user).await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(offered, vec!["apa"]);

    // Preferences for styles missing from the catalog are skipped.
    user.preferred_styles.insert("chicago");
    user.preferred_styles.insert("ieee");
    user.preferred_styles.remove("apa");
    let offered: Vec<String> = svc.styles_for(&user).await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(offered, vec!["ieee"]);
}

#[tokio::test]
async fn test_reload_picks_up_new_styles() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(format!("{STYLES_DIR}/apa.csl"), dir.path().join("apa.csl")).unwrap();

    let svc = CitationService::new(&Config::for_testing(dir.path()));
    assert_eq!(svc.list_styles().await.unwrap().len(), 1);

    fs::copy(format!("{STYLES_DIR}/mla.csl"), dir.path().join("mla.csl")).unwrap();
    assert_eq!(svc.list_styles().await.unwrap().len(), 1);

    assert_eq!(svc.reload().await.unwrap(), 2);
    let ids: Vec<String> = svc.list_styles().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["apa", "mla"]);
}

#[tokio::test]
async fn test_cached_citation_dropped_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(format!("{STYLES_DIR}/apa.csl"), dir.path().join("house.csl")).unwrap();

    let svc = CitationService::new(&Config::new(dir.path(), None));
    let reference = Reference::new(Uuid::new_v4(), draft("house"));

    let apa = svc.format_reference(&reference, OutputKind::Text).await.unwrap();
    assert_eq!(svc.format_reference(&reference, OutputKind::Text).await.unwrap(), apa);

    fs::copy(format!("{STYLES_DIR}/ieee.csl"), dir.path().join("house.csl")).unwrap();
    assert_eq!(svc.format_reference(&reference, OutputKind::Text).await.unwrap(), apa);

    svc.reload().await.unwrap();
    let ieee = svc.format_reference(&reference, OutputKind::Text).await.unwrap();
    assert_ne!(ieee, apa);
    assert!(ieee.starts_with("[1]"), "{ieee}");
}
