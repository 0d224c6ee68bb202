//! Deterministic fakes for the cascade's external collaborators

use async_trait::async_trait;
use sectorfinder::ai::{AiVerdict, SectorModel};
use sectorfinder::cascade::{Cascade, ResolverState};
use sectorfinder::corrections::{CorrectionStore, CustomSectorStore};
use sectorfinder::normalizer::InputNormalizer;
use sectorfinder::registry::{RegistryRecord, RegistrySearch};
use sectorfinder::websearch::{Snippet, SnippetSearch};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Registry fake returning canned records and counting calls
pub struct FakeRegistry {
    pub records: Vec<RegistryRecord>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeRegistry {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_records(records: Vec<RegistryRecord>) -> Self {
        Self {
            records,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RegistrySearch for FakeRegistry {
    async fn search(&self, _query: &str) -> Vec<RegistryRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.clone()
    }
}

/// Registry fake that panics, exercising the crash boundary
pub struct PanickingRegistry;

#[async_trait]
impl RegistrySearch for PanickingRegistry {
    async fn search(&self, _query: &str) -> Vec<RegistryRecord> {
        panic!("registry adapter blew up");
    }
}

/// Web search fake returning a canned snippet
pub struct FakeWeb {
    pub snippet: Option<Snippet>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeWeb {
    pub fn empty() -> Self {
        Self {
            snippet: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_snippet(snippet: Snippet) -> Self {
        Self {
            snippet: Some(snippet),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SnippetSearch for FakeWeb {
    async fn search_top(&self, _query: &str) -> Option<Snippet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snippet.clone()
    }
}

/// AI fake returning a canned verdict, recording the vocabulary it was given
pub struct FakeModel {
    pub verdict: Option<AiVerdict>,
    pub calls: Arc<AtomicUsize>,
    pub seen_allowed: Arc<std::sync::Mutex<Vec<String>>>,
}

impl FakeModel {
    pub fn unavailable() -> Self {
        Self {
            verdict: None,
            calls: Arc::new(AtomicUsize::new(0)),
            seen_allowed: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn with_verdict(verdict: AiVerdict) -> Self {
        Self {
            verdict: Some(verdict),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_allowed: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SectorModel for FakeModel {
    async fn classify(&self, _name: &str, allowed: &[String]) -> Option<AiVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen_allowed.lock() {
            *seen = allowed.to_vec();
        }
        // Only return the verdict when it survives the closed-vocabulary rule
        self.verdict
            .clone()
            .filter(|v| allowed.iter().any(|s| *s == v.sector))
    }
}

/// Fresh resolver state backed by a temp directory
pub fn state_in(dir: &Path) -> ResolverState {
    ResolverState {
        corrections: CorrectionStore::load(&dir.join("corrections.json")).unwrap(),
        custom_sectors: CustomSectorStore::load(&dir.join("custom_sectors.json")).unwrap(),
    }
}

/// Cascade wired to the given fakes with default normalization
pub fn cascade_with(
    registry: Box<dyn RegistrySearch>,
    web: Box<dyn SnippetSearch>,
    model: Box<dyn SectorModel>,
    state: ResolverState,
) -> Cascade {
    Cascade::new(
        InputNormalizer::with_extra_domains(&["wanadoo".to_string(), "laposte".to_string()]),
        registry,
        web,
        model,
        state,
    )
}

/// A registry record with just a name and NAF code
pub fn registry_record(name: &str, code: Option<&str>) -> RegistryRecord {
    RegistryRecord {
        legal_name: name.to_string(),
        industry_code: code.map(|c| c.to_string()),
        ..Default::default()
    }
}
