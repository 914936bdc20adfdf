use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::fallback::fallback_knowledge;
use super::service::KnowledgeService;
use super::types::{
    KnowledgeBase, KnowledgeDocument, KnowledgeError, KnowledgeSource, KnowledgeStatus,
    KnowledgeTopic,
};
use crate::app::KnowledgeSettings;
use crate::cache::string_hash;

/// Title keywords that route a best-practices document to a family.
/// Checked top-down; anything unmatched goes to `generic`.
const TITLE_ROUTES: &[(&str, &[&str])] = &[
    ("button", &["button"]),
    ("avatar", &["avatar"]),
    ("input", &["input", "field"]),
    ("card", &["card"]),
    ("badge", &["badge", "tag"]),
];

enum LoadState {
    Unloaded,
    Loaded {
        base: Arc<KnowledgeBase>,
        source: KnowledgeSource,
    },
}

/// Acquires grounding knowledge once per session.
///
/// `Unloaded -> Probing -> {LoadedRemote | LoadedFallback}`. Both loaded
/// states are terminal until [`KnowledgeProvider::reload`] is called.
/// Callers that arrive while a load is in progress wait for it instead of
/// probing again.
pub struct KnowledgeProvider {
    service: Option<Arc<dyn KnowledgeService>>,
    probe_timeout: Duration,
    query_timeout: Duration,
    results_per_topic: usize,
    state: Mutex<LoadState>,
}

impl KnowledgeProvider {
    pub fn new(service: Arc<dyn KnowledgeService>, settings: &KnowledgeSettings) -> Self {
        Self {
            service: Some(service),
            probe_timeout: settings.probe_timeout(),
            query_timeout: settings.query_timeout(),
            results_per_topic: settings.results_per_topic,
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// A provider that never touches the network
    pub fn offline() -> Self {
        let settings = KnowledgeSettings::default();
        Self {
            service: None,
            probe_timeout: settings.probe_timeout(),
            query_timeout: settings.query_timeout(),
            results_per_topic: settings.results_per_topic,
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    pub fn status(&self) -> KnowledgeStatus {
        match self.state.try_lock() {
            Err(_) => KnowledgeStatus::Probing,
            Ok(state) => match &*state {
                LoadState::Unloaded => KnowledgeStatus::Unloaded,
                LoadState::Loaded {
                    source: KnowledgeSource::Remote,
                    ..
                } => KnowledgeStatus::LoadedRemote,
                LoadState::Loaded {
                    source: KnowledgeSource::Fallback,
                    ..
                } => KnowledgeStatus::LoadedFallback,
            },
        }
    }

    /// The session's knowledge base, loading it on first use
    pub async fn knowledge(&self) -> Arc<KnowledgeBase> {
        let mut state = self.state.lock().await;
        if let LoadState::Loaded { base, .. } = &*state {
            return Arc::clone(base);
        }

        let (base, source) = self.load().await;
        info!(version = %base.version, ?source, "knowledge base loaded");
        *state = LoadState::Loaded {
            base: Arc::clone(&base),
            source,
        };
        base
    }

    /// Forget the memoized knowledge and load it again
    pub async fn reload(&self) -> Arc<KnowledgeBase> {
        {
            let mut state = self.state.lock().await;
            *state = LoadState::Unloaded;
        }
        self.knowledge().await
    }

    async fn load(&self) -> (Arc<KnowledgeBase>, KnowledgeSource) {
        let fallback = || (Arc::new(fallback_knowledge()), KnowledgeSource::Fallback);

        let Some(service) = &self.service else {
            debug!("knowledge service disabled; using built-in knowledge");
            return fallback();
        };

        if let Err(e) = self.probe(service.as_ref()).await {
            warn!("knowledge probe failed, using built-in knowledge: {}", e);
            return fallback();
        }

        let results = self.fetch_topics(service.as_ref()).await;
        if results.is_empty() {
            warn!("every knowledge topic query failed, using built-in knowledge");
            return fallback();
        }

        (Arc::new(merge_topics(&results)), KnowledgeSource::Remote)
    }

    async fn probe(&self, service: &dyn KnowledgeService) -> Result<(), KnowledgeError> {
        match timeout(self.probe_timeout, service.probe()).await {
            Ok(result) => result,
            Err(_) => Err(KnowledgeError::Timeout(self.probe_timeout.as_millis() as u64)),
        }
    }

    /// Concurrent fan-out with independent timeouts; failed topics are
    /// skipped.
    async fn fetch_topics(
        &self,
        service: &dyn KnowledgeService,
    ) -> Vec<(KnowledgeTopic, Vec<KnowledgeDocument>)> {
        let queries = KnowledgeTopic::ALL.into_iter().map(|topic| async move {
            let outcome = timeout(
                self.query_timeout,
                service.query(topic.query(), self.results_per_topic, topic.category()),
            )
            .await;
            (topic, outcome)
        });

        join_all(queries)
            .await
            .into_iter()
            .filter_map(|(topic, outcome)| match outcome {
                Ok(Ok(documents)) if documents.is_empty() => {
                    debug!(topic = topic.category(), "knowledge query returned nothing");
                    None
                }
                Ok(Ok(documents)) => Some((topic, documents)),
                Ok(Err(e)) => {
                    warn!(topic = topic.category(), "knowledge query failed: {}", e);
                    None
                }
                Err(_) => {
                    warn!(topic = topic.category(), "knowledge query timed out");
                    None
                }
            })
            .collect()
    }
}

/// Which family a best-practices document belongs to
pub fn route_title(title: &str) -> &'static str {
    let title = title.to_lowercase();
    TITLE_ROUTES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_word(&title, k)))
        .map(|(family, _)| *family)
        .unwrap_or("generic")
}

/// Whole-word match, allowing a plural "s"
fn has_word(text: &str, keyword: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word == keyword || word.strip_suffix('s') == Some(keyword))
}

/// Overlay remote topic results on the built-in knowledge. Topics that did
/// not come back keep their built-in text.
fn merge_topics(results: &[(KnowledgeTopic, Vec<KnowledgeDocument>)]) -> KnowledgeBase {
    let mut base = fallback_knowledge();
    let mut replaced_families = Vec::new();

    for (topic, documents) in results {
        if documents.is_empty() {
            continue;
        }
        match topic {
            KnowledgeTopic::ComponentBestPractices => {
                for doc in documents {
                    let family = route_title(&doc.title);
                    let entry = base
                        .per_family_guidance
                        .entry(family.to_string())
                        .or_default();
                    // First remote document replaces the built-in text
                    if !replaced_families.contains(&family) {
                        replaced_families.push(family);
                        entry.clear();
                    } else {
                        entry.push_str("\n\n");
                    }
                    entry.push_str(doc.content.trim());
                }
            }
            KnowledgeTopic::TokenConventions => base.token_guidance = join_documents(documents),
            KnowledgeTopic::Accessibility => base.accessibility_guidance = join_documents(documents),
            KnowledgeTopic::Scoring => base.scoring_guidance = join_documents(documents),
        }
    }

    // Content-derived so identical remote knowledge yields the same version
    let digest_input = format!(
        "{:?}|{}|{}|{}",
        base.per_family_guidance, base.token_guidance, base.accessibility_guidance, base.scoring_guidance
    );
    base.version = format!("remote-{}", string_hash(&digest_input));
    base.last_updated = Utc::now();
    base
}

fn join_documents(documents: &[KnowledgeDocument]) -> String {
    documents
        .iter()
        .map(|d| format!("{}: {}", d.title.trim(), d.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scriptable stand-in for the knowledge service
    #[derive(Default)]
    struct FakeService {
        probe_fails: bool,
        probe_delay: Option<Duration>,
        failing_categories: Vec<&'static str>,
        empty_categories: Vec<&'static str>,
        slow_categories: Vec<&'static str>,
        probes: AtomicUsize,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl KnowledgeService for FakeService {
        async fn probe(&self) -> Result<(), KnowledgeError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.probe_delay {
                tokio::time::sleep(delay).await;
            }
            if self.probe_fails {
                Err(KnowledgeError::Unreachable("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn query(
            &self,
            _text: &str,
            _limit: usize,
            category: &str,
        ) -> Result<Vec<KnowledgeDocument>, KnowledgeError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.slow_categories.contains(&category) {
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            if self.failing_categories.contains(&category) {
                return Err(KnowledgeError::Status { status: 500 });
            }
            if self.empty_categories.contains(&category) {
                return Ok(Vec::new());
            }
            let docs = match category {
                "components" => vec![
                    KnowledgeDocument {
                        title: "Button guidelines".into(),
                        content: "Remote button guidance".into(),
                    },
                    KnowledgeDocument {
                        title: "Tag and chip usage".into(),
                        content: "Remote badge guidance".into(),
                    },
                    KnowledgeDocument {
                        title: "Layout principles".into(),
                        content: "Remote generic guidance".into(),
                    },
                ],
                other => vec![KnowledgeDocument {
                    title: format!("{} doc", other),
                    content: format!("Remote {} guidance", other),
                }],
            };
            Ok(docs)
        }
    }

    fn settings() -> KnowledgeSettings {
        KnowledgeSettings {
            probe_timeout_ms: 200,
            query_timeout_ms: 200,
            ..KnowledgeSettings::default()
        }
    }

    fn provider(service: Arc<FakeService>) -> KnowledgeProvider {
        KnowledgeProvider::new(service, &settings())
    }

    #[test]
    fn test_title_routing() {
        assert_eq!(route_title("Primary Button patterns"), "button");
        assert_eq!(route_title("Text field validation"), "input");
        assert_eq!(route_title("Status tags"), "badge");
        assert_eq!(route_title("Avatar groups"), "avatar");
        assert_eq!(route_title("Grid systems"), "generic");
        assert_eq!(route_title("Form fields"), "input");
        assert_eq!(route_title("Stage lighting"), "generic");
        assert_eq!(route_title("Vintage palettes"), "generic");
    }

    #[tokio::test]
    async fn test_probe_failure_falls_back_without_querying() {
        let service = Arc::new(FakeService {
            probe_fails: true,
            ..Default::default()
        });
        let provider = provider(Arc::clone(&service));

        let kb = provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedFallback);
        assert!(!kb.guidance_for("generic").is_empty());
        assert_eq!(service.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_timeout_falls_back() {
        let service = Arc::new(FakeService {
            probe_delay: Some(Duration::from_secs(2)),
            ..Default::default()
        });
        let provider = provider(Arc::clone(&service));

        provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedFallback);
        assert_eq!(service.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_success_is_merged() {
        let service = Arc::new(FakeService {
            failing_categories: vec!["tokens"],
            slow_categories: vec!["scoring"],
            ..Default::default()
        });
        let provider = provider(Arc::clone(&service));

        let kb = provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedRemote);
        assert!(kb.version.starts_with("remote-"));
        assert_eq!(kb.guidance_for("button"), "Remote button guidance");
        assert_eq!(kb.guidance_for("badge"), "Remote badge guidance");
        assert_eq!(kb.guidance_for("generic"), "Remote generic guidance");
        // Not returned remotely: built-in text survives
        assert!(kb.guidance_for("avatar").contains("Avatars"));
        assert!(kb.accessibility_guidance.contains("Remote accessibility guidance"));
        // Failed and timed-out topics keep built-in text
        assert_eq!(kb.token_guidance, fallback_knowledge().token_guidance);
        assert_eq!(kb.scoring_guidance, fallback_knowledge().scoring_guidance);
    }

    #[tokio::test]
    async fn test_all_topics_failing_falls_back() {
        let service = Arc::new(FakeService {
            failing_categories: vec!["components", "tokens", "accessibility", "scoring"],
            ..Default::default()
        });
        let provider = provider(Arc::clone(&service));

        let kb = provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedFallback);
        assert_eq!(kb.version, crate::constants::FALLBACK_KNOWLEDGE_VERSION);
        assert_eq!(service.queries.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_empty_results_count_as_failures() {
        let service = Arc::new(FakeService {
            empty_categories: vec!["components", "tokens", "accessibility", "scoring"],
            ..Default::default()
        });
        let provider = provider(Arc::clone(&service));

        let kb = provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedFallback);
        assert_eq!(kb.version, crate::constants::FALLBACK_KNOWLEDGE_VERSION);
        assert_eq!(service.queries.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_memoized_until_reload() {
        let service = Arc::new(FakeService::default());
        let provider = provider(Arc::clone(&service));
        assert_eq!(provider.status(), KnowledgeStatus::Unloaded);

        let first = provider.knowledge().await;
        let second = provider.knowledge().await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.probes.load(Ordering::SeqCst), 1);
        assert_eq!(service.queries.load(Ordering::SeqCst), 4);

        let reloaded = provider.reload().await;
        assert_eq!(reloaded.version, first.version);
        assert_eq!(service.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_offline_provider() {
        let provider = KnowledgeProvider::offline();
        let kb = provider.knowledge().await;
        assert_eq!(provider.status(), KnowledgeStatus::LoadedFallback);
        assert!(!kb.guidance_for("button").is_empty());
    }
}
