use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{AnalysisOutcome, AnalysisReport, AnalysisResult, AuditFinding, FindingSource, PropertyCheat};
use crate::app::Config;
use crate::cache::{fingerprint, AnalysisCache, CacheStats, SystemClock};
use crate::gaps::analyze_gaps;
use crate::knowledge::{HttpKnowledgeService, KnowledgeBase, KnowledgeProvider};
use crate::models::{Credentials, GenerationError, GenerationRequest, Model, ModelConfig, ModelFactory};
use crate::prompt::assemble_prompt;
use crate::scene::{ComponentSnapshot, SceneNode};
use crate::tokens::{TokenAnalysis, TokenClassifier};
use crate::utils::{log_progress, AuditError, InputError};
use crate::validation::{correct, parse_response, ValidatedMetadata};

/// States and properties as the generator reported them
struct Observed {
    states: Vec<String>,
    properties: Vec<String>,
}

/// The consistency engine.
///
/// Owns everything that used to be session-global: the generation backend,
/// the memoized knowledge, and the fingerprint cache. Credentials travel
/// with each call.
pub struct Engine {
    generator: Arc<dyn Model>,
    knowledge: KnowledgeProvider,
    cache: AnalysisCache<AnalysisReport>,
    classifier: TokenClassifier,
    model_config: ModelConfig,
    generation_timeout: Duration,
}

impl Engine {
    pub fn new(generator: Arc<dyn Model>, knowledge: KnowledgeProvider, config: &Config) -> Self {
        Self {
            generator,
            knowledge,
            cache: AnalysisCache::new(config.cache.ttl(), Arc::new(SystemClock)),
            classifier: TokenClassifier::new(config.tokens.ai_suggestion_cap),
            model_config: ModelFactory::model_config(&config.generation),
            generation_timeout: config.generation.timeout(),
        }
    }

    /// Wire up the HTTP backends named in the configuration
    pub fn from_config(config: &Config, offline: bool) -> Result<Self, AuditError> {
        let generator = ModelFactory::create(&config.generation)?;
        let knowledge = if offline || !config.knowledge.enabled {
            KnowledgeProvider::offline()
        } else {
            let service = HttpKnowledgeService::new(&config.knowledge.base_url)
                .map_err(|e| AuditError::Config(e.to_string()))?;
            KnowledgeProvider::new(Arc::new(service), &config.knowledge)
        };
        Ok(Self::new(generator, knowledge, config))
    }

    pub fn with_cache(mut self, cache: AnalysisCache<AnalysisReport>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeProvider {
        &self.knowledge
    }

    pub fn cache(&self) -> &AnalysisCache<AnalysisReport> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reload knowledge and drop cached results produced under older
    /// knowledge
    pub async fn reload_knowledge(&self) -> Arc<KnowledgeBase> {
        let knowledge = self.knowledge.reload().await;
        let dropped = self.cache.retain_knowledge_version(&knowledge.version);
        if dropped > 0 {
            info!(dropped, "dropped cached analyses from previous knowledge");
        }
        knowledge
    }

    /// Analyze one component.
    ///
    /// Input problems are reported before any network activity. A cache hit
    /// returns the stored report without touching the knowledge or
    /// generation services.
    pub async fn analyze(
        &self,
        node: &SceneNode,
        credentials: &Credentials,
    ) -> Result<AnalysisOutcome, AuditError> {
        if !credentials.is_complete() {
            return Err(InputError::MissingCredential {
                model: credentials.model.clone(),
            }
            .into());
        }
        let snapshot = ComponentSnapshot::from_node(node)?;
        let tokens = self.classifier.classify(node, snapshot.interactive);
        let key = fingerprint(&snapshot, &tokens);
        debug!(component = %snapshot.name, fingerprint = %key, family = %snapshot.family, "snapshot built");

        if let Some(report) = self.cache.lookup(&key) {
            info!(component = %snapshot.name, "cache hit");
            return Ok(AnalysisOutcome {
                fingerprint: key,
                from_cache: true,
                report,
            });
        }

        let knowledge = self.knowledge.knowledge().await;
        let prompt = assemble_prompt(&snapshot, &knowledge);
        let raw = self.generate(prompt, credentials).await?;

        let generated = parse_response(&raw)?;
        // Gaps are measured against what was generated, not against injected defaults
        let observed = Observed {
            states: generated.states.clone(),
            properties: generated.observed_properties(),
        };
        let validated = correct(generated, &snapshot);
        let report = self.build_report(&snapshot, tokens, &observed, validated);

        self.cache.store(key.clone(), report.clone(), &knowledge.version);
        info!(
            component = %snapshot.name,
            score = report.result.score.overall,
            gaps = report.gaps.len(),
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            fingerprint: key,
            from_cache: false,
            report,
        })
    }

    /// Analyze a selection one component at a time.
    ///
    /// An empty selection is an input error; per-component failures are
    /// returned in place and do not stop the batch.
    pub async fn analyze_batch(
        &self,
        nodes: &[SceneNode],
        credentials: &Credentials,
    ) -> Result<Vec<Result<AnalysisOutcome, AuditError>>, AuditError> {
        if nodes.is_empty() {
            return Err(InputError::NoSelection.into());
        }

        let mut outcomes = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            log_progress(i + 1, nodes.len(), &node.name);
            outcomes.push(self.analyze(node, credentials).await);
        }
        Ok(outcomes)
    }

    async fn generate(&self, prompt: String, credentials: &Credentials) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            credentials: credentials.clone(),
            prompt,
            config: self.model_config.clone(),
        };

        debug!(model = %credentials.model, "requesting generation");
        match tokio::time::timeout(self.generation_timeout, self.generator.generate(&request)).await {
            Ok(response) => Ok(response?.content),
            Err(_) => Err(GenerationError::Timeout(self.generation_timeout.as_secs())),
        }
    }

    fn build_report(
        &self,
        snapshot: &ComponentSnapshot,
        mut tokens: TokenAnalysis,
        observed: &Observed,
        validated: ValidatedMetadata,
    ) -> AnalysisReport {
        let ValidatedMetadata {
            metadata,
            score,
            corrections,
        } = validated;

        let admitted = self.classifier.admit_suggestions(&mut tokens, &metadata.tokens);
        debug!(admitted, "merged suggested tokens");

        let mut audit: Vec<AuditFinding> = metadata
            .audit
            .iter()
            .filter(|item| !item.message.trim().is_empty())
            .map(|item| AuditFinding {
                severity: match item.severity.trim().to_lowercase() {
                    s if s.is_empty() => "info".to_string(),
                    s => s,
                },
                source: FindingSource::Generated,
                message: item.message.clone(),
                suggestion: item.suggestion.clone(),
            })
            .collect();
        audit.extend(AnalysisResult::token_findings(&tokens));

        let mut property_cheat_sheet: Vec<PropertyCheat> = metadata
            .props
            .iter()
            .filter(|p| !p.name.is_empty())
            .map(PropertyCheat::from_prop)
            .collect();
        for variant in metadata.variants.iter().filter(|v| !v.name.is_empty()) {
            let known = property_cheat_sheet
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&variant.name));
            if !known {
                property_cheat_sheet.push(PropertyCheat::from_variant(variant));
            }
        }

        let gaps = analyze_gaps(
            &snapshot.family,
            &observed.states,
            &observed.properties,
            &metadata.accessibility,
        );

        AnalysisReport {
            result: AnalysisResult {
                family: snapshot.family.clone(),
                metadata,
                score,
                tokens,
                audit,
                property_cheat_sheet,
                corrections,
            },
            gaps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::KnowledgeSettings;
    use crate::gaps::{GapCategory, GapSeverity};
    use crate::knowledge::{KnowledgeDocument, KnowledgeError, KnowledgeService, KnowledgeStatus};
    use crate::models::{MockModel, ModelResponse};
    use crate::scene::{Paint, PaintKind, Rgba};
    use crate::tokens::{TokenCategory, TokenOrigin};
    use crate::validation::{ParseError, CANONICAL_BUTTON_STATES};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BUTTON_RESPONSE: &str = r##"Sure! Here is the analysis:
{
  "component": "Button",
  "description": "Triggers a primary action.",
  "score": {"overall": 72, "breakdown": {"tokens": 50, "states": 80}},
  "props": [{"name": "label", "type": "string"}, {"name": "size", "type": "enum", "values": ["sm", "md"]}],
  "states": ["default"],
  "variants": [{"name": "variant", "values": ["primary", "secondary"]}, {"name": "Size", "values": ["sm"]}],
  "usage": ["Use one primary button per view"],
  "accessibility": [],
  "tokens": [{"name": "semantic-color-action-hover", "value": "#1d4ed8", "category": "color"}],
  "audit": [{"severity": "Warning", "message": "Fill is not bound to a token"}]
}"##;

    struct CountingService {
        probe_ok: bool,
        probes: AtomicUsize,
        queries: AtomicUsize,
    }

    impl CountingService {
        fn new(probe_ok: bool) -> Arc<Self> {
            Arc::new(Self {
                probe_ok,
                probes: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.probes.load(Ordering::SeqCst),
                self.queries.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl KnowledgeService for CountingService {
        async fn probe(&self) -> Result<(), KnowledgeError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if self.probe_ok {
                Ok(())
            } else {
                Err(KnowledgeError::Unreachable("refused".into()))
            }
        }

        async fn query(
            &self,
            _text: &str,
            _limit: usize,
            category: &str,
        ) -> Result<Vec<KnowledgeDocument>, KnowledgeError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(vec![KnowledgeDocument {
                title: format!("{} guide", category),
                content: format!("remote {}", category),
            }])
        }
    }

    /// Never answers within a test's patience
    struct StalledModel;

    #[async_trait]
    impl Model for StalledModel {
        async fn generate(&self, _request: &GenerationRequest) -> Result<ModelResponse, GenerationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(ModelResponse::text("{}"))
        }
    }

    fn model_answering(times: usize, text: &'static str) -> Arc<MockModel> {
        let mut model = MockModel::new();
        model
            .expect_generate()
            .times(times)
            .returning(move |_| Ok(ModelResponse::text(text)));
        Arc::new(model)
    }

    fn engine(model: Arc<dyn Model>, service: Arc<CountingService>) -> Engine {
        let settings = KnowledgeSettings {
            probe_timeout_ms: 500,
            query_timeout_ms: 500,
            ..KnowledgeSettings::default()
        };
        Engine::new(model, KnowledgeProvider::new(service, &settings), &Config::default())
    }

    fn credentials() -> Credentials {
        Credentials::new("gpt-4o-mini", "sk-test")
    }

    fn button(x: f64) -> SceneNode {
        SceneNode {
            name: "Button/Primary".into(),
            node_type: "COMPONENT".into(),
            x: Some(x),
            width: Some(120.0),
            height: Some(40.0),
            fills: vec![Paint {
                kind: PaintKind::Solid,
                visible: true,
                opacity: 1.0,
                color: Some(Rgba {
                    r: 0.1,
                    g: 0.3,
                    b: 0.9,
                    a: 1.0,
                }),
                bound_variable: None,
            }],
            children: vec![SceneNode {
                name: "Label".into(),
                node_type: "TEXT".into(),
                ..SceneNode::default()
            }],
            ..SceneNode::default()
        }
    }

    #[tokio::test]
    async fn test_second_analysis_is_served_from_cache() {
        let service = CountingService::new(true);
        let engine = engine(model_answering(1, BUTTON_RESPONSE), service.clone());

        let first = engine.analyze(&button(0.0), &credentials()).await.unwrap();
        let calls_after_first = service.calls();
        assert!(!first.from_cache);
        assert_eq!(calls_after_first, (1, 4));

        // Moved on the canvas: same structure, same key
        let second = engine.analyze(&button(480.0), &credentials()).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.fingerprint, first.fingerprint);
        assert_eq!(service.calls(), calls_after_first);
        assert_eq!(
            serde_json::to_string(&second.report).unwrap(),
            serde_json::to_string(&first.report).unwrap()
        );
        assert_eq!(engine.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_report_contents() {
        let engine = engine(model_answering(1, BUTTON_RESPONSE), CountingService::new(true));
        let outcome = engine.analyze(&button(0.0), &credentials()).await.unwrap();
        let result = &outcome.report.result;

        assert_eq!(result.family, "button");
        assert_eq!(result.metadata.component, "Button");
        assert_eq!(result.score.overall, 72.0);
        // "default" alone fails the button invariant; canonical states injected
        assert_eq!(result.corrections.len(), 1);
        assert!(result.metadata.states.iter().any(|s| s == "hover"));

        let colors = result.tokens.tokens(TokenCategory::Color);
        assert!(colors.iter().any(|t| t.origin == TokenOrigin::HardCoded));
        assert!(colors
            .iter()
            .any(|t| t.origin == TokenOrigin::AiSuggestion && t.value == "#1d4ed8"));

        assert_eq!(result.audit[0].severity, "warning");
        assert_eq!(result.audit[0].source, FindingSource::Generated);
        assert!(result.audit.iter().any(|f| f.source == FindingSource::Tokens));

        // Size variant folds into the existing size property
        let names: Vec<&str> = result
            .property_cheat_sheet
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["label", "size", "variant"]);

        // Injected states do not hide the states the generator left out
        let gaps = &outcome.report.gaps;
        let states = gaps.iter().find(|g| g.category == GapCategory::States).unwrap();
        assert_eq!(states.severity, GapSeverity::Warning);
        assert!(gaps.iter().any(|g| g.category == GapCategory::Accessibility));
    }

    #[tokio::test]
    async fn test_button_without_states_reports_warning_gap() {
        const STATELESS: &str = r#"{
  "component": "Button",
  "description": "Triggers an action.",
  "score": 60,
  "props": [{"name": "variant", "type": "enum"}, {"name": "disabled", "type": "boolean"}],
  "states": [],
  "accessibility": ["Visible focus ring"]
}"#;
        let engine = engine(model_answering(1, STATELESS), CountingService::new(false));
        let outcome = engine.analyze(&button(0.0), &credentials()).await.unwrap();

        let metadata = &outcome.report.result.metadata;
        assert!(metadata.states.iter().any(|s| s == "hover"));

        let states = outcome
            .report
            .gaps
            .iter()
            .find(|g| g.category == GapCategory::States)
            .unwrap();
        assert_eq!(states.severity, GapSeverity::Warning);
        for expected in CANONICAL_BUTTON_STATES {
            assert!(states.missing_items.iter().any(|m| m == expected), "{} not reported", expected);
        }
    }

    #[tokio::test]
    async fn test_probe_failure_still_completes() {
        let service = CountingService::new(false);
        let engine = engine(model_answering(1, BUTTON_RESPONSE), service.clone());

        let outcome = engine.analyze(&button(0.0), &credentials()).await.unwrap();
        assert_eq!(engine.knowledge().status(), KnowledgeStatus::LoadedFallback);
        assert_eq!(service.calls(), (1, 0));
        assert!(!engine.knowledge().knowledge().await.guidance_for("generic").is_empty());
        assert_eq!(outcome.report.result.metadata.component, "Button");
    }

    #[tokio::test]
    async fn test_response_without_json_is_not_cached() {
        let engine = engine(
            model_answering(1, "I'm sorry, I can't help with that."),
            CountingService::new(true),
        );

        let err = engine.analyze(&button(0.0), &credentials()).await.unwrap_err();
        assert!(matches!(err, AuditError::Parse(ParseError::NoJsonObject)));
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn test_input_errors_precede_network() {
        let service = CountingService::new(true);
        let engine = engine(model_answering(0, BUTTON_RESPONSE), service.clone());

        let text = SceneNode {
            name: "Heading".into(),
            node_type: "TEXT".into(),
            ..SceneNode::default()
        };
        let err = engine.analyze(&text, &credentials()).await.unwrap_err();
        assert!(matches!(err, AuditError::Input(InputError::InvalidNodeKind { .. })));

        let err = engine
            .analyze(&button(0.0), &Credentials::new("gpt-4o-mini", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Input(InputError::MissingCredential { .. })));

        let err = engine.analyze_batch(&[], &credentials()).await.unwrap_err();
        assert!(matches!(err, AuditError::Input(InputError::NoSelection)));

        assert_eq!(service.calls(), (0, 0));
        assert_eq!(engine.knowledge().status(), KnowledgeStatus::Unloaded);
    }

    #[tokio::test]
    async fn test_generation_timeout_is_fatal_and_uncached() {
        let engine = engine(Arc::new(StalledModel), CountingService::new(false))
            .with_generation_timeout(Duration::from_millis(50));

        let err = engine.analyze(&button(0.0), &credentials()).await.unwrap_err();
        assert!(matches!(err, AuditError::Generation(GenerationError::Timeout(_))));
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn test_batch_runs_each_component() {
        let engine = engine(model_answering(2, BUTTON_RESPONSE), CountingService::new(true));
        let mut other = button(0.0);
        other.name = "Card".into();
        other.node_type = "FRAME".into();

        let outcomes = engine
            .analyze_batch(&[button(0.0), other, button(10.0)], &credentials())
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.is_ok()));
        assert!(outcomes[2].as_ref().unwrap().from_cache);
    }

    #[tokio::test]
    async fn test_reload_keeps_entries_for_same_knowledge() {
        let engine = engine(model_answering(1, BUTTON_RESPONSE), CountingService::new(true));
        engine.analyze(&button(0.0), &credentials()).await.unwrap();

        engine.reload_knowledge().await;
        assert_eq!(engine.cache().len(), 1);
    }
}
