//! Answer synthesis with graceful degradation.
//!
//! The ladder, in order: no backend configured → intent-keyed template;
//! backend rejects credentials or quota → permanent in-process switch to
//! templates (explicit state, logged once); any other failure → short
//! generic answer from the top results. Citations always come from the
//! ranked results, whatever path produced the answer text.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use newsqa_core::config::{GenerationConfig, SessionConfig};
use newsqa_core::error::Error;
use newsqa_core::traits::GenerationBackend;
use newsqa_core::types::{Citation, ConversationTurn, ScoredResult};

use crate::prompt::{build_grounding_prompt, SYSTEM_PROMPT};

pub struct SynthesizedAnswer {
    pub answer: String,
    pub sources: Vec<Citation>,
}

pub struct AnswerSynthesizer {
    backend: Option<Arc<dyn GenerationBackend>>,
    config: GenerationConfig,
    history_in_prompt: usize,
    degraded: AtomicBool,
}

impl AnswerSynthesizer {
    pub fn new(
        backend: Option<Arc<dyn GenerationBackend>>,
        config: GenerationConfig,
        session: &SessionConfig,
    ) -> Self {
        Self {
            backend,
            config,
            history_in_prompt: session.history_in_prompt,
            degraded: AtomicBool::new(false),
        }
    }

    /// True once the backend has been written off for this process instance.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Never fails: every input yields an answer string and a citation list
    /// (possibly empty). Empty evidence is terminal — no generation call.
    pub async fn generate_answer(
        &self,
        query: &str,
        results: &[ScoredResult],
        history: &[ConversationTurn],
    ) -> SynthesizedAnswer {
        if results.is_empty() {
            return SynthesizedAnswer {
                answer: not_found_answer(query),
                sources: Vec::new(),
            };
        }

        let sources: Vec<Citation> = results.iter().map(Citation::from_result).collect();
        let answer = self.answer_text(query, results, history).await;
        SynthesizedAnswer { answer, sources }
    }

    async fn answer_text(
        &self,
        query: &str,
        results: &[ScoredResult],
        history: &[ConversationTurn],
    ) -> String {
        let Some(backend) = &self.backend else {
            return templated_answer(query, results);
        };
        if self.is_degraded() {
            return templated_answer(query, results);
        }

        let prompt = build_grounding_prompt(query, results, history, self.history_in_prompt);
        let call = backend.complete(
            SYSTEM_PROMPT,
            &prompt,
            self.config.max_tokens,
            self.config.temperature,
        );
        match tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), call).await {
            Ok(Ok(text)) => text,
            Ok(Err(Error::AuthOrQuota(reason))) => {
                if !self.degraded.swap(true, Ordering::SeqCst) {
                    tracing::warn!(
                        "generation backend rejected credentials or quota ({reason}); switching to templated answers for this process"
                    );
                }
                templated_answer(query, results)
            }
            Ok(Err(e)) => {
                tracing::warn!("generation failed, using summary answer: {e}");
                summary_answer(results)
            }
            Err(_) => {
                tracing::warn!(
                    "generation timed out after {}s, using summary answer",
                    self.config.timeout_secs
                );
                summary_answer(results)
            }
        }
    }
}

/// Detected intent of a query, used to pick a templated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    Pollution,
    CleanFuel,
    Ecology,
    Technology,
    Incident,
    Generic,
}

pub fn detect_intent(query: &str) -> QueryIntent {
    let lower = query.to_lowercase();
    let hit = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if hit(&["spill", "leak", "accident", "incident", "collision"]) {
        QueryIntent::Incident
    } else if hit(&["pollution", "emission", "exhaust", "sulfur", "nitrogen", "co2", "carbon"]) {
        QueryIntent::Pollution
    } else if hit(&["lng", "hydrogen", "methanol", "clean fuel", "natural gas", "shore power"]) {
        QueryIntent::CleanFuel
    } else if hit(&["ecology", "ecological", "wetland", "habitat", "protection", "biodiversity"]) {
        QueryIntent::Ecology
    } else if hit(&["technology", "technical", "equipment", "retrofit", "innovation", "system"]) {
        QueryIntent::Technology
    } else {
        QueryIntent::Generic
    }
}

/// Rule-based answer keyed by intent, interpolating the top result.
fn templated_answer(query: &str, results: &[ScoredResult]) -> String {
    let top = &results[0].document;
    match detect_intent(query) {
        QueryIntent::Pollution => format!(
            "On pollution and emission control, the most relevant report is \"{}\". It describes concrete reduction measures taken in the covered region; see the cited sources for details.",
            top.title
        ),
        QueryIntent::CleanFuel => format!(
            "On clean-fuel adoption, the closest coverage is \"{}\", which follows the shift toward lower-emission propulsion and the infrastructure behind it.",
            top.title
        ),
        QueryIntent::Ecology => format!(
            "On ecological protection, \"{}\" is the most relevant record, covering conservation measures and their reported effects.",
            top.title
        ),
        QueryIntent::Technology => format!(
            "On the technology side, \"{}\" is the best match in the corpus and outlines the equipment and methods involved.",
            top.title
        ),
        QueryIntent::Incident => format!(
            "Regarding the incident you asked about, \"{}\" is the closest report and summarizes the response measures taken.",
            top.title
        ),
        QueryIntent::Generic => format!(
            "The most relevant report found is \"{}\". The cited sources below cover the topic from the news corpus.",
            top.title
        ),
    }
}

/// Short generic answer built from the top two results only.
fn summary_answer(results: &[ScoredResult]) -> String {
    let mut answer =
        String::from("The answer service is temporarily unavailable. The most relevant reports found:");
    for result in results.iter().take(2) {
        let doc = &result.document;
        answer.push_str(&format!("\n- {}", doc.title));
        if !doc.theme.is_empty() {
            answer.push_str(&format!(" ({})", doc.theme));
        }
        if !doc.measure.is_empty() {
            answer.push_str(&format!(" — {}", doc.measure));
        }
    }
    answer
}

fn not_found_answer(query: &str) -> String {
    format!(
        "No matching reports were found for \"{query}\". Try naming a concrete topic (for example an emission type, a fuel, or a port), adding a place, or widening the time range."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsqa_core::error::Result;
    use newsqa_core::types::{DocumentCategories, NewsDocument, SearchType};
    use std::collections::BTreeSet;
    use std::sync::atomic::AtomicUsize;

    fn result(id: &str, title: &str) -> ScoredResult {
        ScoredResult {
            document: NewsDocument {
                id: id.into(),
                title: title.into(),
                theme: "green shipping".into(),
                locations: vec![],
                keywords: BTreeSet::new(),
                categories: DocumentCategories::default(),
                time_category: String::new(),
                executor: String::new(),
                measure: "shore power mandate".into(),
                effect_data: String::new(),
                source_url: String::new(),
                publish_time: None,
                content: "body".into(),
            },
            score: 0.8,
            search_type: SearchType::Vector,
            category_match: None,
        }
    }

    enum Behavior {
        Succeed,
        AuthFail,
        NetworkFail,
    }

    struct MockBackend {
        calls: AtomicUsize,
        behavior: Behavior,
    }

    impl MockBackend {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                behavior,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(format!("grounded answer ({} chars)", user_prompt.len())),
                Behavior::AuthFail => Err(Error::AuthOrQuota("401".into())),
                Behavior::NetworkFail => Err(Error::BackendUnavailable("timeout".into())),
            }
        }
    }

    fn synthesizer(backend: Option<Arc<dyn GenerationBackend>>) -> AnswerSynthesizer {
        AnswerSynthesizer::new(
            backend,
            GenerationConfig::default(),
            &SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn empty_evidence_returns_not_found_without_calling_the_backend() {
        let backend = MockBackend::new(Behavior::Succeed);
        let synthesizer = synthesizer(Some(backend.clone()));
        let answer = synthesizer.generate_answer("lng", &[], &[]).await;

        assert!(answer.sources.is_empty());
        assert!(!answer.answer.is_empty());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn auth_failure_switches_to_templates_permanently() {
        let backend = MockBackend::new(Behavior::AuthFail);
        let synthesizer = synthesizer(Some(backend.clone()));
        let results = vec![result("a", "Shore power expansion")];

        let first = synthesizer.generate_answer("shore power", &results, &[]).await;
        assert!(synthesizer.is_degraded());
        assert!(first.answer.contains("Shore power expansion"));
        assert_eq!(first.sources.len(), 1);

        let second = synthesizer.generate_answer("shore power", &results, &[]).await;
        assert_eq!(backend.calls(), 1, "no retry against a rejected credential");
        assert_eq!(second.sources.len(), 1);
    }

    #[tokio::test]
    async fn transient_failure_yields_summary_with_citations() {
        let backend = MockBackend::new(Behavior::NetworkFail);
        let synthesizer = synthesizer(Some(backend.clone()));
        let results = vec![
            result("a", "Shore power expansion"),
            result("b", "LNG bunkering pilot"),
            result("c", "Third report"),
        ];
        let answer = synthesizer.generate_answer("shore power", &results, &[]).await;

        assert!(!synthesizer.is_degraded(), "transient failures do not degrade");
        assert!(answer.answer.contains("Shore power expansion"));
        assert!(answer.answer.contains("LNG bunkering pilot"));
        assert!(!answer.answer.contains("Third report"), "summary uses top two only");
        assert_eq!(answer.sources.len(), 3);
    }

    #[tokio::test]
    async fn unconfigured_backend_uses_intent_templates() {
        let synthesizer = synthesizer(None);
        let results = vec![result("a", "Sulfur cap enforcement")];
        let answer = synthesizer
            .generate_answer("sulfur emission rules", &results, &[])
            .await;
        assert!(answer.answer.contains("Sulfur cap enforcement"));
        assert!(answer.answer.to_lowercase().contains("pollution"));
        assert_eq!(answer.sources.len(), 1);
    }

    #[tokio::test]
    async fn identical_inputs_yield_identical_citations() {
        let backend = MockBackend::new(Behavior::Succeed);
        let synthesizer = synthesizer(Some(backend));
        let results = vec![result("a", "Shore power expansion"), result("b", "LNG pilot")];

        let first = synthesizer.generate_answer("shore power", &results, &[]).await;
        let second = synthesizer.generate_answer("shore power", &results, &[]).await;

        assert_eq!(first.answer, second.answer);
        let ids = |answer: &SynthesizedAnswer| {
            answer.sources.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn intent_detection_covers_the_template_keys() {
        assert_eq!(detect_intent("oil spill near qingdao"), QueryIntent::Incident);
        assert_eq!(detect_intent("co2 emission trends"), QueryIntent::Pollution);
        assert_eq!(detect_intent("lng bunkering"), QueryIntent::CleanFuel);
        assert_eq!(detect_intent("wetland protection"), QueryIntent::Ecology);
        assert_eq!(detect_intent("scrubber retrofit options"), QueryIntent::Technology);
        assert_eq!(detect_intent("what is new"), QueryIntent::Generic);
    }
}
