//! Top-level ask-question flow.

use std::sync::Arc;

use newsqa_core::config::Config;
use newsqa_core::error::{Error, Result};
use newsqa_core::traits::{EmbeddingProvider, GenerationBackend, SimilarityIndex};
use newsqa_core::types::{ConversationTurn, QaResponse, SearchFilters};
use newsqa_retrieval::{
    CategoryChannel, CategoryVocabulary, EnhancedRetriever, KeywordExtractor,
    SearchStrategyAdvisor, VectorChannel,
};

use crate::conversation::ConversationStore;
use crate::synthesizer::AnswerSynthesizer;

/// question → expansion → {vector, category} → fusion → synthesis, with the
/// session history read before and written after synthesis.
pub struct QaEngine {
    retriever: EnhancedRetriever,
    synthesizer: AnswerSynthesizer,
    conversations: ConversationStore,
    advisor: SearchStrategyAdvisor,
}

impl QaEngine {
    pub fn new(
        retriever: EnhancedRetriever,
        synthesizer: AnswerSynthesizer,
        conversations: ConversationStore,
    ) -> Self {
        Self {
            retriever,
            synthesizer,
            conversations,
            advisor: SearchStrategyAdvisor::new(),
        }
    }

    /// Wire the full pipeline from configuration and the three collaborators.
    pub fn build(
        config: &Config,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
        backend: Option<Arc<dyn GenerationBackend>>,
    ) -> Self {
        let retrieval = config.retrieval.clone();
        let vector = VectorChannel::new(embedder.clone(), index.clone(), retrieval.clone());
        let extractor = KeywordExtractor::new(CategoryVocabulary::default(), embedder, &retrieval);
        let category = CategoryChannel::new(extractor, index, retrieval.clone());
        let retriever = EnhancedRetriever::new(vector, category, retrieval);
        let synthesizer =
            AnswerSynthesizer::new(backend, config.generation.clone(), &config.session);
        let conversations = ConversationStore::new(&config.session);
        Self::new(retriever, synthesizer, conversations)
    }

    /// The only surfaced error is input validation; every downstream failure
    /// degrades inside the pipeline and still yields an answer with sources.
    pub async fn ask(
        &self,
        session_id: &str,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<QaResponse> {
        if query.trim().is_empty() {
            return Err(Error::MalformedInput("question must not be empty".into()));
        }

        let strategy = self.advisor.classify(query);
        let results = self.retriever.enhanced_hybrid_search(query, filters).await;
        let history = self.conversations.read(session_id);
        let synthesized = self
            .synthesizer
            .generate_answer(query, &results, &history)
            .await;

        self.conversations
            .append(session_id, ConversationTurn::user(query));
        self.conversations.append(
            session_id,
            ConversationTurn::assistant(synthesized.answer.as_str(), synthesized.sources.clone()),
        );

        Ok(QaResponse {
            session_id: session_id.to_string(),
            answer: synthesized.answer,
            sources: synthesized.sources,
            strategy,
        })
    }

    pub fn clear_session(&self, session_id: &str) {
        self.conversations.clear(session_id);
    }

    pub fn history(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.conversations.read(session_id)
    }

    pub fn is_degraded(&self) -> bool {
        self.synthesizer.is_degraded()
    }
}
