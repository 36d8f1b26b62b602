use tracing::info;

use crate::cache::{Fingerprint, JsonStore};
use crate::error::Result;
use crate::llm::Gateway;
use crate::models::{Analysis, Argument, ArgumentGraph, Transcript};

use super::classify::classify_segment;
use super::normalize::normalize;
use super::relations::infer_relations;
use super::segment::merge_segments;

/// Owns the argument list and graph for one analysis run.
///
/// Strictly sequential: segments are classified in transcript order and ids
/// are assigned in exactly that order, which downstream consumers rely on to
/// identify arguments purely by position.
#[derive(Debug, Default)]
pub struct DebateAnalyzer {
    pub arguments: Vec<Argument>,
    pub graph: ArgumentGraph,
}

impl DebateAnalyzer {
    pub fn new() -> Self {
        Self {
            arguments: Vec::new(),
            graph: ArgumentGraph::new(),
        }
    }

    /// Run the full pipeline for one transcript, or return the cached
    /// analysis verbatim on a fingerprint hit.
    ///
    /// The cache hit path is a correctness contract, not an optimization:
    /// repeated calls to a nondeterministic model could yield a different
    /// graph for the same audio on every run.
    pub async fn analyze_transcript<G: Gateway>(
        &mut self,
        gateway: &G,
        transcript: &Transcript,
        fingerprint: &Fingerprint,
        analysis_store: &JsonStore,
    ) -> Result<()> {
        if let Some(cached) = analysis_store.load::<Analysis>(fingerprint)? {
            info!("using cached analysis");
            self.arguments = cached.arguments;
            self.graph = cached.graph;
            return Ok(());
        }

        let utterances = normalize(transcript)?;
        let segments = merge_segments(gateway, &utterances).await?;
        info!("merged transcript into {} segments", segments.len());

        for (id, segment) in segments.iter().enumerate() {
            let analysis = classify_segment(gateway, segment).await?;
            let argument = Argument::from_analysis(id, segment, analysis);
            self.graph.add_node(argument.clone());
            self.arguments.push(argument);
        }

        let relations = infer_relations(gateway, &self.arguments).await?;
        for relation in &relations {
            self.graph.add_edge(relation)?;
        }

        analysis_store.save(fingerprint, &self.to_analysis())?;
        Ok(())
    }

    /// The persistable artifact for this run
    pub fn to_analysis(&self) -> Analysis {
        Analysis {
            arguments: self.arguments.clone(),
            graph: self.graph.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::llm::GatewayOutcome;
    use crate::models::{ArgumentAnalysis, Relation, RelationType, Segment, Utterance};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted gateway for tests: serves canned outcomes and counts calls
    pub(crate) struct FakeGateway {
        refined_segments: Option<Vec<Segment>>,
        analyses: Vec<ArgumentAnalysis>,
        relations: Option<Vec<Relation>>,
        refusal: Option<String>,
        unparsed: bool,
        fail_status: Option<u16>,
        pub calls: AtomicUsize,
        classify_index: AtomicUsize,
    }

    impl FakeGateway {
        pub(crate) fn new() -> Self {
            Self {
                refined_segments: None,
                analyses: Vec::new(),
                relations: None,
                refusal: None,
                unparsed: false,
                fail_status: None,
                calls: AtomicUsize::new(0),
                classify_index: AtomicUsize::new(0),
            }
        }

        /// Gateway that refuses every request
        pub(crate) fn refusing(reason: &str) -> Self {
            Self {
                refusal: Some(reason.to_string()),
                ..Self::new()
            }
        }

        /// Gateway whose every response carries no parsable payload
        pub(crate) fn unparsed() -> Self {
            Self {
                unparsed: true,
                ..Self::new()
            }
        }

        /// Gateway whose every request fails with an API error
        pub(crate) fn erroring(status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Self::new()
            }
        }

        fn failure(&self) -> Option<AnalysisError> {
            self.fail_status.map(|status| {
                self.calls.fetch_add(1, Ordering::SeqCst);
                AnalysisError::Gateway {
                    status,
                    body: "scripted failure".to_string(),
                }
            })
        }

        pub(crate) fn with_refined_segments(mut self, segments: Vec<Segment>) -> Self {
            self.refined_segments = Some(segments);
            self
        }

        pub(crate) fn with_analyses(mut self, analyses: Vec<ArgumentAnalysis>) -> Self {
            self.analyses = analyses;
            self
        }

        pub(crate) fn with_relations(mut self, relations: Vec<Relation>) -> Self {
            self.relations = Some(relations);
            self
        }

        fn outcome<T>(&self, parsed: Option<T>) -> GatewayOutcome<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(reason) = &self.refusal {
                return GatewayOutcome::Refused(reason.clone());
            }
            if self.unparsed {
                return GatewayOutcome::Unparsed;
            }
            match parsed {
                Some(payload) => GatewayOutcome::Parsed(payload),
                None => GatewayOutcome::Unparsed,
            }
        }
    }

    impl Gateway for FakeGateway {
        async fn refine_segments(
            &self,
            segments: &[Segment],
        ) -> crate::error::Result<GatewayOutcome<Vec<Segment>>> {
            if let Some(e) = self.failure() {
                return Err(e);
            }
            let parsed = self
                .refined_segments
                .clone()
                .or_else(|| Some(segments.to_vec()));
            Ok(self.outcome(parsed))
        }

        async fn classify_argument(
            &self,
            _segment: &Segment,
        ) -> crate::error::Result<GatewayOutcome<ArgumentAnalysis>> {
            if let Some(e) = self.failure() {
                return Err(e);
            }
            let index = self.classify_index.fetch_add(1, Ordering::SeqCst);
            let parsed = self.analyses.get(index % self.analyses.len().max(1)).cloned();
            Ok(self.outcome(parsed))
        }

        async fn infer_relations(
            &self,
            _arguments: &[Argument],
        ) -> crate::error::Result<GatewayOutcome<Vec<Relation>>> {
            if let Some(e) = self.failure() {
                return Err(e);
            }
            Ok(self.outcome(self.relations.clone()))
        }
    }

    fn utterance(speaker: &str, text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            start: 0,
            end: 1000,
            confidence: 0.9,
            speaker: speaker.to_string(),
            words: vec![],
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            id: "tr_1".to_string(),
            text: None,
            utterances: vec![
                utterance("A", "I think X."),
                utterance("A", "Because Y."),
                utterance("B", "No, Z."),
            ],
            confidence: None,
            audio_duration: Some(2.0),
            status: "completed".to_string(),
            error: None,
            summary: None,
        }
    }

    fn analysis() -> ArgumentAnalysis {
        ArgumentAnalysis {
            scheme: "Argument from Sign".to_string(),
            premises: vec!["Y".to_string()],
            conclusion: "X".to_string(),
            critical_questions: vec!["Is Y reliable evidence?".to_string()],
        }
    }

    fn scripted_gateway() -> FakeGateway {
        FakeGateway::new()
            .with_analyses(vec![analysis()])
            .with_relations(vec![Relation {
                source: 1,
                target: 0,
                relation_type: RelationType::Attack,
            }])
    }

    #[tokio::test]
    async fn test_full_run_assigns_dense_ids_and_edges() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::analysis_cache(dir.path());
        let fingerprint = Fingerprint::from_raw("fp1");
        let gateway = scripted_gateway();

        let mut analyzer = DebateAnalyzer::new();
        analyzer
            .analyze_transcript(&gateway, &transcript(), &fingerprint, &store)
            .await
            .unwrap();

        // Two segments after local merge: (A, joined) and (B, ...)
        assert_eq!(analyzer.arguments.len(), 2);
        for (index, argument) in analyzer.arguments.iter().enumerate() {
            assert_eq!(argument.id, index);
        }
        assert_eq!(analyzer.arguments[0].text, "I think X. Because Y.");
        assert_eq!(analyzer.graph.node_count(), 2);
        assert_eq!(analyzer.graph.edge_count(), 1);
        assert!(analyzer.graph.has_edge(1, 0, RelationType::Attack));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_gateway_and_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::analysis_cache(dir.path());
        let fingerprint = Fingerprint::from_raw("fp2");

        let gateway = scripted_gateway();
        let mut first = DebateAnalyzer::new();
        first
            .analyze_transcript(&gateway, &transcript(), &fingerprint, &store)
            .await
            .unwrap();

        let second_gateway = scripted_gateway();
        let mut second = DebateAnalyzer::new();
        second
            .analyze_transcript(&second_gateway, &transcript(), &fingerprint, &store)
            .await
            .unwrap();

        assert_eq!(second_gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_string(&first.to_analysis()).unwrap(),
            serde_json::to_string(&second.to_analysis()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_out_of_range_relation_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::analysis_cache(dir.path());
        let fingerprint = Fingerprint::from_raw("fp3");
        let gateway = FakeGateway::new()
            .with_analyses(vec![analysis()])
            .with_relations(vec![Relation {
                source: 0,
                target: 5,
                relation_type: RelationType::Support,
            }]);

        let mut analyzer = DebateAnalyzer::new();
        let result = analyzer
            .analyze_transcript(&gateway, &transcript(), &fingerprint, &store)
            .await;

        assert!(matches!(result, Err(AnalysisError::Integrity(_))));
        // The failed analysis must not be cached
        let cached: Option<Analysis> = store.load(&fingerprint).unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_classification_refusal_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::analysis_cache(dir.path());
        let fingerprint = Fingerprint::from_raw("fp4");

        // Refine succeeds (echo), classification refuses: merger degrades,
        // classifier escalates
        struct RefineOkClassifyRefuse;
        impl Gateway for RefineOkClassifyRefuse {
            async fn refine_segments(
                &self,
                segments: &[Segment],
            ) -> crate::error::Result<GatewayOutcome<Vec<Segment>>> {
                Ok(GatewayOutcome::Parsed(segments.to_vec()))
            }
            async fn classify_argument(
                &self,
                _segment: &Segment,
            ) -> crate::error::Result<GatewayOutcome<ArgumentAnalysis>> {
                Ok(GatewayOutcome::Refused("no".to_string()))
            }
            async fn infer_relations(
                &self,
                _arguments: &[Argument],
            ) -> crate::error::Result<GatewayOutcome<Vec<Relation>>> {
                Ok(GatewayOutcome::Parsed(vec![]))
            }
        }

        let mut analyzer = DebateAnalyzer::new();
        let result = analyzer
            .analyze_transcript(&RefineOkClassifyRefuse, &transcript(), &fingerprint, &store)
            .await;

        assert!(matches!(result, Err(AnalysisError::Classification(_))));
    }
}
