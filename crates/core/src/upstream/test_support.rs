//! In-memory upstream fakes and a throw-away HTTP server for client tests.

use super::{
    InteractionListResponse, InteractionPair, InteractionType, InteractionTypeGroup, LabelRecord,
    LabelSource, PropConcept, RelatedConcept, VocabularySource,
};
use crate::config::SafetyConfig;
use crate::{SafetyError, SafetyResult};
use async_trait::async_trait;
use medsafe_types::{ConceptId, DrugName};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub(crate) async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind ephemeral port");
    let addr = listener.local_addr().expect("should have local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("upstream test server should run");
    });
    format!("http://{addr}")
}

pub(crate) fn test_cfg(rxnav_base_url: &str, openfda_base_url: &str) -> SafetyConfig {
    SafetyConfig::new(
        rxnav_base_url,
        openfda_base_url,
        Duration::from_millis(500),
        4,
        Duration::ZERO,
    )
    .expect("test config should be valid")
}

/// Builds a one-group interaction response from `(description, severity)` leaves.
pub(crate) fn interaction_body(leaves: &[(&str, Option<&str>)]) -> InteractionListResponse {
    InteractionListResponse {
        groups: vec![InteractionTypeGroup {
            interaction_types: leaves
                .iter()
                .map(|(description, severity)| InteractionType {
                    pairs: vec![InteractionPair {
                        description: Some(description.to_string()),
                        severity: severity.map(str::to_string),
                    }],
                })
                .collect(),
        }],
    }
}

enum InteractionReply {
    NoneKnown,
    Body(InteractionListResponse),
    Fail(SafetyError),
}

pub(crate) struct FakeVocabulary {
    names: HashMap<String, ConceptId>,
    failing_names: HashSet<String>,
    ingredients: HashMap<String, Vec<RelatedConcept>>,
    failing_related: HashSet<String>,
    interactions: InteractionReply,
    attributes: HashMap<String, Vec<PropConcept>>,
    calls: Mutex<Vec<String>>,
}

impl FakeVocabulary {
    pub(crate) fn new() -> Self {
        Self {
            names: HashMap::new(),
            failing_names: HashSet::new(),
            ingredients: HashMap::new(),
            failing_related: HashSet::new(),
            interactions: InteractionReply::NoneKnown,
            attributes: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_name(mut self, name: &str, rxcui: &str) -> Self {
        self.names.insert(name.to_string(), ConceptId::new(rxcui));
        self
    }

    pub(crate) fn with_failing_name(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    pub(crate) fn with_ingredient(mut self, rxcui: &str, ingredient: &str, name: &str) -> Self {
        self.ingredients
            .entry(rxcui.to_string())
            .or_default()
            .push(RelatedConcept {
                rxcui: ingredient.to_string(),
                name: name.to_string(),
            });
        self
    }

    pub(crate) fn with_failing_related(mut self, rxcui: &str) -> Self {
        self.failing_related.insert(rxcui.to_string());
        self
    }

    pub(crate) fn with_interactions(mut self, body: InteractionListResponse) -> Self {
        self.interactions = InteractionReply::Body(body);
        self
    }

    pub(crate) fn with_failing_interactions(mut self, err: SafetyError) -> Self {
        self.interactions = InteractionReply::Fail(err);
        self
    }

    pub(crate) fn with_attribute(mut self, rxcui: &str, prop: &str, value: &str) -> Self {
        self.attributes
            .entry(rxcui.to_string())
            .or_default()
            .push(PropConcept {
                prop_name: prop.to_string(),
                prop_value: Some(value.to_string()),
            });
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn interaction_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("interactions:"))
            .collect()
    }
}

#[async_trait]
impl VocabularySource for FakeVocabulary {
    async fn rxcui_for_name(&self, name: &DrugName) -> SafetyResult<Option<ConceptId>> {
        self.record(format!("rxcui:{name}"));
        if self.failing_names.contains(name.as_str()) {
            return Err(SafetyError::Transport("connection refused".into()));
        }
        Ok(self.names.get(name.as_str()).cloned())
    }

    async fn related_ingredients(&self, id: &ConceptId) -> SafetyResult<Vec<RelatedConcept>> {
        self.record(format!("related:{id}"));
        if self.failing_related.contains(id.as_str()) {
            return Err(SafetyError::Malformed("unexpected end of input".into()));
        }
        Ok(self.ingredients.get(id.as_str()).cloned().unwrap_or_default())
    }

    async fn interactions_for(&self, ids: &[ConceptId]) -> SafetyResult<InteractionListResponse> {
        let joined: Vec<&str> = ids.iter().map(ConceptId::as_str).collect();
        self.record(format!("interactions:{}", joined.join("+")));
        match &self.interactions {
            InteractionReply::NoneKnown => Err(SafetyError::NoDataUpstream),
            InteractionReply::Body(body) => Ok(body.clone()),
            InteractionReply::Fail(err) => Err(err.clone()),
        }
    }

    async fn attributes_for(&self, id: &ConceptId) -> SafetyResult<Vec<PropConcept>> {
        self.record(format!("attributes:{id}"));
        Ok(self.attributes.get(id.as_str()).cloned().unwrap_or_default())
    }
}

pub(crate) struct FakeLabels {
    records: HashMap<String, LabelRecord>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeLabels {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_record(mut self, name: &str, record: LabelRecord) -> Self {
        self.records.insert(name.to_string(), record);
        self
    }

    pub(crate) fn with_failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl LabelSource for FakeLabels {
    async fn label_for_brand(&self, name: &DrugName) -> SafetyResult<LabelRecord> {
        self.calls.lock().expect("calls lock").push(name.to_string());
        if self.failing.contains(name.as_str()) {
            return Err(SafetyError::Transport("request timed out".into()));
        }
        self.records
            .get(name.as_str())
            .cloned()
            .ok_or(SafetyError::NoDataUpstream)
    }
}
