//! External drug-data services.
//!
//! Two trait seams describe what the pipeline needs from the outside world:
//!
//! - [`VocabularySource`]: the RxNorm vocabulary (name lookup, related concepts, pill attributes)
//!   and the pairwise interaction list.
//! - [`LabelSource`]: structured product labeling search.
//!
//! [`RxNavClient`] and [`OpenFdaClient`] are the HTTP implementations. The wire models below
//! default every field because upstream payloads routinely omit or null out whole branches.

mod openfda;
mod rxnav;

pub use openfda::OpenFdaClient;
pub use rxnav::RxNavClient;

use crate::SafetyResult;
use async_trait::async_trait;
use medsafe_types::{ConceptId, DrugName};
use serde::{Deserialize, Deserializer};

/// Vocabulary and interaction lookups keyed by RxNorm concept ids.
#[async_trait]
pub trait VocabularySource: Send + Sync {
    /// Name-level concept for a free-text drug name. `Ok(None)` when the name is not recognised.
    async fn rxcui_for_name(&self, name: &DrugName) -> SafetyResult<Option<ConceptId>>;

    /// Ingredient-level concepts related to `id`, from the first concept group, in response order.
    async fn related_ingredients(&self, id: &ConceptId) -> SafetyResult<Vec<RelatedConcept>>;

    /// Interactions among `ids`. `Err(SafetyError::NoDataUpstream)` means the service knows of
    /// no interactions.
    async fn interactions_for(&self, ids: &[ConceptId]) -> SafetyResult<InteractionListResponse>;

    /// Attribute properties (imprint, colour, shape, ...) recorded for `id`.
    async fn attributes_for(&self, id: &ConceptId) -> SafetyResult<Vec<PropConcept>>;
}

/// Drug labeling lookups.
#[async_trait]
pub trait LabelSource: Send + Sync {
    /// First labeling record whose brand name matches `name`.
    /// `Err(SafetyError::NoDataUpstream)` when nothing matches.
    async fn label_for_brand(&self, name: &DrugName) -> SafetyResult<LabelRecord>;
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// First non-blank entry of an openFDA text array.
fn first_text(values: Vec<String>) -> Option<String> {
    values.into_iter().find(|v| !v.trim().is_empty())
}

// ============================================================================
// RXNAV WIRE MODELS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RxcuiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_group: IdGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rxnorm_id: Vec<String>,
}

impl RxcuiResponse {
    pub(crate) fn first_id(self) -> Option<ConceptId> {
        self.id_group
            .rxnorm_id
            .into_iter()
            .find(|id| !id.trim().is_empty())
            .map(ConceptId::new)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelatedResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_group: RelatedGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelatedGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub concept_group: Vec<ConceptGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConceptGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub concept_properties: Vec<RelatedConcept>,
}

impl RelatedResponse {
    /// Concepts of the primary (first) group that carry an id.
    pub(crate) fn primary_concepts(self) -> Vec<RelatedConcept> {
        self.related_group
            .concept_group
            .into_iter()
            .next()
            .map(|group| {
                group
                    .concept_properties
                    .into_iter()
                    .filter(|c| !c.rxcui.trim().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A concept returned by the related-concepts endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelatedConcept {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rxcui: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Body of a successful interaction list query.
///
/// Groups hold interaction types; each type holds one or more description/severity pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionListResponse {
    #[serde(
        rename = "fullInteractionTypeGroup",
        default,
        deserialize_with = "null_as_default"
    )]
    pub groups: Vec<InteractionTypeGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionTypeGroup {
    #[serde(
        rename = "fullInteractionType",
        default,
        deserialize_with = "null_as_default"
    )]
    pub interaction_types: Vec<InteractionType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionType {
    #[serde(
        rename = "interactionPair",
        default,
        deserialize_with = "null_as_default"
    )]
    pub pairs: Vec<InteractionPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionPair {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AllPropertiesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prop_concept_group: PropConceptGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropConceptGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prop_concept: Vec<PropConcept>,
}

/// One named property of a concept, e.g. `COLOR = WHITE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropConcept {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prop_name: String,
    #[serde(default)]
    pub prop_value: Option<String>,
}

// ============================================================================
// OPENFDA WIRE MODELS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LabelSearchResponse {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RawLabel>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLabel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub indications_and_usage: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precautions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

impl LabelSearchResponse {
    pub(crate) fn into_first_record(self) -> Option<LabelRecord> {
        if self.error.is_some() {
            return None;
        }
        self.results.into_iter().next().map(LabelRecord::from)
    }
}

/// The labeling fields the precaution summary draws from. Each is the first non-blank entry of
/// the corresponding openFDA array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRecord {
    pub indications_and_usage: Option<String>,
    pub precautions: Option<String>,
    pub warnings: Option<String>,
}

impl From<RawLabel> for LabelRecord {
    fn from(raw: RawLabel) -> Self {
        Self {
            indications_and_usage: first_text(raw.indications_and_usage),
            precautions: first_text(raw.precautions),
            warnings: first_text(raw.warnings),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
