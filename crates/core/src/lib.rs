//! # Medsafe Core
//!
//! Core business logic for the medication-safety pipeline.
//!
//! This crate turns free-text drug names into safety information using public drug-data services:
//! - Identifier resolution (name -> RxNorm concept -> ingredient concept)
//! - Pairwise interaction warnings across a medication list
//! - Per-drug precaution summaries from product labeling
//! - Pill identification by name
//!
//! **No API concerns**: HTTP servers, request bodies and status codes belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod identify;
pub mod interactions;
pub mod precautions;
pub mod resolver;
pub mod throttle;
pub mod upstream;

pub use config::SafetyConfig;
pub use error::{SafetyError, SafetyResult};
pub use identify::{PillIdentification, PillIdentifier};
pub use interactions::{InteractionAggregator, InteractionWarning};
pub use medsafe_types::{ConceptId, DrugName};
pub use precautions::{PrecautionAggregator, PrecautionEntry};
pub use resolver::IdentifierResolver;

use std::sync::Arc;
use upstream::{LabelSource, OpenFdaClient, RxNavClient, VocabularySource};

/// Entry point bundling the aggregators over one shared pair of upstream clients.
///
/// Cheap to clone; construct once per process and hand clones to request handlers.
#[derive(Clone)]
pub struct SafetyService {
    interactions: InteractionAggregator,
    precautions: PrecautionAggregator,
    identifier: PillIdentifier,
}

impl SafetyService {
    /// Creates a service talking to the RxNav and openFDA endpoints in `cfg`.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Transport` if an HTTP client cannot be built.
    pub fn new(cfg: Arc<SafetyConfig>) -> SafetyResult<Self> {
        let vocabulary = Arc::new(RxNavClient::new(&cfg)?);
        let labels = Arc::new(OpenFdaClient::new(&cfg)?);
        Ok(Self::with_sources(vocabulary, labels))
    }

    /// Creates a service over arbitrary sources. Used by tests and alternative backends.
    pub fn with_sources(
        vocabulary: Arc<dyn VocabularySource>,
        labels: Arc<dyn LabelSource>,
    ) -> Self {
        Self {
            interactions: InteractionAggregator::new(vocabulary.clone()),
            precautions: PrecautionAggregator::new(labels),
            identifier: PillIdentifier::new(vocabulary),
        }
    }

    pub async fn check_interactions(
        &self,
        names: &[DrugName],
    ) -> SafetyResult<Vec<InteractionWarning>> {
        self.interactions.check_interactions(names).await
    }

    pub async fn get_precautions(&self, names: &[DrugName]) -> SafetyResult<Vec<PrecautionEntry>> {
        self.precautions.get_precautions(names).await
    }

    pub async fn identify_pill(&self, name: &DrugName) -> SafetyResult<PillIdentification> {
        self.identifier.identify(name).await
    }
}
