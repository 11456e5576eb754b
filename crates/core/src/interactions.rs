//! Pairwise interaction checking across a medication list.
//!
//! Every name is resolved concurrently to an ingredient-level concept; names that do not resolve
//! are dropped silently. The surviving ids (deduplicated, first occurrence kept) are sent to the
//! interaction service in a single batch query and the nested response is flattened into one
//! warning per interaction type.

use crate::constants::MAX_NAMES_PER_REQUEST;
use crate::resolver::IdentifierResolver;
use crate::upstream::{InteractionListResponse, VocabularySource};
use crate::{SafetyError, SafetyResult};
use futures_util::future::join_all;
use medsafe_types::{ConceptId, DrugName};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// One interaction reported by the upstream service.
///
/// The service does not reliably say which two drugs a warning concerns, so only the free-text
/// description and severity are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionWarning {
    pub description: String,
    pub severity: Option<String>,
}

#[derive(Clone)]
pub struct InteractionAggregator {
    resolver: IdentifierResolver,
    vocabulary: Arc<dyn VocabularySource>,
}

impl InteractionAggregator {
    pub fn new(vocabulary: Arc<dyn VocabularySource>) -> Self {
        Self {
            resolver: IdentifierResolver::new(vocabulary.clone()),
            vocabulary,
        }
    }

    /// Returns the interaction warnings among `names`.
    ///
    /// Fewer than two names, or fewer than two distinct resolved concepts, yields an empty list
    /// without querying the interaction service. A 404 from the service also yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::InvalidInput` if more than [`MAX_NAMES_PER_REQUEST`] names are
    /// supplied, or the upstream error if the interaction query fails.
    pub async fn check_interactions(
        &self,
        names: &[DrugName],
    ) -> SafetyResult<Vec<InteractionWarning>> {
        if names.len() > MAX_NAMES_PER_REQUEST {
            return Err(SafetyError::InvalidInput(format!(
                "at most {MAX_NAMES_PER_REQUEST} names can be checked at once"
            )));
        }
        if names.len() < 2 {
            return Ok(Vec::new());
        }

        let ids = self.resolve_all(names).await;
        if ids.len() < 2 {
            tracing::debug!(
                requested = names.len(),
                resolved = ids.len(),
                "not enough resolved drugs for an interaction check"
            );
            return Ok(Vec::new());
        }

        match self.vocabulary.interactions_for(&ids).await {
            Ok(body) => Ok(flatten_interactions(body)),
            Err(SafetyError::NoDataUpstream) => {
                tracing::debug!(drugs = ids.len(), "no known interactions");
                Ok(Vec::new())
            }
            Err(err) => {
                tracing::error!(error = %err, "interaction check failed");
                Err(err)
            }
        }
    }

    /// Resolves every name concurrently, keeping input order and dropping unresolved names and
    /// repeated concepts.
    async fn resolve_all(&self, names: &[DrugName]) -> Vec<ConceptId> {
        let resolved = join_all(
            names
                .iter()
                .map(|name| self.resolver.resolve_ingredient_concept(name)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(resolved.len());
        for (name, result) in names.iter().zip(resolved) {
            match result {
                Ok(id) => {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                Err(SafetyError::Unresolved(_)) => {
                    tracing::debug!(drug = %name, "drug name did not resolve");
                }
                Err(err) => {
                    tracing::warn!(drug = %name, error = %err, "drug resolution failed");
                }
            }
        }
        ids
    }
}

/// Flattens the grouped interaction response into one warning per interaction type.
///
/// Only the first description/severity pair of each type is used. Source order is kept and no
/// de-duplication is applied. Types with no pairs are skipped.
pub fn flatten_interactions(body: InteractionListResponse) -> Vec<InteractionWarning> {
    body.groups
        .into_iter()
        .flat_map(|group| group.interaction_types)
        .filter_map(|interaction_type| interaction_type.pairs.into_iter().next())
        .map(|pair| InteractionWarning {
            description: pair.description.unwrap_or_default(),
            severity: pair.severity,
        })
        .collect()
}
