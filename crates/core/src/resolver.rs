//! Drug name resolution.
//!
//! Users type brand names, but interaction data is indexed by active ingredient. Resolution is
//! therefore two hops against the vocabulary:
//!
//! 1. free-text name -> name-level concept (`rxcui.json?name=`)
//! 2. name-level concept -> ingredient-level concept (`related.json?tty=IN`)
//!
//! When the second hop finds no ingredient the name-level concept is used instead, since an
//! approximate match is preferred to no match. Failures at either hop make that one name
//! unresolved; callers batching several names must not let it affect the others.

use crate::upstream::VocabularySource;
use crate::{SafetyError, SafetyResult};
use medsafe_types::{ConceptId, DrugName};
use std::sync::Arc;

#[derive(Clone)]
pub struct IdentifierResolver {
    vocabulary: Arc<dyn VocabularySource>,
}

impl IdentifierResolver {
    pub fn new(vocabulary: Arc<dyn VocabularySource>) -> Self {
        Self { vocabulary }
    }

    /// Resolves `name` to its name-level concept.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Unresolved` if the name is blank or not recognised by the
    /// vocabulary, or the upstream error if the lookup itself failed.
    pub async fn resolve_name_concept(&self, name: &DrugName) -> SafetyResult<ConceptId> {
        if name.is_blank() {
            return Err(SafetyError::Unresolved(name.to_string()));
        }

        match self.vocabulary.rxcui_for_name(name).await? {
            Some(id) => Ok(id),
            None => Err(SafetyError::Unresolved(name.to_string())),
        }
    }

    /// Resolves `name` to the concept best suited for interaction checking.
    ///
    /// The first ingredient listed in the primary related-concept group wins; no ranking is
    /// attempted for combination products. If no ingredient is listed, the name-level concept is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Unresolved` for unrecognised names, or the upstream error from
    /// whichever hop failed.
    pub async fn resolve_ingredient_concept(&self, name: &DrugName) -> SafetyResult<ConceptId> {
        let name_level = self.resolve_name_concept(name).await?;

        let related = self.vocabulary.related_ingredients(&name_level).await?;
        match related.into_iter().next() {
            Some(ingredient) => {
                tracing::debug!(
                    drug = %name,
                    rxcui = %name_level,
                    ingredient = %ingredient.rxcui,
                    ingredient_name = %ingredient.name,
                    "resolved ingredient concept"
                );
                Ok(ConceptId::new(ingredient.rxcui))
            }
            None => {
                tracing::debug!(
                    drug = %name,
                    rxcui = %name_level,
                    "no ingredient concept, using name-level concept"
                );
                Ok(name_level)
            }
        }
    }
}
