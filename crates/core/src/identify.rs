//! Pill identification by name.
//!
//! Looks up the name-level concept and reports its recorded physical attributes together with a
//! one-line description for comparison against a pill in hand.

use crate::constants::MISSING_ATTRIBUTE;
use crate::resolver::IdentifierResolver;
use crate::upstream::{PropConcept, VocabularySource};
use crate::SafetyResult;
use medsafe_types::{ConceptId, DrugName};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PillIdentification {
    pub id: ConceptId,
    pub name: DrugName,
    pub imprint: String,
    pub color: String,
    pub shape: String,
    pub visual_description: String,
}

#[derive(Clone)]
pub struct PillIdentifier {
    resolver: IdentifierResolver,
    vocabulary: Arc<dyn VocabularySource>,
}

impl PillIdentifier {
    pub fn new(vocabulary: Arc<dyn VocabularySource>) -> Self {
        Self {
            resolver: IdentifierResolver::new(vocabulary.clone()),
            vocabulary,
        }
    }

    /// Identifies the pill sold under `name`.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Unresolved` if the name is not recognised, or the upstream error if
    /// either lookup fails.
    pub async fn identify(&self, name: &DrugName) -> SafetyResult<PillIdentification> {
        let id = self.resolver.resolve_name_concept(name).await?;
        let props = self.vocabulary.attributes_for(&id).await?;

        let imprint = attribute(&props, "IMPRINT");
        let color = attribute(&props, "COLOR");
        let shape = attribute(&props, "SHAPE");
        let visual_description = format!(
            "A {} {} pill with '{}' imprint.",
            color.to_lowercase(),
            shape.to_lowercase(),
            imprint
        );

        tracing::debug!(drug = %name, rxcui = %id, "identified pill");
        Ok(PillIdentification {
            id,
            name: name.clone(),
            imprint,
            color,
            shape,
            visual_description,
        })
    }
}

/// Value of the first property called `prop_name`, or `"N/A"` when absent or empty.
fn attribute(props: &[PropConcept], prop_name: &str) -> String {
    props
        .iter()
        .find(|p| p.prop_name == prop_name)
        .and_then(|p| p.prop_value.as_deref())
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING_ATTRIBUTE)
        .to_string()
}
