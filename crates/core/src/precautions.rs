//! Per-drug precaution summaries from product labeling.
//!
//! Each name is looked up independently. A failed or empty lookup never removes the name from the
//! result: it produces a placeholder entry instead, so callers can always show one row per drug.

use crate::constants::{
    MAX_NAMES_PER_REQUEST, MISSING_PRECAUTIONS, MISSING_USAGE, NOT_FOUND_PRECAUTIONS,
    NOT_FOUND_WHY,
};
use crate::upstream::{LabelRecord, LabelSource};
use crate::{SafetyError, SafetyResult};
use futures_util::future::join_all;
use medsafe_types::DrugName;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecautionEntry {
    pub name: DrugName,
    pub why: String,
    pub precautions: String,
}

impl PrecautionEntry {
    /// Placeholder entry for a name with no usable labeling record.
    pub fn not_found(name: DrugName) -> Self {
        Self {
            name,
            why: NOT_FOUND_WHY.to_string(),
            precautions: NOT_FOUND_PRECAUTIONS.to_string(),
        }
    }

    /// Builds an entry from a labeling record.
    ///
    /// `precautions` falls back to the record's warnings, then to a fixed placeholder.
    pub fn from_label(name: DrugName, record: &LabelRecord) -> Self {
        let why = record
            .indications_and_usage
            .clone()
            .unwrap_or_else(|| MISSING_USAGE.to_string());
        let precautions = record
            .precautions
            .as_ref()
            .or(record.warnings.as_ref())
            .cloned()
            .unwrap_or_else(|| MISSING_PRECAUTIONS.to_string());

        Self {
            name,
            why,
            precautions,
        }
    }
}

#[derive(Clone)]
pub struct PrecautionAggregator {
    labels: Arc<dyn LabelSource>,
}

impl PrecautionAggregator {
    pub fn new(labels: Arc<dyn LabelSource>) -> Self {
        Self { labels }
    }

    /// Returns exactly one entry per name, in input order.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::InvalidInput` if more than [`MAX_NAMES_PER_REQUEST`] names are
    /// supplied. Individual lookup failures never produce an error.
    pub async fn get_precautions(&self, names: &[DrugName]) -> SafetyResult<Vec<PrecautionEntry>> {
        if names.len() > MAX_NAMES_PER_REQUEST {
            return Err(SafetyError::InvalidInput(format!(
                "at most {MAX_NAMES_PER_REQUEST} names can be looked up at once"
            )));
        }

        Ok(join_all(names.iter().map(|name| self.precaution_for(name))).await)
    }

    async fn precaution_for(&self, name: &DrugName) -> PrecautionEntry {
        if name.is_blank() {
            return PrecautionEntry::not_found(name.clone());
        }

        match self.labels.label_for_brand(name).await {
            Ok(record) => PrecautionEntry::from_label(name.clone(), &record),
            Err(SafetyError::NoDataUpstream) => {
                tracing::debug!(drug = %name, "no labeling record");
                PrecautionEntry::not_found(name.clone())
            }
            Err(err) => {
                tracing::warn!(drug = %name, error = %err, "labeling lookup failed");
                PrecautionEntry::not_found(name.clone())
            }
        }
    }
}
