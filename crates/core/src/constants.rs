//! Constants used throughout the medsafe core crate.
//!
//! Upstream endpoints, defaults for runtime configuration and the placeholder texts shown to
//! users when labeling data is unavailable.

/// Default base URL of the RxNav REST API (RxNorm vocabulary and interactions).
pub const DEFAULT_RXNAV_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Default base URL of the openFDA API (drug labeling).
pub const DEFAULT_OPENFDA_BASE_URL: &str = "https://api.fda.gov";

/// Default per-request timeout for upstream calls, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default number of in-flight requests allowed per upstream service.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

/// Default minimum gap between request start times per upstream service, in milliseconds.
pub const DEFAULT_REQUEST_SPACING_MS: u64 = 0;

/// Largest batch of names accepted by a single aggregation call.
pub const MAX_NAMES_PER_REQUEST: usize = 50;

/// RxNorm term type for ingredient-level concepts.
pub const INGREDIENT_TERM_TYPE: &str = "IN";

/// Separator RxNav expects between ids in an interaction list query.
pub const INTERACTION_ID_SEPARATOR: &str = "+";

pub const NOT_FOUND_WHY: &str = "Information not found";
pub const NOT_FOUND_PRECAUTIONS: &str = "Consult your doctor.";
pub const MISSING_USAGE: &str = "Usage information not available.";
pub const MISSING_PRECAUTIONS: &str = "No specific precautions listed.";

/// Value used for pill attributes the vocabulary does not record.
pub const MISSING_ATTRIBUTE: &str = "N/A";
