//! # API Shared
//!
//! Shared request/response definitions for the medsafe APIs.
//!
//! Contains:
//! - Wire types for every endpoint (serde + OpenAPI schemas)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`; kept free of HTTP-framework types so other front ends can reuse them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod health;

pub use health::HealthService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body shared by the interaction and precaution endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamesReq {
    #[schema(example = json!(["Aspirin", "Warfarin"]))]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Interaction {
    pub description: String,
    pub severity: Option<String>,
}

/// Interaction check result.
///
/// `error` is only present when the check could not be completed, in which case `interactions`
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckInteractionsRes {
    pub interactions: Vec<Interaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Precaution {
    pub name: String,
    pub why: String,
    pub precautions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GetPrecautionsRes {
    pub data: Vec<Precaution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentifyPillReq {
    #[schema(example = "Advil")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentifyPillRes {
    pub id: String,
    pub name: String,
    pub imprint: String,
    pub color: String,
    pub shape: String,
    pub visual_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
