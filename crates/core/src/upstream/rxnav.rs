//! RxNav REST client (RxNorm vocabulary and drug interactions).

use super::{
    AllPropertiesResponse, InteractionListResponse, PropConcept, RelatedConcept, RelatedResponse,
    RxcuiResponse, VocabularySource,
};
use crate::config::SafetyConfig;
use crate::constants::{INGREDIENT_TERM_TYPE, INTERACTION_ID_SEPARATOR};
use crate::throttle::Throttle;
use crate::{SafetyError, SafetyResult};
use async_trait::async_trait;
use medsafe_types::{ConceptId, DrugName};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// HTTP client for the RxNav REST API.
///
/// Construct once per process and share behind an `Arc`; all requests go through a single
/// [`Throttle`].
#[derive(Debug)]
pub struct RxNavClient {
    http: reqwest::Client,
    base_url: String,
    throttle: Throttle,
}

impl RxNavClient {
    /// Creates a client using the RxNav base URL, timeout and throttling limits from `cfg`.
    ///
    /// # Errors
    ///
    /// Returns `SafetyError::Transport` if the underlying HTTP client cannot be built.
    pub fn new(cfg: &SafetyConfig) -> SafetyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.rxnav_base_url().to_string(),
            throttle: Throttle::from_config(cfg),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> SafetyResult<Option<T>> {
        self.throttle.run(fetch_json(request)).await
    }
}

/// Sends `request` and decodes the JSON body. A 404 is reported as `Ok(None)`.
async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> SafetyResult<Option<T>> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "rxnav response");

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SafetyError::Transport(format!(
            "RxNav returned HTTP {status}"
        )));
    }

    Ok(Some(response.json::<T>().await?))
}

#[async_trait]
impl VocabularySource for RxNavClient {
    async fn rxcui_for_name(&self, name: &DrugName) -> SafetyResult<Option<ConceptId>> {
        let request = self
            .http
            .get(format!("{}/rxcui.json", self.base_url))
            .query(&[("name", name.as_str())]);

        let body: Option<RxcuiResponse> = self.get_json(request).await?;
        Ok(body.and_then(RxcuiResponse::first_id))
    }

    async fn related_ingredients(&self, id: &ConceptId) -> SafetyResult<Vec<RelatedConcept>> {
        let request = self
            .http
            .get(format!("{}/rxcui/{}/related.json", self.base_url, id))
            .query(&[("tty", INGREDIENT_TERM_TYPE)]);

        let body: Option<RelatedResponse> = self.get_json(request).await?;
        Ok(body.map(RelatedResponse::primary_concepts).unwrap_or_default())
    }

    async fn interactions_for(&self, ids: &[ConceptId]) -> SafetyResult<InteractionListResponse> {
        // RxNav expects a literal `+` between ids, so the query is built by hand.
        let joined = ids
            .iter()
            .map(ConceptId::as_str)
            .collect::<Vec<_>>()
            .join(INTERACTION_ID_SEPARATOR);
        let request = self.http.get(format!(
            "{}/interaction/list.json?rxcuis={}",
            self.base_url, joined
        ));

        // A 404 is how RxNav reports that none of the ids interact.
        self.get_json(request)
            .await?
            .ok_or(SafetyError::NoDataUpstream)
    }

    async fn attributes_for(&self, id: &ConceptId) -> SafetyResult<Vec<PropConcept>> {
        let request = self
            .http
            .get(format!("{}/rxcui/{}/allProperties.json", self.base_url, id))
            .query(&[("prop", "attributes")]);

        let body: Option<AllPropertiesResponse> = self.get_json(request).await?;
        Ok(body
            .map(|b| b.prop_concept_group.prop_concept)
            .unwrap_or_default())
    }
}
