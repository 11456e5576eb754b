//! openFDA drug labeling client.

use super::{LabelRecord, LabelSearchResponse, LabelSource};
use crate::config::SafetyConfig;
use crate::throttle::Throttle;
use crate::{SafetyError, SafetyResult};
use async_trait::async_trait;
use medsafe_types::DrugName;
use reqwest::StatusCode;

#[derive(Debug)]
pub struct OpenFdaClient {
    http: reqwest::Client,
    base_url: String,
    throttle: Throttle,
}

impl OpenFdaClient {
    /// Creates a client using the openFDA base URL, timeout and throttling limits from `cfg`.
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
            base_url: cfg.openfda_base_url().to_string(),
            throttle: Throttle::from_config(cfg),
        })
    }

    /// Brand-name search expression for the label endpoint.
    pub fn brand_name_query(name: &DrugName) -> String {
        format!(
            "openfda.brand_name:\"{}\"",
            escape_query_value(name.as_str().trim())
        )
    }
}

/// Escapes characters that would terminate or corrupt a quoted openFDA search term.
fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn fetch_label(request: reqwest::RequestBuilder) -> SafetyResult<LabelRecord> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "openfda response");

    // openFDA answers "no matches" with 404 and an `error` body.
    if status == StatusCode::NOT_FOUND {
        return Err(SafetyError::NoDataUpstream);
    }
    if !status.is_success() {
        return Err(SafetyError::Transport(format!(
            "openFDA returned HTTP {status}"
        )));
    }

    let body: LabelSearchResponse = response.json().await?;
    body.into_first_record().ok_or(SafetyError::NoDataUpstream)
}

#[async_trait]
impl LabelSource for OpenFdaClient {
    async fn label_for_brand(&self, name: &DrugName) -> SafetyResult<LabelRecord> {
        let search = Self::brand_name_query(name);
        let request = self
            .http
            .get(format!("{}/drug/label.json", self.base_url))
            .query(&[("search", search.as_str()), ("limit", "1")]);

        self.throttle.run(fetch_label(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precautions::{PrecautionAggregator, PrecautionEntry};
    use crate::upstream::test_support::{spawn_upstream, test_cfg};
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    async fn label(Query(q): Query<HashMap<String, String>>) -> axum::response::Response {
        assert_eq!(q.get("limit").map(String::as_str), Some("1"));
        match q.get("search").map(String::as_str) {
            Some(r#"openfda.brand_name:"Advil""#) => Json(json!({
                "meta": {"results": {"total": 1}},
                "results": [{
                    "indications_and_usage": ["temporarily relieves minor aches and pains"],
                    "warnings": ["Allergy alert: ibuprofen may cause a severe allergic reaction"]
                }]
            }))
            .into_response(),
            Some(r#"openfda.brand_name:"Broken""#) => AxumStatus::BAD_GATEWAY.into_response(),
            Some(r#"openfda.brand_name:"Slowprofen""#) => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"results": [{"indications_and_usage": ["too late"]}]})).into_response()
            }
            _ => (
                AxumStatus::NOT_FOUND,
                Json(json!({"error": {"code": "NOT_FOUND", "message": "No matches found!"}})),
            )
                .into_response(),
        }
    }

    async fn client() -> OpenFdaClient {
        let app = Router::new().route("/drug/label.json", get(label));
        let base = spawn_upstream(app).await;
        OpenFdaClient::new(&test_cfg(&base, &base)).expect("client should build")
    }

    #[test]
    fn test_brand_name_query_escapes_quotes() {
        let query = OpenFdaClient::brand_name_query(&DrugName::from(r#" Dr. "Bob's" "#));
        assert_eq!(query, r#"openfda.brand_name:"Dr. \"Bob's\"""#);
    }

    #[tokio::test]
    async fn test_label_for_brand_reads_first_record() {
        let client = client().await;

        let record = client
            .label_for_brand(&DrugName::from("Advil"))
            .await
            .expect("search should succeed");

        assert_eq!(
            record.indications_and_usage.as_deref(),
            Some("temporarily relieves minor aches and pains")
        );
        assert_eq!(record.precautions, None);
        assert!(record.warnings.is_some());
    }

    #[tokio::test]
    async fn test_label_for_brand_tags_not_found_as_no_data() {
        let client = client().await;

        let err = client
            .label_for_brand(&DrugName::from("Xyzzyplex"))
            .await
            .expect_err("no match carries the no-data tag");
        assert_eq!(err, SafetyError::NoDataUpstream);
    }

    #[tokio::test]
    async fn test_timed_out_label_lookup_gets_placeholder_entry() {
        let client = client().await;

        let err = client
            .label_for_brand(&DrugName::from("Slowprofen"))
            .await
            .expect_err("lookup should time out");
        assert!(matches!(&err, SafetyError::Transport(msg) if msg.starts_with("request timed out")));

        let aggregator = PrecautionAggregator::new(Arc::new(client));
        let entries = aggregator
            .get_precautions(&[DrugName::from("Slowprofen"), DrugName::from("Advil")])
            .await
            .expect("a timeout never fails the batch");

        assert_eq!(entries[0], PrecautionEntry::not_found(DrugName::from("Slowprofen")));
        assert_eq!(entries[1].why, "temporarily relieves minor aches and pains");
    }

    #[tokio::test]
    async fn test_label_for_brand_reports_upstream_failure() {
        let client = client().await;

        let err = client
            .label_for_brand(&DrugName::from("Broken"))
            .await
            .expect_err("502 should fail");
        assert!(matches!(err, SafetyError::Transport(_)));
    }
}
