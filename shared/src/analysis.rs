use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENERIC_ANALYSIS_ERROR: &str = "Error analyzing image. Please try again.";
const ANALYZE_PATH: &str = "/analyze";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageData")]
    pub image_data: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Analysis endpoint is not configured")]
    MissingEndpoint,
    #[error("An analysis is already running")]
    InFlight,
    // Transport and status failures share one user-facing message; the
    // detail is only for logs.
    #[error("{}", GENERIC_ANALYSIS_ERROR)]
    Transport(String),
    #[error("{}", GENERIC_ANALYSIS_ERROR)]
    Status(u16),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    InFlight,
    Result(String),
    Error(String),
}

impl AnalysisState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, AnalysisState::InFlight)
    }

    /// Claims the single request slot and returns the URL to post to.
    ///
    /// A second call while a request is running is rejected without touching
    /// the state. A missing endpoint is reported as an error without any
    /// network attempt.
    pub fn begin(&mut self, endpoint_base: Option<&str>) -> Result<String, AnalysisError> {
        if self.is_in_flight() {
            return Err(AnalysisError::InFlight);
        }
        match analyze_url(endpoint_base) {
            Ok(url) => {
                *self = AnalysisState::InFlight;
                Ok(url)
            }
            Err(error) => {
                *self = AnalysisState::Error(error.to_string());
                Err(error)
            }
        }
    }

    pub fn finish(&mut self, outcome: Result<String, AnalysisError>) {
        *self = match outcome {
            Ok(text) => AnalysisState::Result(text),
            Err(error) => AnalysisState::Error(error.to_string()),
        };
    }

    /// Hides a shown result or error. A running request is left alone.
    pub fn dismiss(&mut self) {
        if !self.is_in_flight() {
            *self = AnalysisState::Idle;
        }
    }
}

pub fn analyze_url(endpoint_base: Option<&str>) -> Result<String, AnalysisError> {
    let base = endpoint_base
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .ok_or(AnalysisError::MissingEndpoint)?;
    Ok(format!("{}{ANALYZE_PATH}", base.trim_end_matches('/')))
}

/// Classifies an HTTP reply from the analysis endpoint.
pub fn interpret_response(status: u16, body: &str) -> Result<String, AnalysisError> {
    if !(200..300).contains(&status) {
        return Err(AnalysisError::Status(status));
    }
    let response = serde_json::from_str::<AnalyzeResponse>(body)
        .map_err(|error| AnalysisError::Transport(format!("invalid response body: {error}")))?;
    if let Some(error) = response.error.filter(|error| !error.trim().is_empty()) {
        return Err(AnalysisError::Rejected(error));
    }
    response
        .result
        .ok_or_else(|| AnalysisError::Transport("response carried no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_field() {
        let request = AnalyzeRequest {
            image_data: "data:image/png;base64,AAAA".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"imageData":"data:image/png;base64,AAAA"}"#);
    }

    #[test]
    fn missing_endpoint_fails_before_flight() {
        let mut state = AnalysisState::Idle;
        assert_eq!(state.begin(None), Err(AnalysisError::MissingEndpoint));
        assert_eq!(
            state,
            AnalysisState::Error("Analysis endpoint is not configured".into())
        );
        assert_eq!(state.begin(Some("   ")), Err(AnalysisError::MissingEndpoint));
    }

    #[test]
    fn second_begin_is_rejected_while_in_flight() {
        let mut state = AnalysisState::Idle;
        let mut issued = Vec::new();
        for _ in 0..2 {
            if let Ok(url) = state.begin(Some("http://localhost:8080/")) {
                issued.push(url);
            }
        }
        assert_eq!(issued, vec!["http://localhost:8080/analyze".to_string()]);
        assert!(state.is_in_flight());

        state.finish(Ok("x = 2".into()));
        assert_eq!(state, AnalysisState::Result("x = 2".into()));
        assert!(state.begin(Some("http://localhost:8080")).is_ok());
    }

    #[test]
    fn error_field_with_ok_status_is_an_error() {
        let outcome = interpret_response(200, r#"{"error":"no content detected"}"#);
        assert_eq!(
            outcome,
            Err(AnalysisError::Rejected("no content detected".into()))
        );

        let mut state = AnalysisState::InFlight;
        state.finish(outcome);
        assert_eq!(state, AnalysisState::Error("no content detected".into()));
    }

    #[test]
    fn empty_error_field_is_ignored() {
        let outcome = interpret_response(200, r#"{"result":"42","error":""}"#);
        assert_eq!(outcome, Ok("42".into()));
    }

    #[test]
    fn non_success_status_uses_generic_message() {
        let outcome = interpret_response(500, r#"{"error":"upstream exploded"}"#);
        assert_eq!(outcome, Err(AnalysisError::Status(500)));
        assert_eq!(
            outcome.unwrap_err().to_string(),
            GENERIC_ANALYSIS_ERROR
        );
    }

    #[test]
    fn transport_detail_stays_out_of_user_message() {
        let error = AnalysisError::Transport("connection reset".into());
        assert_eq!(error.to_string(), GENERIC_ANALYSIS_ERROR);
        assert_eq!(AnalysisError::Status(404).to_string(), GENERIC_ANALYSIS_ERROR);
    }

    #[test]
    fn garbage_body_is_a_transport_error() {
        let outcome = interpret_response(200, "<html>bad gateway</html>");
        assert!(matches!(outcome, Err(AnalysisError::Transport(_))));
        assert!(matches!(
            interpret_response(200, "{}"),
            Err(AnalysisError::Transport(_))
        ));
    }

    #[test]
    fn dismiss_keeps_running_request() {
        let mut state = AnalysisState::InFlight;
        state.dismiss();
        assert!(state.is_in_flight());

        let mut state = AnalysisState::Error("boom".into());
        state.dismiss();
        assert_eq!(state, AnalysisState::Idle);
    }
}
