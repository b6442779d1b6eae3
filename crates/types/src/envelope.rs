//! Uniform JSON envelope for API replies.
//!
//! Every reply has the shape `{statusCode, message, data, errors}`; the
//! extended form adds `actionRequired`. `data` is `null` on every error path.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

/// Classification carried in an envelope's `statusCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    Ok,
    /// The request has been accepted for further processing.
    Accepted,
    BadRequest,
    SessionExpired,
    NotFound,
    UnsupportedMediaType,
    Error,
}

impl ResultType {
    /// Numeric status code of the classification.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Accepted => 202,
            Self::BadRequest => 400,
            Self::SessionExpired => 401,
            Self::NotFound => 404,
            Self::UnsupportedMediaType => 415,
            Self::Error => 500,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "Ok",
            Self::Accepted => "Accepted",
            Self::BadRequest => "Bad Request",
            Self::SessionExpired => "Session Expired",
            Self::NotFound => "Resource Not Found",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::Error => "Server Error",
        }
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

const SERVER_ERROR: &str = "Server error";

/// Response wrapper parameterized by its payload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    pub status_code: String,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_required: Option<bool>,
}

impl<T> ResponseEnvelope<T> {
    /// General constructor; every other constructor funnels through here.
    pub fn new(
        kind: ResultType,
        message: impl Into<String>,
        data: Option<T>,
        errors: Option<Vec<String>>,
    ) -> Self {
        Self {
            status_code: kind.to_string(),
            message: message.into(),
            data,
            errors,
            action_required: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(ResultType::Ok, "Success", Some(data), None)
    }

    /// Success without a payload.
    #[must_use]
    pub fn empty_success() -> Self {
        Self::new(ResultType::Ok, "Success", None, None)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ResultType::NotFound, "No results found.", None, None)
    }

    #[must_use]
    pub fn session_expired() -> Self {
        Self::new(ResultType::SessionExpired, "Session Expired.", None, None)
    }

    /// One error per invalid field: the first message of each, fields
    /// without messages skipped.
    pub fn from_validation_errors<I, K, E>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        E: AsRef<[String]>,
    {
        let errors = fields
            .into_iter()
            .filter_map(|(_, errs)| errs.as_ref().first().cloned())
            .collect();
        Self::new(ResultType::BadRequest, "Invalid data", None, Some(errors))
    }

    /// Server error carrying the error's message and its immediate source.
    pub fn from_error(err: &(dyn StdError + 'static), message: impl Into<String>) -> Self {
        let mut errors = vec![err.to_string()];
        if let Some(inner) = err.source() {
            errors.push(inner.to_string());
        }
        Self::new(ResultType::Error, message, None, Some(errors))
    }

    pub fn from_error_default(err: &(dyn StdError + 'static)) -> Self {
        Self::from_error(err, SERVER_ERROR)
    }

    /// Error reply whose single error is `message`; defaults to a server error.
    pub fn from_message(message: impl Into<String>, kind: Option<ResultType>) -> Self {
        let message = message.into();
        Self::new(
            kind.unwrap_or(ResultType::Error),
            message.clone(),
            None,
            Some(vec![message]),
        )
    }

    /// Server error in the extended form, flagging whether the caller must act.
    pub fn with_action(message: impl Into<String>, action_required: bool) -> Self {
        let mut envelope = Self::from_message(message, None);
        envelope.action_required = Some(action_required);
        envelope
    }

    /// Server error from an identity-store error list.
    ///
    /// Returns `None` when the list is present but empty.
    #[must_use]
    pub fn from_identity_errors(errors: Option<Vec<String>>) -> Option<Self> {
        match errors {
            None => Some(Self::new(ResultType::Error, SERVER_ERROR, None, None)),
            Some(errs) if errs.is_empty() => None,
            Some(errs) => Some(Self::new(ResultType::Error, SERVER_ERROR, None, Some(errs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[test]
    fn test_success() {
        let env = ResponseEnvelope::success(42);
        assert_eq!(env.status_code, "200");
        assert_eq!(env.message, "Success");
        assert_eq!(env.data, Some(42));
        assert!(env.errors.is_none());
    }

    #[test]
    fn test_success_wire_format_omits_action() {
        let v = serde_json::to_value(ResponseEnvelope::success("x")).unwrap();
        assert_eq!(
            v,
            json!({"statusCode": "200", "message": "Success", "data": "x", "errors": null})
        );
    }

    #[test]
    fn test_not_found_and_session_expired() {
        let nf = ResponseEnvelope::<()>::not_found();
        assert_eq!(nf.status_code, "404");
        assert!(nf.data.is_none());
        let se = ResponseEnvelope::<()>::session_expired();
        assert_eq!(se.status_code, "401");
        assert_eq!(se.message, "Session Expired.");
    }

    #[test]
    fn test_validation_errors_first_message_only() {
        let mut fields = BTreeMap::new();
        fields.insert("email", vec!["required".to_string(), "too short".to_string()]);
        fields.insert("name", vec![]);
        fields.insert("zip", vec!["not numeric".to_string()]);
        let env = ResponseEnvelope::<()>::from_validation_errors(fields);
        assert_eq!(env.status_code, "400");
        assert_eq!(env.message, "Invalid data");
        assert_eq!(
            env.errors,
            Some(vec!["required".to_string(), "not numeric".to_string()])
        );
    }

    #[test]
    fn test_from_error_includes_source() {
        let err = Outer {
            inner: std::io::Error::other("disk gone"),
        };
        let env = ResponseEnvelope::<()>::from_error(&err, "write failed");
        assert_eq!(env.status_code, "500");
        assert_eq!(env.message, "write failed");
        assert_eq!(
            env.errors,
            Some(vec!["outer failure".to_string(), "disk gone".to_string()])
        );
    }

    #[test]
    fn test_from_error_default_message() {
        let err = std::io::Error::other("boom");
        let env = ResponseEnvelope::<()>::from_error_default(&err);
        assert_eq!(env.message, "Server error");
        assert_eq!(env.errors, Some(vec!["boom".to_string()]));
    }

    #[test]
    fn test_from_message_status() {
        let env = ResponseEnvelope::<()>::from_message("nope", None);
        assert_eq!(env.status_code, "500");
        assert_eq!(env.errors, Some(vec!["nope".to_string()]));

        let env = ResponseEnvelope::<()>::from_message("bad type", Some(ResultType::UnsupportedMediaType));
        assert_eq!(env.status_code, "415");
    }

    #[test]
    fn test_with_action_serializes_flag() {
        let env = ResponseEnvelope::<()>::with_action("restore needed", true);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["actionRequired"], true);
        assert_eq!(v["statusCode"], "500");
        assert!(v["data"].is_null());
    }

    #[test]
    fn test_identity_errors() {
        let env = ResponseEnvelope::<()>::from_identity_errors(None).unwrap();
        assert_eq!(env.status_code, "500");
        assert!(env.errors.is_none());

        assert!(ResponseEnvelope::<()>::from_identity_errors(Some(vec![])).is_none());

        let env =
            ResponseEnvelope::<()>::from_identity_errors(Some(vec!["taken".into()])).unwrap();
        assert_eq!(env.errors, Some(vec!["taken".to_string()]));
    }

    #[test]
    fn test_result_type_descriptions() {
        assert_eq!(ResultType::Accepted.code(), 202);
        assert_eq!(ResultType::NotFound.description(), "Resource Not Found");
        assert_eq!(ResultType::Error.to_string(), "500");
    }
}
