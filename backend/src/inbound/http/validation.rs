//! Validation adapter for request bodies, path segments, and query strings.
//!
//! A request *shape* is a type deriving `serde::Deserialize` and
//! `validator::Validate`. Constrained fields are declared as `Option` so a
//! missing field is reported by its `required` rule instead of aborting
//! deserialisation, which lets one response list every failing field.
//!
//! Bodies and query strings are decoded member by member when the whole
//! input does not fit the shape: a member whose value has the wrong type
//! gets its own issue and the remaining members are still checked. Only a
//! payload that is not a JSON object at all is reported on [`WHOLE_BODY`].
//!
//! Handlers call one of [`validate_body`], [`validate_params`], or
//! [`validate_search_params`] and unwrap the result with [`validated!`]:
//!
//! ```
//! use actix_web::{HttpResponse, web};
//! use crud_backend::domain::{ApiResult, FieldIssue};
//! use crud_backend::inbound::http::validation::{Shape, required, validate_body};
//! use crud_backend::validated;
//! use serde::Deserialize;
//! use validator::Validate;
//!
//! #[derive(Deserialize, Validate)]
//! struct Rename {
//!     #[validate(required(message = "required"), length(min = 1, max = 40))]
//!     name: Option<String>,
//! }
//!
//! impl Shape for Rename {
//!     type Output = String;
//!
//!     fn into_valid(self) -> Result<String, Vec<FieldIssue>> {
//!         let mut issues = Vec::new();
//!         required("name", self.name, &mut issues).ok_or(issues)
//!     }
//! }
//!
//! async fn rename(body: web::Bytes) -> ApiResult<HttpResponse> {
//!     let name = validated!(validate_body::<Rename>(&body));
//!     Ok(HttpResponse::Ok().body(name))
//! }
//! ```

use std::borrow::Cow;
use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{Error, FieldIssue};
use crate::inbound::http::error::render_error;

/// A declared request shape.
pub trait Shape: DeserializeOwned + Validate {
    /// Fully typed data handed to the handler.
    type Output;

    /// Convert the decoded shape into typed data.
    ///
    /// Runs even when declared constraints failed, so checks that only
    /// code can express are reported in the same response. Issues for a
    /// field that already failed a declared rule are dropped, which lets
    /// implementations report missing fields with [`required`] freely.
    ///
    /// # Errors
    /// Returns field issues for anything the declarative rules cannot
    /// express.
    fn into_valid(self) -> Result<Self::Output, Vec<FieldIssue>>;
}

/// Outcome of validating one request part.
#[derive(Debug)]
pub enum ValidationResult<T> {
    /// Input satisfied the shape.
    Success {
        /// Typed data.
        data: T,
    },
    /// Input was rejected; `response` is the finished 400 envelope.
    Failure {
        /// Response to return verbatim.
        response: HttpResponse,
    },
}

impl<T> ValidationResult<T> {
    /// Convert into a `Result`, keeping the failure response.
    ///
    /// # Errors
    /// Returns the ready-made failure response.
    pub fn into_result(self) -> Result<T, HttpResponse> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { response } => Err(response),
        }
    }

    /// Whether validation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Unwrap a [`ValidationResult`] inside a handler returning
/// `Result<HttpResponse, _>`, returning the failure response as the
/// handler's `Ok` value.
#[macro_export]
macro_rules! validated {
    ($result:expr) => {
        match $result {
            $crate::inbound::http::validation::ValidationResult::Success { data } => data,
            $crate::inbound::http::validation::ValidationResult::Failure { response } => {
                return Ok(response);
            }
        }
    };
}

/// Field name for a body that cannot be read as a JSON object.
pub const WHOLE_BODY: &str = "$";

/// Take a required value, noting an issue for `field` when it is absent.
pub fn required<T>(field: &str, value: Option<T>, issues: &mut Vec<FieldIssue>) -> Option<T> {
    if value.is_none() {
        issues.push(FieldIssue::new(field, "required"));
    }
    value
}

/// Validate a JSON body. An empty body is treated as `{}`.
pub fn validate_body<S: Shape>(body: &[u8]) -> ValidationResult<S::Output> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    let members: Vec<(String, Value)> = match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(object)) => object.into_iter().collect(),
        Ok(_) => return reject(vec![FieldIssue::new(WHOLE_BODY, "must be a JSON object")]),
        Err(err) => return reject(vec![FieldIssue::new(WHOLE_BODY, describe_json_error(&err))]),
    };
    let decoded = decode_members(&members, |members| {
        serde_json::from_value::<S>(Value::Object(members.iter().cloned().collect()))
            .map_err(|err| err.to_string())
    });
    match decoded {
        Ok((shape, issues)) => check(shape, issues),
        Err(reason) => reject(vec![FieldIssue::new(
            WHOLE_BODY,
            format!("has an unexpected shape: {reason}"),
        )]),
    }
}

/// Validate the matched path segments.
pub fn validate_params<S: Shape>(req: &HttpRequest) -> ValidationResult<S::Output> {
    match req.match_info().load::<S>() {
        Ok(shape) => check(shape, Vec::new()),
        Err(err) => reject(vec![FieldIssue::new("path", err.to_string())]),
    }
}

/// Validate the query string.
pub fn validate_search_params<S: Shape>(req: &HttpRequest) -> ValidationResult<S::Output> {
    let pairs: Vec<(String, &str)> = req
        .query_string()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let name = pair.split_once('=').map_or(pair, |(name, _)| name);
            (name.to_owned(), pair)
        })
        .collect();
    let decoded = decode_members(&pairs, |pairs| {
        let query: Vec<&str> = pairs.iter().map(|(_, pair)| *pair).collect();
        web::Query::<S>::from_query(&query.join("&"))
            .map(web::Query::into_inner)
            .map_err(|err| err.to_string())
    });
    match decoded {
        Ok((shape, issues)) => check(shape, issues),
        Err(reason) => reject(vec![FieldIssue::new("query", reason)]),
    }
}

/// Decode named members into `S`.
///
/// When the full set does not decode, each member is tried on its own and
/// those that fail alone are set aside with an issue under their name.
/// This needs a shape that accepts an empty input; otherwise, or when the
/// remaining members still fail together, the first error is returned.
fn decode_members<S, M: Clone>(
    members: &[(String, M)],
    decode: impl Fn(&[(String, M)]) -> Result<S, String>,
) -> Result<(S, Vec<FieldIssue>), String> {
    let first = match decode(members) {
        Ok(shape) => return Ok((shape, Vec::new())),
        Err(reason) => reason,
    };
    if decode(&[]).is_err() {
        return Err(first);
    }
    let mut kept = Vec::with_capacity(members.len());
    let mut issues = Vec::new();
    for member in members {
        match decode(std::slice::from_ref(member)) {
            Ok(_) => kept.push(member.clone()),
            Err(reason) => issues.push(FieldIssue::new(
                member.0.as_str(),
                format!("is malformed: {reason}"),
            )),
        }
    }
    decode(&kept).map(|shape| (shape, issues)).map_err(|_| first)
}

/// Run declared constraints and `into_valid`, adding each source's issues
/// only for fields no earlier source reported.
fn check<S: Shape>(shape: S, mut issues: Vec<FieldIssue>) -> ValidationResult<S::Output> {
    if let Err(errors) = shape.validate() {
        merge(&mut issues, collect_issues(&errors));
    }
    match shape.into_valid() {
        Ok(data) if issues.is_empty() => ValidationResult::Success { data },
        Ok(_) => reject(issues),
        Err(late) => {
            merge(&mut issues, late);
            reject(issues)
        }
    }
}

fn merge(issues: &mut Vec<FieldIssue>, more: Vec<FieldIssue>) {
    let known: HashSet<String> = issues.iter().map(|issue| issue.field.clone()).collect();
    issues.extend(more.into_iter().filter(|issue| !known.contains(&issue.field)));
}

fn reject<T>(mut issues: Vec<FieldIssue>) -> ValidationResult<T> {
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    let fields: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
    debug!(?fields, "request rejected by validation");
    ValidationResult::Failure {
        response: render_error(&Error::validation(issues)),
    }
}

/// One issue per failed constraint, ordered by field name.
fn collect_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures
                .iter()
                .map(move |failure| FieldIssue::new(field.to_string(), describe(failure)))
        })
        .collect();
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

fn describe(failure: &ValidationError) -> String {
    if let Some(message) = &failure.message {
        return message.to_string();
    }
    let text: Cow<'_, str> = match failure.code.as_ref() {
        "required" => "required".into(),
        "length" => "has an invalid length".into(),
        "range" => "is out of range".into(),
        "email" => "must be an email address".into(),
        other => format!("failed `{other}` check").into(),
    };
    text.into_owned()
}

fn describe_json_error(err: &serde_json::Error) -> String {
    use serde_json::error::Category;
    match err.classify() {
        Category::Syntax | Category::Eof => "must be valid JSON".to_owned(),
        Category::Data => format!("has an unexpected shape: {err}"),
        Category::Io => "could not be read".to_owned(),
    }
}

/// Shared custom rule: value parses as a UUID.
pub(crate) fn uuid_format(value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value).map(drop).map_err(|_| {
        let mut failure = ValidationError::new("uuid");
        failure.message = Some(Cow::Borrowed("must be a UUID"));
        failure
    })
}
