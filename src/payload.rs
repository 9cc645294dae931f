//! Request body decoding shared by every write endpoint.
//!
//! Clients may post either JSON objects or URL-encoded forms. [`Payload`]
//! flattens both into one field map so the per-endpoint request types never
//! have to care which encoding arrived.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::AppError;

/// A single decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    /// JSON booleans, arrays and objects; rejected when read.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Json,
    Form,
}

impl Encoding {
    fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("application/json") {
            Some(Self::Json)
        } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Some(Self::Form)
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Payload {
    fields: HashMap<String, FieldValue>,
}

impl Payload {
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::bad_request(format!("invalid JSON body: {e}")))?;
        let Value::Object(map) = value else {
            return Err(AppError::bad_request("JSON body must be an object"));
        };

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| {
                let field = match value {
                    Value::Null => return None,
                    Value::String(s) => FieldValue::Text(s),
                    Value::Number(n) => FieldValue::Number(n),
                    Value::Bool(_) | Value::Array(_) | Value::Object(_) => FieldValue::Unsupported,
                };
                Some((key, field))
            })
            .collect();
        Ok(Self { fields })
    }

    pub fn from_form(body: &[u8]) -> Result<Self, AppError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::bad_request(format!("invalid form body: {e}")))?;
        // later duplicates overwrite earlier ones
        let fields = pairs
            .into_iter()
            .map(|(key, value)| (key, FieldValue::Text(value)))
            .collect();
        Ok(Self { fields })
    }

    /// Decodes `body` according to `content_type`. Unknown or missing
    /// content types yield an empty payload rather than an error.
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, AppError> {
        match content_type.and_then(Encoding::from_content_type) {
            Some(Encoding::Json) => Self::from_json(body),
            Some(Encoding::Form) => Self::from_form(body),
            None => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A plain string field. Numbers are not coerced to text.
    pub fn text(&self, name: &str) -> Result<Option<&str>, AppError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(AppError::bad_request(format!("{name} must be a string"))),
        }
    }

    /// Like [`Payload::text`] but trims whitespace and treats blank as absent.
    pub fn non_blank_text(&self, name: &str) -> Result<Option<&str>, AppError> {
        Ok(self.text(name)?.map(str::trim).filter(|s| !s.is_empty()))
    }

    /// An integer given either as a JSON number or as a numeric string.
    pub fn integer<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: TryFrom<i64> + std::str::FromStr,
    {
        let invalid = || AppError::bad_request(format!("{name} must be an integer"));
        match self.fields.get(name) {
            None => Ok(None),
            Some(FieldValue::Number(n)) => integral(n)
                .and_then(|v| T::try_from(v).ok())
                .map(Some)
                .ok_or_else(invalid),
            Some(FieldValue::Text(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<T>().map(Some).map_err(|_| invalid())
            }
            Some(FieldValue::Unsupported) => Err(invalid()),
        }
    }
}

/// `30` and `30.0` both count as integers; `1.5` does not.
fn integral(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let payload = Payload::decode(content_type.as_deref(), &body)?;
        if payload.is_empty() {
            debug!(content_type = ?content_type, "request body carried no fields");
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn extracts_json_object() {
        let req = request(
            Some("application/json"),
            r#"{"username":"alice","duration":30,"note":null}"#,
        );
        let payload = Payload::from_request(req, &()).await.unwrap();
        assert_eq!(payload.text("username").unwrap(), Some("alice"));
        assert_eq!(payload.integer::<i32>("duration").unwrap(), Some(30));
        assert_eq!(payload.text("note").unwrap(), None);
    }

    #[tokio::test]
    async fn extracts_form_body() {
        let req = request(
            Some("application/x-www-form-urlencoded"),
            "username=bob+smith&duration=30",
        );
        let payload = Payload::from_request(req, &()).await.unwrap();
        assert_eq!(payload.text("username").unwrap(), Some("bob smith"));
        assert_eq!(payload.integer::<i32>("duration").unwrap(), Some(30));
    }

    #[tokio::test]
    async fn content_type_parameters_are_ignored() {
        let req = request(Some("Application/JSON; charset=utf-8"), r#"{"username":"carol"}"#);
        let payload = Payload::from_request(req, &()).await.unwrap();
        assert_eq!(payload.text("username").unwrap(), Some("carol"));
    }

    #[tokio::test]
    async fn unknown_content_type_yields_empty_payload() {
        let payload = Payload::from_request(request(Some("text/plain"), "username=x"), &())
            .await
            .unwrap();
        assert!(payload.is_empty());

        let payload = Payload::from_request(request(None, r#"{"username":"x"}"#), &())
            .await
            .unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let err = Payload::decode(Some("application/json"), b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = Payload::decode(Some("application/json"), b"[1, 2]").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn numbers_are_not_coerced_to_text() {
        let payload = Payload::decode(Some("application/json"), br#"{"description":42}"#).unwrap();
        assert!(matches!(payload.text("description"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn integer_rejects_non_numeric_values() {
        let payload = Payload::decode(
            Some("application/json"),
            br#"{"a":"thirty","b":1.5,"c":true,"d":" 12 ","e":""}"#,
        )
        .unwrap();
        assert!(payload.integer::<i32>("a").is_err());
        assert!(payload.integer::<i32>("b").is_err());
        assert!(payload.integer::<i32>("c").is_err());
        assert_eq!(payload.integer::<i32>("d").unwrap(), Some(12));
        assert_eq!(payload.integer::<i32>("e").unwrap(), None);
        assert_eq!(payload.integer::<i32>("missing").unwrap(), None);
    }

    #[test]
    fn integral_floats_are_integers() {
        let payload = Payload::decode(
            Some("application/json"),
            br#"{"a":30.0,"b":-2.0,"c":1.5,"d":1e300,"e":3e9}"#,
        )
        .unwrap();
        assert_eq!(payload.integer::<i32>("a").unwrap(), Some(30));
        assert_eq!(payload.integer::<i32>("b").unwrap(), Some(-2));
        assert!(payload.integer::<i32>("c").is_err());
        assert!(payload.integer::<i64>("d").is_err());
        assert!(payload.integer::<i32>("e").is_err());
        assert_eq!(payload.integer::<i64>("e").unwrap(), Some(3_000_000_000));
    }

    #[test]
    fn integer_rejects_out_of_range() {
        let payload =
            Payload::decode(Some("application/json"), br#"{"duration":4294967296}"#).unwrap();
        assert!(payload.integer::<i32>("duration").is_err());
        assert_eq!(payload.integer::<i64>("duration").unwrap(), Some(4_294_967_296));
    }

    #[test]
    fn repeated_form_keys_keep_last_value() {
        let payload =
            Payload::decode(Some("application/x-www-form-urlencoded"), b"username=a&username=b")
                .unwrap();
        assert_eq!(payload.text("username").unwrap(), Some("b"));
    }

    #[test]
    fn blank_text_is_treated_as_absent() {
        let payload =
            Payload::decode(Some("application/x-www-form-urlencoded"), b"username=++&date=").unwrap();
        assert_eq!(payload.non_blank_text("username").unwrap(), None);
        assert_eq!(payload.non_blank_text("date").unwrap(), None);
    }
}
