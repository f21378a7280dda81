//! URL-encoded form decoding.
//!
//! The body is split into key/value pairs with `serde_urlencoded`, then fed to
//! the destination type's `Deserialize` impl through [`FieldValue`], which
//! parses numeric and boolean fields from their text.
//!
//! Two failure kinds are kept apart:
//! - [`FormError::Malformed`]: the request is at fault (bad encoding,
//!   non-numeric value for an integer field, missing required field).
//! - [`FormError::InvalidTarget`]: the destination type cannot be built from a
//!   key/value map at all. That is a defect in the caller.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::{
    self, value::MapDeserializer, DeserializeOwned, Deserializer, Expected, IntoDeserializer,
    Unexpected, Visitor,
};
use std::fmt::Display;
use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("type cannot be decoded from form data: {0}")]
    InvalidTarget(String),
}

impl de::Error for FormError {
    fn custom<T: Display>(msg: T) -> Self {
        FormError::Malformed(msg.to_string())
    }

    // A visitor handed the top-level map it cannot accept means the target
    // itself is not form-shaped. Field values are never presented as maps.
    fn invalid_type(unexp: Unexpected<'_>, exp: &dyn Expected) -> Self {
        if unexp == Unexpected::Map {
            FormError::InvalidTarget(format!("expected {exp}"))
        } else {
            FormError::Malformed(format!("invalid type: {unexp}, expected {exp}"))
        }
    }
}

/// Decodes an `application/x-www-form-urlencoded` body into `T`.
pub fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    let body = std::str::from_utf8(body)
        .map_err(|e| FormError::Malformed(format!("invalid UTF-8: {e}")))?;

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(body).map_err(|e| FormError::Malformed(e.to_string()))?;

    let fields = pairs
        .into_iter()
        .map(|(key, value)| (key, FieldValue(value)));

    T::deserialize(MapDeserializer::<_, FormError>::new(fields))
}

/// Decodes a POST body after checking it claims to be form data.
pub fn decode_post_form<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, FormError> {
    if !is_form_content_type(headers) {
        return Err(FormError::Malformed(
            "expected Content-Type application/x-www-form-urlencoded".to_string(),
        ));
    }

    decode_form(body)
}

fn is_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

/// Extractor for a posted HTML form.
///
/// Rejects with 400 for a malformed body and 500 for a type that can never
/// be decoded from a form.
#[derive(Debug, Clone)]
pub struct PostForm<T>(pub T);

impl<S, T> FromRequest<S> for PostForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(PostForm(decode_post_form(&headers, &body)?))
    }
}

/// One submitted value, parsed on demand into whatever the field asks for.
struct FieldValue(String);

impl<'de> IntoDeserializer<'de, FormError> for FieldValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! parse_scalar {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                match self.0.parse() {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&self.0), &visitor)),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for FieldValue {
    type Error = FormError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.0)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_enum(IntoDeserializer::<'de, FormError>::into_deserializer(self.0))
    }

    parse_scalar! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    serde::forward_to_deserialize_any! {
        char str string bytes byte_buf unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}
