//! Request extractors whose rejections render as `AppError`.
//!
//! axum's stock `Json` and `Query` answer malformed input with a plain-text
//! body; these wrappers route the rejection through the JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
