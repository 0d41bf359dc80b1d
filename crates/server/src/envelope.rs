// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body of every response: `{success, message?, data?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: String, kind: &str) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
            error: Some(kind.to_string()),
        }
    }
}

/// A successful response with its status code.
pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

pub fn ok<T>(message: &str, data: T) -> Reply<T> {
    (StatusCode::OK, Json(Envelope::ok(message, data)))
}

pub fn created<T>(message: &str, data: T) -> Reply<T> {
    (StatusCode::CREATED, Json(Envelope::ok(message, data)))
}
