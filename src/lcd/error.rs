// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors from the coordinating chain's REST (LCD) API
#[derive(Debug, Error)]
pub enum LcdError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("LCD URL is not configured")]
    NotConfigured,
}

impl LcdError {
    pub(crate) fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LcdError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_decode() {
            LcdError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }
        } else {
            LcdError::Request {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}
