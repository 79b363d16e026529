//! Helpers shared by the provider HTTP clients

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use relay_core::errors::GatewayError;

/// Providers are loose about whether ids and codes are strings or numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub(crate) fn into_text(self) -> String {
        match self {
            Scalar::Int(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Text(value) => value.trim().to_string(),
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            Scalar::Float(value) => Some(*value as i64),
            Scalar::Text(value) => value.trim().parse().ok(),
        }
    }
}

/// Map a reqwest failure onto the gateway error vocabulary
pub(crate) fn transport_error(provider: &str, e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout {
            provider: provider.to_string(),
        }
    } else if e.is_decode() {
        GatewayError::invalid_response(provider, e.to_string())
    } else {
        GatewayError::Transport {
            provider: provider.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Reject non-2xx replies and decode the body as `T`
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        return Err(GatewayError::send_failed(
            provider,
            format!("HTTP {}: {}", status.as_u16(), snippet(&body)),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        GatewayError::invalid_response(provider, format!("{} in reply {}", e, snippet(&body)))
    })
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((index, _)) => format!("{}...", &trimmed[..index]),
        None => trimmed.to_string(),
    }
}
