//! Message entity and its delivery lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gateway id stored on messages that have not been handed to a gateway yet
pub const UNSENT_MESSAGE_ID: &str = "0";

/// Destination region, decided once at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "KR")]
    Kr,
    #[serde(rename = "PH")]
    Ph,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Kr, Region::Ph];

    /// ISO 3166-1 alpha-2 code
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Kr => "KR",
            Region::Ph => "PH",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KR" => Ok(Region::Kr),
            "PH" => Ok(Region::Ph),
            other => Err(format!("unsupported region: {other}")),
        }
    }
}

/// Delivery status of a message
///
/// ```text
/// Started --send--> Queued | Pending | Sent
/// Queued | Pending --poll--> Queued | Pending | Sent | Failed | Refunded
/// Failed | Refunded --requeue--> new Started message
/// ```
///
/// `Retry` marks rows closed out by earlier releases of the relay; it is
/// terminal and never produced by the current scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Started,
    Queued,
    Pending,
    Sent,
    Failed,
    Refunded,
    Retry,
}

impl MessageStatus {
    /// Lowercase storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Started => "started",
            MessageStatus::Queued => "queued",
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
            MessageStatus::Refunded => "refunded",
            MessageStatus::Retry => "retry",
        }
    }

    /// Map a gateway-reported status string.
    ///
    /// Unknown or blank values are treated as `Pending` so they are polled
    /// again rather than mistaken for a delivery.
    pub fn from_gateway(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" => MessageStatus::Queued,
            "pending" => MessageStatus::Pending,
            "sent" => MessageStatus::Sent,
            "failed" => MessageStatus::Failed,
            "refunded" => MessageStatus::Refunded,
            _ => MessageStatus::Pending,
        }
    }

    /// Awaiting a delivery report from the gateway
    pub fn is_in_flight(&self) -> bool {
        matches!(self, MessageStatus::Queued | MessageStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageStatus::Sent
                | MessageStatus::Failed
                | MessageStatus::Refunded
                | MessageStatus::Retry
        )
    }

    /// Failed deliveries that must be re-queued as a fresh message
    pub fn needs_retry(&self) -> bool {
        matches!(self, MessageStatus::Failed | MessageStatus::Refunded)
    }

    /// Whether a row in this status may be written with `next`.
    ///
    /// Rewriting the same status is always allowed so updates stay idempotent.
    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            MessageStatus::Started => matches!(
                next,
                MessageStatus::Queued | MessageStatus::Pending | MessageStatus::Sent
            ),
            MessageStatus::Queued | MessageStatus::Pending => matches!(
                next,
                MessageStatus::Queued
                    | MessageStatus::Pending
                    | MessageStatus::Sent
                    | MessageStatus::Failed
                    | MessageStatus::Refunded
            ),
            _ => false,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    /// Strict parse of the storage form; gateway strings go through `from_gateway`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(MessageStatus::Started),
            "queued" => Ok(MessageStatus::Queued),
            "pending" => Ok(MessageStatus::Pending),
            "sent" => Ok(MessageStatus::Sent),
            "failed" => Ok(MessageStatus::Failed),
            "refunded" => Ok(MessageStatus::Refunded),
            "retry" => Ok(MessageStatus::Retry),
            other => Err(format!("unknown message status: {other}")),
        }
    }
}

/// A message persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned id, unique and immutable
    pub sequence: i64,

    /// National-format number, digits only
    pub receiver: String,

    pub body: String,

    pub region: Region,

    pub status: MessageStatus,

    /// Gateway id, `UNSENT_MESSAGE_ID` until the first successful send
    pub message_id: String,
}

impl Message {
    pub fn is_unsent(&self) -> bool {
        self.message_id == UNSENT_MESSAGE_ID
    }

    /// Insert payload for the fresh copy created when this message is re-queued
    pub fn retry_copy(&self) -> NewMessage {
        NewMessage {
            receiver: self.receiver.clone(),
            body: self.body.clone(),
            region: self.region,
        }
    }
}

/// Insert payload; the store assigns sequence, status and message id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub receiver: String,
    pub body: String,
    pub region: Region,
}

impl NewMessage {
    pub fn new(receiver: impl Into<String>, body: impl Into<String>, region: Region) -> Self {
        Self {
            receiver: receiver.into(),
            body: body.into(),
            region,
        }
    }

    /// Materialize the row as the store writes it on insert
    pub fn into_message(self, sequence: i64) -> Message {
        Message {
            sequence,
            receiver: self.receiver,
            body: self.body,
            region: self.region,
            status: MessageStatus::Started,
            message_id: UNSENT_MESSAGE_ID.to_string(),
        }
    }
}
