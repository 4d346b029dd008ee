// Shared network identifier and timing types

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Unique request identifier
///
/// Opaque and stable across all events belonging to one network request.
/// Supports equality and hashing only; request ids carry no ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

/// Timestamp (seconds since an epoch shared by all events of one stream)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Timestamp(pub f64);

/// Resource type
///
/// Protocol-assigned category of a fetched asset. Metric queries only
/// distinguish `Document`, `Script`, `Image`, `Stylesheet` and `Other`;
/// the remaining variants are carried so that any CDP stream decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    TextTrack,
    XHR,
    Fetch,
    EventSource,
    WebSocket,
    Manifest,
    SignedExchange,
    Ping,
    CSPViolationReport,
    Other,
}

impl ResourceType {
    /// Parse a protocol resource-type string (case-sensitive)
    ///
    /// Returns `None` for unrecognized values so that query boundaries
    /// can treat them as matching zero events rather than failing.
    pub fn parse(value: &str) -> Option<Self> {
        let resource_type = match value {
            "Document" => ResourceType::Document,
            "Stylesheet" => ResourceType::Stylesheet,
            "Image" => ResourceType::Image,
            "Media" => ResourceType::Media,
            "Font" => ResourceType::Font,
            "Script" => ResourceType::Script,
            "TextTrack" => ResourceType::TextTrack,
            "XHR" => ResourceType::XHR,
            "Fetch" => ResourceType::Fetch,
            "EventSource" => ResourceType::EventSource,
            "WebSocket" => ResourceType::WebSocket,
            "Manifest" => ResourceType::Manifest,
            "SignedExchange" => ResourceType::SignedExchange,
            "Ping" => ResourceType::Ping,
            "CSPViolationReport" => ResourceType::CSPViolationReport,
            "Other" => ResourceType::Other,
            _ => return None,
        };
        Some(resource_type)
    }

    /// Protocol string for this resource type
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "Document",
            ResourceType::Stylesheet => "Stylesheet",
            ResourceType::Image => "Image",
            ResourceType::Media => "Media",
            ResourceType::Font => "Font",
            ResourceType::Script => "Script",
            ResourceType::TextTrack => "TextTrack",
            ResourceType::XHR => "XHR",
            ResourceType::Fetch => "Fetch",
            ResourceType::EventSource => "EventSource",
            ResourceType::WebSocket => "WebSocket",
            ResourceType::Manifest => "Manifest",
            ResourceType::SignedExchange => "SignedExchange",
            ResourceType::Ping => "Ping",
            ResourceType::CSPViolationReport => "CSPViolationReport",
            ResourceType::Other => "Other",
        }
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    /// An unrecognized wire string decodes to `Other` rather than
    /// rejecting the event; browsers add new categories over time.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ResourceType::parse(&value).unwrap_or(ResourceType::Other))
    }
}
