// Typed page-load events decoded from CDP notifications

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MalformedEvent;
use crate::network::{RequestId, ResourceType, Timestamp};

/// Request details carried by `Network.requestWillBeSent`
///
/// Only the fields this crate interprets are decoded; the rest of the
/// protocol payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request URL
    pub url: String,
    /// HTTP method, when the browser reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Emitted when a network request is initiated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSent {
    pub timestamp: Timestamp,
    pub request: Request,
}

/// Emitted when response headers for a request arrive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceived {
    pub timestamp: Timestamp,
    pub request_id: RequestId,
    /// Resource category, `type` on the wire
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

/// Emitted when a chunk of response body arrives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataReceived {
    pub timestamp: Timestamp,
    pub request_id: RequestId,
    /// Decoded chunk size in bytes, headers excluded
    pub data_length: u64,
    /// On-the-wire chunk size in bytes, headers included
    pub encoded_data_length: u64,
}

/// Emitted when the page "load" milestone fires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadEventFired {
    pub timestamp: Timestamp,
}

/// Emitted when the page "DOMContentLoaded" milestone fires
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomContentEventFired {
    pub timestamp: Timestamp,
}

/// Any protocol event this crate does not interpret
///
/// Carried so that a full event stream can be accumulated without
/// rejecting unknown kinds. Metric queries skip these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Event name in format "Domain.event"
    pub method: String,
    /// Timestamp from the payload, 0.0 when the event carries none
    pub timestamp: Timestamp,
    /// Uninterpreted event parameters
    pub params: Value,
}

/// One protocol occurrence, tagged by kind
///
/// Immutable once constructed; all filtering over an event stream is an
/// exhaustive match on this tag.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    RequestWillBeSent(RequestWillBeSent),
    ResponseReceived(ResponseReceived),
    DataReceived(DataReceived),
    LoadEventFired(LoadEventFired),
    DomContentEventFired(DomContentEventFired),
    Notification(Notification),
}

impl PageEvent {
    /// Decode a raw notification into a typed event
    ///
    /// The five interpreted CDP methods map to their typed variants; any
    /// other method is preserved as [`PageEvent::Notification`]. A
    /// required field missing from an interpreted payload is a
    /// [`MalformedEvent`] error.
    pub fn from_notification(method: &str, params: Value) -> Result<Self, MalformedEvent> {
        let event = match method {
            "Network.requestWillBeSent" => {
                PageEvent::RequestWillBeSent(decode(method, params)?)
            }
            "Network.responseReceived" => PageEvent::ResponseReceived(decode(method, params)?),
            "Network.dataReceived" => PageEvent::DataReceived(decode(method, params)?),
            "Page.loadEventFired" => PageEvent::LoadEventFired(decode(method, params)?),
            "Page.domContentEventFired" => {
                PageEvent::DomContentEventFired(decode(method, params)?)
            }
            _ => {
                let timestamp = params
                    .get("timestamp")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                PageEvent::Notification(Notification {
                    method: method.to_string(),
                    timestamp: Timestamp(timestamp),
                    params,
                })
            }
        };
        Ok(event)
    }

    /// Timestamp of this occurrence
    pub fn timestamp(&self) -> Timestamp {
        match self {
            PageEvent::RequestWillBeSent(e) => e.timestamp,
            PageEvent::ResponseReceived(e) => e.timestamp,
            PageEvent::DataReceived(e) => e.timestamp,
            PageEvent::LoadEventFired(e) => e.timestamp,
            PageEvent::DomContentEventFired(e) => e.timestamp,
            PageEvent::Notification(e) => e.timestamp,
        }
    }

    /// Event name in "Domain.event" form, for logging and diagnostics
    pub fn method(&self) -> &str {
        match self {
            PageEvent::RequestWillBeSent(_) => "Network.requestWillBeSent",
            PageEvent::ResponseReceived(_) => "Network.responseReceived",
            PageEvent::DataReceived(_) => "Network.dataReceived",
            PageEvent::LoadEventFired(_) => "Page.loadEventFired",
            PageEvent::DomContentEventFired(_) => "Page.domContentEventFired",
            PageEvent::Notification(e) => &e.method,
        }
    }
}

fn decode<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, MalformedEvent> {
    serde_json::from_value(params).map_err(|source| MalformedEvent::new(method, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_request_will_be_sent() {
        let params = json!({
            "requestId": "r1",
            "timestamp": 123.456,
            "request": {
                "url": "http://example.com/",
                "method": "GET",
                "headers": {"Accept": "*/*"}
            }
        });

        let event = PageEvent::from_notification("Network.requestWillBeSent", params).unwrap();
        match event {
            PageEvent::RequestWillBeSent(e) => {
                assert_eq!(e.timestamp, Timestamp(123.456));
                assert_eq!(e.request.url, "http://example.com/");
                assert_eq!(e.request.method.as_deref(), Some("GET"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_response_received() {
        let params = json!({
            "requestId": "r1",
            "timestamp": 1.5,
            "type": "Script",
            "response": {"status": 200}
        });

        let event = PageEvent::from_notification("Network.responseReceived", params).unwrap();
        match event {
            PageEvent::ResponseReceived(e) => {
                assert_eq!(e.request_id, RequestId("r1".to_string()));
                assert_eq!(e.resource_type, ResourceType::Script);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_data_received() {
        let params = json!({
            "requestId": "r2",
            "timestamp": 2.0,
            "dataLength": 500,
            "encodedDataLength": 300
        });

        let event = PageEvent::from_notification("Network.dataReceived", params).unwrap();
        match event {
            PageEvent::DataReceived(e) => {
                assert_eq!(e.data_length, 500);
                assert_eq!(e.encoded_data_length, 300);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_milestones() {
        let load = PageEvent::from_notification("Page.loadEventFired", json!({"timestamp": 9.0}))
            .unwrap();
        assert_eq!(load.timestamp(), Timestamp(9.0));
        assert_eq!(load.method(), "Page.loadEventFired");

        let dom = PageEvent::from_notification(
            "Page.domContentEventFired",
            json!({"timestamp": 8.0}),
        )
        .unwrap();
        assert_eq!(dom.timestamp(), Timestamp(8.0));
    }

    #[test]
    fn test_unknown_method_becomes_notification() {
        let params = json!({"timestamp": 4.2, "frameId": "f1"});
        let event = PageEvent::from_notification("Page.frameNavigated", params.clone()).unwrap();
        match event {
            PageEvent::Notification(n) => {
                assert_eq!(n.method, "Page.frameNavigated");
                assert_eq!(n.timestamp, Timestamp(4.2));
                assert_eq!(n.params, params);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_notification_without_timestamp() {
        let event =
            PageEvent::from_notification("Console.messageAdded", json!({"message": {}})).unwrap();
        assert_eq!(event.timestamp(), Timestamp(0.0));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        // dataLength absent
        let params = json!({
            "requestId": "r2",
            "timestamp": 2.0,
            "encodedDataLength": 300
        });

        let err = PageEvent::from_notification("Network.dataReceived", params).unwrap_err();
        assert_eq!(err.method(), "Network.dataReceived");
    }

    #[test]
    fn test_missing_nested_url_is_malformed() {
        let params = json!({
            "timestamp": 1.0,
            "request": {"method": "GET"}
        });

        let result = PageEvent::from_notification("Network.requestWillBeSent", params);
        assert!(result.is_err());
    }
}
