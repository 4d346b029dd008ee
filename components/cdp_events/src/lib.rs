// CDP event types for page-load observation
//
// This module is part of the CortenBrowser DevTools implementation.

pub mod errors;
pub mod event;
pub mod network;

// Re-export commonly used types
pub use errors::MalformedEvent;
pub use event::{
    DataReceived, DomContentEventFired, LoadEventFired, Notification, PageEvent, Request,
    RequestWillBeSent, ResponseReceived,
};
pub use network::{RequestId, ResourceType, Timestamp};

use serde::{Deserialize, Serialize};

/// Raw CDP notification
/// An unsolicited event from the browser, prior to typed decoding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CdpNotification {
    /// Event name in format "Domain.event"
    pub method: String,
    /// Event parameters
    pub params: serde_json::Value,
}

impl CdpNotification {
    /// Decode this notification into a typed [`PageEvent`]
    pub fn into_event(self) -> Result<PageEvent, MalformedEvent> {
        PageEvent::from_notification(&self.method, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_basic() {
        let notification = CdpNotification {
            method: "Network.requestWillBeSent".to_string(),
            params: json!({"requestId": "123"}),
        };

        assert_eq!(notification.method, "Network.requestWillBeSent");
    }

    #[test]
    fn test_notification_into_event() {
        let notification = CdpNotification {
            method: "Page.loadEventFired".to_string(),
            params: json!({"timestamp": 12.5}),
        };

        let event = notification.into_event().unwrap();
        assert_eq!(event.timestamp(), Timestamp(12.5));
    }
}
