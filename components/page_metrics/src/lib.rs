//! Page-load metric derivation
//!
//! Accumulates the chronological CDP event stream of one navigation and
//! answers read-only metric queries over it: page-load milestones
//! relative to navigation start, and byte/request aggregates per
//! resource type, correlated across event kinds by request id.
//!
//! # Features
//! - **Timing queries**: `start_time`, `onload_event`, `dom_content_event`
//! - **Resource aggregation**: request counts and decoded/encoded byte
//!   totals per resource type
//! - **Append-only accumulation**: events are never removed or reordered

use std::cell::OnceCell;

use cdp_events::{DataReceived, MalformedEvent, PageEvent, RequestId, ResourceType, Timestamp};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by timing queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A milestone event fired but no `Network.requestWillBeSent`
    /// matched the document URL, so there is no navigation start to
    /// measure the milestone against.
    #[error("{milestone} milestone observed without a navigation start for the document url")]
    MissingNavigationStart {
        /// Milestone event name, e.g. "Page.loadEventFired"
        milestone: &'static str,
    },
}

/// Milestone offset from navigation start, in seconds
///
/// Rounded to millisecond precision.
pub type Seconds = f64;

/// Accumulator for the event stream of one navigation
///
/// Owns an ordered, append-only sequence of [`PageEvent`]s whose arrival
/// order is assumed chronological. Timing queries memoize their result
/// on first access and never invalidate it: the intended use is to
/// append the complete stream, then read metrics. Querying early and
/// appending afterwards yields the stale cached value by design.
/// Aggregation queries are recomputed on every call and always reflect
/// the current sequence.
///
/// Single-threaded by contract; the memoization cells make this type
/// `!Sync`, so concurrent appenders must synchronize externally.
#[derive(Debug)]
pub struct Document {
    url: String,
    events: Vec<PageEvent>,
    start_time: OnceCell<Option<Timestamp>>,
    onload_event: OnceCell<Option<Seconds>>,
    dom_content_event: OnceCell<Option<Seconds>>,
}

impl Document {
    /// Create a Document for one navigation URL with an empty stream
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: Vec::new(),
            start_time: OnceCell::new(),
            onload_event: OnceCell::new(),
            dom_content_event: OnceCell::new(),
        }
    }

    /// The navigation URL this document represents
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The accumulated event sequence, in arrival order
    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    /// Append one event to the stream
    pub fn append(&mut self, event: PageEvent) {
        debug!("appending {} event to {}", event.method(), self.url);
        self.events.push(event);
    }

    /// Decode a raw notification and append it in one step
    ///
    /// A malformed payload fails this single append and leaves the
    /// accumulated sequence untouched.
    pub fn append_notification(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<(), MalformedEvent> {
        let event = PageEvent::from_notification(method, params)?;
        self.append(event);
        Ok(())
    }

    /// The seconds since epoch that the request for this document started
    ///
    /// First `Network.requestWillBeSent` whose request URL equals the
    /// document URL exactly (string equality, no normalization, no
    /// redirect following). `None` when no such event has been seen.
    /// Memoized on first computation.
    pub fn start_time(&self) -> Option<Timestamp> {
        *self.start_time.get_or_init(|| {
            self.events.iter().find_map(|event| match event {
                PageEvent::RequestWillBeSent(e) if e.request.url == self.url => Some(e.timestamp),
                _ => None,
            })
        })
    }

    /// Seconds *after* navigation start that the load event fired
    ///
    /// `Ok(None)` when no `Page.loadEventFired` has been seen. A load
    /// event without a resolvable [`Self::start_time`] is a
    /// [`DocumentError::MissingNavigationStart`] error rather than a
    /// garbage duration. Memoized on first successful computation.
    pub fn onload_event(&self) -> Result<Option<Seconds>, DocumentError> {
        if let Some(cached) = self.onload_event.get() {
            return Ok(*cached);
        }
        let fired = self.events.iter().find_map(|event| match event {
            PageEvent::LoadEventFired(e) => Some(e.timestamp),
            _ => None,
        });
        let offset = self.offset_from_start("Page.loadEventFired", fired)?;
        Ok(*self.onload_event.get_or_init(|| offset))
    }

    /// Seconds *after* navigation start that DOMContentLoaded fired
    ///
    /// Same contract as [`Self::onload_event`], substituting
    /// `Page.domContentEventFired`.
    pub fn dom_content_event(&self) -> Result<Option<Seconds>, DocumentError> {
        if let Some(cached) = self.dom_content_event.get() {
            return Ok(*cached);
        }
        let fired = self.events.iter().find_map(|event| match event {
            PageEvent::DomContentEventFired(e) => Some(e.timestamp),
            _ => None,
        });
        let offset = self.offset_from_start("Page.domContentEventFired", fired)?;
        Ok(*self.dom_content_event.get_or_init(|| offset))
    }

    /// The number of network requests required to load this document
    ///
    /// Counts `Network.responseReceived` events; order-independent.
    pub fn request_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PageEvent::ResponseReceived(_)))
            .count()
    }

    /// The number of network requests of a particular resource type
    pub fn request_count_by_resource(&self, resource_type: ResourceType) -> usize {
        self.response_ids(resource_type).count()
    }

    /// The number of bytes downloaded for a particular resource type
    ///
    /// If the resource was compressed during transfer the compressed
    /// size is reported; HTTP headers are included in the count.
    pub fn encoded_bytes(&self, resource_type: ResourceType) -> u64 {
        self.response_ids(resource_type)
            .flat_map(|id| self.data_received_for(id))
            .map(|chunk| chunk.encoded_data_length)
            .sum()
    }

    /// The number of bytes downloaded for a particular resource type
    ///
    /// If the resource was compressed during transfer the uncompressed
    /// size is reported; HTTP headers are NOT included in the count.
    pub fn bytes(&self, resource_type: ResourceType) -> u64 {
        self.response_ids(resource_type)
            .flat_map(|id| self.data_received_for(id))
            .map(|chunk| chunk.data_length)
            .sum()
    }

    /// [`Self::request_count_by_resource`] keyed by protocol string
    ///
    /// An unrecognized resource-type name matches zero events.
    pub fn request_count_by_resource_name(&self, resource_type: &str) -> usize {
        ResourceType::parse(resource_type).map_or(0, |rt| self.request_count_by_resource(rt))
    }

    /// [`Self::encoded_bytes`] keyed by protocol string
    ///
    /// An unrecognized resource-type name matches zero events.
    pub fn encoded_bytes_by_name(&self, resource_type: &str) -> u64 {
        ResourceType::parse(resource_type).map_or(0, |rt| self.encoded_bytes(rt))
    }

    /// [`Self::bytes`] keyed by protocol string
    ///
    /// An unrecognized resource-type name matches zero events.
    pub fn bytes_by_name(&self, resource_type: &str) -> u64 {
        ResourceType::parse(resource_type).map_or(0, |rt| self.bytes(rt))
    }

    fn offset_from_start(
        &self,
        milestone: &'static str,
        fired: Option<Timestamp>,
    ) -> Result<Option<Seconds>, DocumentError> {
        let Some(fired) = fired else {
            return Ok(None);
        };
        let start = self
            .start_time()
            .ok_or(DocumentError::MissingNavigationStart { milestone })?;
        Ok(Some(round_to_millis(fired.0 - start.0)))
    }

    /// Request ids of responses with the given resource type, in arrival
    /// order. Duplicate ids are preserved: the same id observed under
    /// two responses contributes its data chunks to both.
    fn response_ids(&self, resource_type: ResourceType) -> impl Iterator<Item = &RequestId> + '_ {
        self.events.iter().filter_map(move |event| match event {
            PageEvent::ResponseReceived(e) if e.resource_type == resource_type => {
                Some(&e.request_id)
            }
            _ => None,
        })
    }

    fn data_received_for<'a>(
        &'a self,
        id: &'a RequestId,
    ) -> impl Iterator<Item = &'a DataReceived> + 'a {
        self.events.iter().filter_map(move |event| match event {
            PageEvent::DataReceived(e) if e.request_id == *id => Some(e),
            _ => None,
        })
    }
}

fn round_to_millis(seconds: f64) -> Seconds {
    (seconds * 1000.0).round() / 1000.0
}
