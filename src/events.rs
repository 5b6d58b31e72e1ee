//! Events reported while resolving features.
use derive_more::From;
use serde::{Deserialize, Serialize};

/// How a feature's toggle was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    /// Plain on/off toggle.
    Toggle,
    /// A throttle roll.
    Throttle,
    /// The feature resolved on and a bucket was chosen.
    Bucket,
}

/// A feature was resolved from a valid instruction.
///
/// Callers that want sticky decisions save these and fold them into a
/// [`GeneCorpus`](crate::GeneCorpus) with [`GeneCorpus::record`](crate::GeneCorpus::record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEvent {
    /// The resolved feature.
    pub feature_name: String,
    /// Whether the feature resolved on.
    pub toggle: bool,
    /// What decided the toggle.
    pub kind: DecisionKind,
    /// The chosen bucket, for [`DecisionKind::Bucket`] decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// RFC 3339 time of the decision.
    pub timestamp: String,
}

/// A feature was resolved to off because its instruction was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidInstructionEvent {
    /// The feature that was resolved off.
    pub feature_name: String,
    /// Why the instruction was rejected. Meant for humans, not for matching.
    pub reason: String,
    /// RFC 3339 time of the rejection.
    pub timestamp: String,
}

/// Anything reported to an [`EventLogger`].
///
/// Serialized with an `event` tag, e.g. `{"event":"decision","featureName":"search",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// A feature was resolved from a valid instruction.
    Decision(DecisionEvent),
    /// A feature was resolved off because its instruction was rejected.
    InvalidInstruction(InvalidInstructionEvent),
}

/// Receives events from a [`Resolver`](crate::Resolver).
///
/// Implemented for any `Fn(Event)` closure.
pub trait EventLogger {
    /// Handle one event. Called synchronously from the resolving call.
    fn log_event(&self, event: Event);
}

pub(crate) struct NoopEventLogger;
impl EventLogger for NoopEventLogger {
    fn log_event(&self, _event: Event) {}
}

impl<T: Fn(Event)> EventLogger for T {
    fn log_event(&self, event: Event) {
        self(event);
    }
}
