//! Feature instructions and their validation.
use std::{collections::HashSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::throttle::{Throttle, ThrottleWire};

/// A validated instruction describing how one feature resolves.
///
/// Obtain one with [`validate`]; raw JSON that does not follow the rules below is rejected with a
/// [`ValidationError`]:
///
/// - the instruction is an object whose only keys are `toggle`, `throttle` and `buckets`, with at
///   least one of them set to a non-null value;
/// - `toggle` is a boolean;
/// - `throttle` is a number in `[0, 100]` or a percentage string such as `"30%"`;
/// - `buckets` is an array of unique, non-empty strings without `.` (an empty array is fine).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// `Some(false)` forces the feature off. `None` defers to the throttle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<bool>,
    /// Percentage of evaluations that resolve on, unless `toggle` is `Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<Throttle>,
    /// Variants to split the feature into when it resolves on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<String>>,
}

impl Instruction {
    /// Unconditionally on or off.
    pub fn with_toggle(toggle: bool) -> Instruction {
        Instruction {
            toggle: Some(toggle),
            ..Default::default()
        }
    }

    /// On for `throttle` percent of evaluations.
    pub fn with_throttle(throttle: Throttle) -> Instruction {
        Instruction {
            throttle: Some(throttle),
            ..Default::default()
        }
    }

    /// Adds a bucket split to the instruction.
    pub fn buckets<I, S>(mut self, buckets: I) -> Instruction
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets = Some(buckets.into_iter().map(Into::into).collect());
        self
    }
}

impl TryFrom<&serde_json::Value> for Instruction {
    type Error = ValidationError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        validate(value)
    }
}

/// Reasons an instruction is rejected.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ValidationError {
    /// The instruction is not a JSON object.
    #[error("instruction is not an object")]
    NotAnObject,
    /// Unknown keys or wrongly typed values.
    #[error("malformed instruction: {0}")]
    Malformed(#[source] Arc<serde_json::Error>),
    /// None of `toggle`, `throttle` or `buckets` is set.
    #[error("instruction sets none of toggle, throttle or buckets")]
    Empty,
    /// The throttle is out of range or not a valid percentage.
    #[error("throttle must be a number or percentage in [0, 100]")]
    InvalidThrottle,
    /// A bucket name is empty or contains `.`.
    #[error("invalid bucket name {0:?}")]
    InvalidBucketName(String),
    /// A bucket name appears twice.
    #[error("bucket {0:?} is listed more than once")]
    DuplicateBucket(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstructionWire {
    #[serde(default)]
    toggle: Option<bool>,
    #[serde(default)]
    throttle: Option<ThrottleWire>,
    #[serde(default)]
    buckets: Option<Vec<String>>,
}

/// Validate a raw instruction.
pub fn validate(value: &serde_json::Value) -> Result<Instruction, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }

    let wire = InstructionWire::deserialize(value)
        .map_err(|err| ValidationError::Malformed(Arc::new(err)))?;

    if wire.toggle.is_none() && wire.throttle.is_none() && wire.buckets.is_none() {
        return Err(ValidationError::Empty);
    }

    let throttle = match wire.throttle {
        Some(throttle) => Some(throttle.validate().ok_or(ValidationError::InvalidThrottle)?),
        None => None,
    };

    if let Some(buckets) = &wire.buckets {
        let mut seen = HashSet::new();
        for bucket in buckets {
            if bucket.is_empty() || bucket.contains('.') {
                return Err(ValidationError::InvalidBucketName(bucket.clone()));
            }
            if !seen.insert(bucket.as_str()) {
                return Err(ValidationError::DuplicateBucket(bucket.clone()));
            }
        }
    }

    Ok(Instruction {
        toggle: wire.toggle,
        throttle,
        buckets: wire.buckets,
    })
}

/// Report whether a raw instruction passes [`validate`].
pub fn is_valid(value: &serde_json::Value) -> bool {
    validate(value).is_ok()
}
