//! Turning instructions into resolved features.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    bucket,
    events::DecisionKind,
    gene::Gene,
    instruction::{self, Instruction, ValidationError},
    random::RandomSource,
};

/// Resolved features keyed by `feature` or, for the chosen bucket, `feature.bucket`.
///
/// # Serialization
///
/// Serialized as a plain JSON object of keys to booleans. The bucket chosen for each feature is
/// tracked alongside the entries but is not serialized, and equality only compares the entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedFeatureMap {
    features: HashMap<String, bool>,
    #[serde(skip)]
    buckets: HashMap<String, String>,
}

impl ResolvedFeatureMap {
    /// Create an empty map.
    pub fn new() -> ResolvedFeatureMap {
        ResolvedFeatureMap::default()
    }

    /// The resolved value of `key`, or `None` if it was not resolved.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.features.get(key).copied()
    }

    /// `true` if `key` resolved on. Unknown keys are off.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    /// The bucket chosen for `feature_name`, if it resolved on and was split into buckets.
    pub fn bucket(&self, feature_name: &str) -> Option<&str> {
        if !self.is_enabled(feature_name) {
            return None;
        }
        self.buckets.get(feature_name).map(String::as_str)
    }

    /// Set `key` to `toggle`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, toggle: bool) -> Option<bool> {
        self.features.insert(key.into(), toggle)
    }

    /// Resolve `feature_name` on in `bucket`, adding both `feature_name` and
    /// `feature_name.bucket`.
    fn insert_bucketed(&mut self, feature_name: &str, bucket: &str, toggle: bool) {
        self.insert(feature_name, toggle);
        self.insert(format!("{feature_name}.{bucket}"), toggle);
        self.buckets
            .insert(feature_name.to_owned(), bucket.to_owned());
    }

    /// Add all entries of `other`, overwriting keys present in both.
    pub fn merge(&mut self, other: ResolvedFeatureMap) {
        self.features.extend(other.features);
        self.buckets.extend(other.buckets);
    }

    /// Number of resolved keys, bucket keys included.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over resolved keys and their values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.features
            .iter()
            .map(|(key, &toggle)| (key.as_str(), toggle))
    }

    /// Unwrap into the underlying key to value map.
    pub fn into_inner(self) -> HashMap<String, bool> {
        self.features
    }
}

impl PartialEq for ResolvedFeatureMap {
    // Compare ignoring the bucket index, which is not serialized.
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features
    }
}

impl Eq for ResolvedFeatureMap {}

impl From<HashMap<String, bool>> for ResolvedFeatureMap {
    fn from(features: HashMap<String, bool>) -> Self {
        ResolvedFeatureMap {
            features,
            buckets: HashMap::new(),
        }
    }
}

impl FromIterator<(String, bool)> for ResolvedFeatureMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        ResolvedFeatureMap::from(iter.into_iter().collect::<HashMap<_, _>>())
    }
}

/// The decision made for a valid instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the feature resolved on.
    pub toggle: bool,
    /// What decided the toggle.
    pub kind: DecisionKind,
    /// The chosen bucket. Only set when the feature is on and declares buckets.
    pub bucket: Option<String>,
}

impl Decision {
    /// Decide `instruction`.
    ///
    /// `toggle: false` wins over everything. Otherwise a throttle is rolled, then `toggle: true`
    /// applies; anything else is off. A feature that is on and declares buckets also gets a bucket,
    /// taken from a [`Gene::Bucket`] when one is given.
    pub fn resolve(
        instruction: &Instruction,
        gene: Option<&Gene>,
        rng: &mut impl RandomSource,
    ) -> Decision {
        let (toggle, mut kind) = match (instruction.toggle, instruction.throttle) {
            (Some(false), _) => (false, DecisionKind::Toggle),
            (_, Some(throttle)) => (throttle.decide(rng), DecisionKind::Throttle),
            (Some(true), None) => (true, DecisionKind::Toggle),
            (None, None) => (false, DecisionKind::Toggle),
        };

        let bucket = match &instruction.buckets {
            Some(buckets) if toggle && bucket::contains_multivariant(instruction) => {
                bucket::select(buckets, gene, rng).map(str::to_owned)
            }
            _ => None,
        };
        if bucket.is_some() {
            kind = DecisionKind::Bucket;
        }

        Decision {
            toggle,
            kind,
            bucket,
        }
    }

    /// Entries for `feature_name`: the feature itself and, when bucketed, `feature_name.bucket`.
    pub fn to_features(&self, feature_name: &str) -> ResolvedFeatureMap {
        let mut features = ResolvedFeatureMap::new();
        match &self.bucket {
            Some(bucket) => features.insert_bucketed(feature_name, bucket, self.toggle),
            None => {
                features.insert(feature_name, self.toggle);
            }
        }
        features
    }
}

/// Result of [`assemble`].
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Entries resolved for the feature.
    pub features: ResolvedFeatureMap,
    /// The decision, or why the instruction was rejected. A rejected instruction leaves the
    /// feature off.
    pub outcome: Result<Decision, ValidationError>,
}

/// Validate a raw instruction and resolve `feature_name` from it.
///
/// An invalid instruction never fails the call: the feature resolves off and the validation error
/// is reported in [`Assembly::outcome`].
pub fn assemble(
    feature_name: &str,
    instruction: &serde_json::Value,
    gene: Option<&Gene>,
    rng: &mut impl RandomSource,
) -> Assembly {
    match instruction::validate(instruction) {
        Ok(instruction) => {
            let decision = Decision::resolve(&instruction, gene, rng);
            Assembly {
                features: decision.to_features(feature_name),
                outcome: Ok(decision),
            }
        }
        Err(err) => {
            log::warn!(target: "muton",
                       feature_name;
                       "invalid feature instruction: {err}");
            let mut features = ResolvedFeatureMap::new();
            features.insert(feature_name, false);
            Assembly {
                features,
                outcome: Err(err),
            }
        }
    }
}
