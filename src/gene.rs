//! Genes: prior decisions that make re-evaluation sticky.
use std::{collections::BTreeMap, ops::Bound};

use serde::{Deserialize, Serialize};

use crate::events::{DecisionEvent, DecisionKind};

/// A recorded prior decision for one feature.
///
/// # Serialization
///
/// Serialized as an object with `type` and `toggle` fields, e.g. `{"type":"bucket","toggle":"b"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "toggle", rename_all = "lowercase")]
pub enum Gene {
    /// The feature was resolved by a plain toggle.
    Toggle(bool),
    /// The feature was split into buckets and this bucket was chosen.
    Bucket(String),
    /// The feature was resolved by a throttle roll.
    Throttle(bool),
}

/// Caller-held history of prior decisions.
///
/// Keys of bucketed features follow the `feature.bucket` convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneCorpus {
    /// Recorded values by feature key, `feature` or `feature.bucket`.
    #[serde(default)]
    pub toggles: BTreeMap<String, bool>,
    /// Keys of the form `feature.bucket` that were bucketed.
    #[serde(default)]
    pub buckets: Vec<String>,
    /// Features that were decided by a throttle.
    #[serde(default)]
    pub throttles: Vec<String>,
}

impl GeneCorpus {
    /// Create an empty corpus.
    pub fn new() -> GeneCorpus {
        GeneCorpus::default()
    }

    /// Fold a decision into the corpus so a later [`pair_gene`] finds it.
    ///
    /// A newly chosen bucket supersedes the buckets previously recorded for the same feature.
    pub fn record(&mut self, event: &DecisionEvent) {
        let feature_name = event.feature_name.as_str();
        self.toggles.insert(feature_name.to_owned(), event.toggle);

        match (&event.kind, &event.bucket) {
            (DecisionKind::Bucket, Some(bucket)) => {
                let key = format!("{feature_name}.{bucket}");
                let bucket_prefix = format!("{feature_name}.");
                for previous in &self.buckets {
                    if previous != &key && previous.starts_with(&bucket_prefix) {
                        self.toggles.insert(previous.clone(), false);
                    }
                }
                self.toggles.insert(key.clone(), event.toggle);
                if !self.buckets.contains(&key) {
                    self.buckets.push(key);
                }
            }
            (DecisionKind::Throttle, _) => {
                if !self.throttles.iter().any(|t| t == feature_name) {
                    self.throttles.push(feature_name.to_owned());
                }
            }
            _ => {}
        }
    }

    fn toggles_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a bool)> + 'a {
        self.toggles
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
    }
}

/// Reconstruct the gene of `feature_name` from `corpus`.
///
/// A feature is known when its name is a prefix of some recorded toggle key, which lets a bare
/// feature name match its `feature.bucket` keys. The gene defaults to [`Gene::Toggle`] holding the
/// recorded value (the exact key if present, otherwise the first matching key). It is refined to
/// [`Gene::Bucket`] when a matching bucket key is recorded as on, or else to [`Gene::Throttle`] when
/// the feature was throttled.
pub fn pair_gene(corpus: &GeneCorpus, feature_name: &str) -> Option<Gene> {
    let (_, first_value) = corpus.toggles_with_prefix(feature_name).next()?;
    let value = corpus
        .toggles
        .get(feature_name)
        .copied()
        .unwrap_or(*first_value);

    let gene = if let Some(bucket) = matching_bucket(corpus, feature_name) {
        Gene::Bucket(bucket.to_owned())
    } else if has_prefix(&corpus.throttles, feature_name) {
        Gene::Throttle(value)
    } else {
        Gene::Toggle(value)
    };

    log::trace!(target: "muton",
                feature_name,
                gene:serde = gene;
                "paired gene");

    Some(gene)
}

/// First bucket key with `feature_name` as prefix that is recorded as on, reduced to the bucket
/// name after the first `.`.
fn matching_bucket<'a>(corpus: &'a GeneCorpus, feature_name: &str) -> Option<&'a str> {
    corpus
        .buckets
        .iter()
        .filter(|key| key.starts_with(feature_name))
        .filter(|key| corpus.toggles.get(key.as_str()).copied().unwrap_or(false))
        .find_map(|key| key.split_once('.').map(|(_, bucket)| bucket))
}

fn has_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
