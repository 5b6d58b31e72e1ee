use chrono::Utc;

use crate::{
    assemble::{assemble, Assembly, ResolvedFeatureMap},
    events::{DecisionEvent, Event, InvalidInstructionEvent},
    gene::{pair_gene, Gene, GeneCorpus},
    instruction_set::InstructionSet,
    random::RandomSource,
    ResolverConfig,
};

/// A resolver of feature instructions.
///
/// Resolution is synchronous and holds no state between calls. Every call takes the
/// [`RandomSource`] it draws from, so concurrent callers can each bring their own.
pub struct Resolver<'a> {
    config: ResolverConfig<'a>,
}

impl<'a> Resolver<'a> {
    /// Create a new `Resolver` using the specified configuration.
    ///
    /// ```
    /// # use muton::{ResolverConfig, Resolver};
    /// let resolver = Resolver::new(ResolverConfig::new());
    /// ```
    pub fn new(config: ResolverConfig<'a>) -> Self {
        Resolver { config }
    }

    /// Resolve `feature_name` from a raw instruction, using `gene` to keep a previously chosen
    /// bucket.
    ///
    /// Never fails: an invalid instruction resolves the feature off and is reported to the event
    /// logger as [`Event::InvalidInstruction`]. Valid instructions are reported as
    /// [`Event::Decision`].
    pub fn assemble(
        &self,
        feature_name: &str,
        instruction: &serde_json::Value,
        gene: Option<&Gene>,
        rng: &mut impl RandomSource,
    ) -> ResolvedFeatureMap {
        let Assembly { features, outcome } = assemble(feature_name, instruction, gene, rng);

        let event: Event = match outcome {
            Ok(decision) => {
                log::trace!(target: "muton",
                            feature_name,
                            features:serde = features;
                            "resolved a feature");
                DecisionEvent {
                    feature_name: feature_name.to_owned(),
                    toggle: decision.toggle,
                    kind: decision.kind,
                    bucket: decision.bucket,
                    timestamp: Utc::now().to_rfc3339(),
                }
                .into()
            }
            Err(err) => InvalidInstructionEvent {
                feature_name: feature_name.to_owned(),
                reason: err.to_string(),
                timestamp: Utc::now().to_rfc3339(),
            }
            .into(),
        };
        self.config.event_logger.log_event(event);

        features
    }

    /// Resolve `feature_name`, pairing a gene from `corpus` so earlier bucket choices stick.
    pub fn resolve(
        &self,
        feature_name: &str,
        instruction: &serde_json::Value,
        corpus: &GeneCorpus,
        rng: &mut impl RandomSource,
    ) -> ResolvedFeatureMap {
        let gene = pair_gene(corpus, feature_name);
        self.assemble(feature_name, instruction, gene.as_ref(), rng)
    }

    /// Resolve every feature of `instructions` in name order and merge the results.
    pub fn resolve_all(
        &self,
        instructions: &InstructionSet,
        corpus: &GeneCorpus,
        rng: &mut impl RandomSource,
    ) -> ResolvedFeatureMap {
        let mut features = ResolvedFeatureMap::new();
        for (feature_name, instruction) in instructions.iter() {
            features.merge(self.resolve(feature_name, instruction, corpus, rng));
        }
        features
    }
}
