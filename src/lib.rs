//! Resolution of declarative feature toggle instructions into on/off and multivariant decisions.
//!
//! # Overview
//!
//! An instruction describes how a feature behaves: unconditionally on or off (`toggle`), on for a
//! percentage of evaluations (`throttle`), or on and split across named variants (`buckets`). A
//! [`Resolver`] turns instructions into a [`ResolvedFeatureMap`] keyed by the feature name and,
//! for the chosen variant, by `feature.bucket`.
//!
//! Bucket choices can be made sticky. Feed the [`DecisionEvent`]s reported to your
//! [`EventLogger`] into a [`GeneCorpus`] and pass the corpus back on later evaluations; the
//! previously chosen bucket is then reused instead of being drawn again.
//!
//! Randomness is never global. Every evaluation takes a [`RandomSource`]: any `rand` generator,
//! or a [`HashedRandom`] seeded with a subject key for reproducible decisions.
//!
//! # Error Handling
//!
//! Invalid instructions do not produce errors. The feature resolves off and an
//! [`Event::InvalidInstruction`] is reported to the event logger. Errors represented by the
//! [`Error`] enum are reserved for misuse of the API, such as passing a bucket list that is not an
//! array, and for unparsable instruction sets.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate with the `muton` target.
//! Rejected instructions are logged as warnings; individual resolutions at trace level.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

pub mod bucket;
pub mod instruction;
pub mod throttle;

mod assemble;
mod config;
mod error;
mod events;
mod gene;
mod instruction_set;
mod random;
mod resolver;

pub use assemble::{assemble, Assembly, Decision, ResolvedFeatureMap};
pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use events::{DecisionEvent, DecisionKind, Event, EventLogger, InvalidInstructionEvent};
pub use gene::{pair_gene, Gene, GeneCorpus};
pub use instruction_set::InstructionSet;
pub use random::{HashedRandom, RandomSource};
pub use resolver::Resolver;
