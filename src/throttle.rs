//! Percentage based on/off decisions.
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// A validated throttle: the percentage of evaluations, in `[0, 100]`, that resolve "on".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Throttle(f64);

impl Throttle {
    /// Returns `None` unless `percent` is a finite number in `[0, 100]`.
    pub fn new(percent: f64) -> Option<Throttle> {
        (percent.is_finite() && (0.0..=100.0).contains(&percent)).then_some(Throttle(percent))
    }

    /// Parse either a number (`30`, `12.5`) or a percentage string (`"30%"`).
    pub fn parse(value: &serde_json::Value) -> Option<Throttle> {
        ThrottleWire::deserialize(value).ok()?.validate()
    }

    fn from_percent_str(s: &str) -> Option<Throttle> {
        static PERCENT: OnceLock<Regex> = OnceLock::new();
        let re = PERCENT.get_or_init(|| {
            Regex::new(r"^(\d{1,3}(?:\.\d+)?)%$").expect("percent regex should compile")
        });
        let captures = re.captures(s)?;
        Throttle::new(captures[1].parse().ok()?)
    }

    /// The percentage, in `[0, 100]`.
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Roll once: `true` with probability `percent / 100`.
    pub fn decide(self, rng: &mut impl RandomSource) -> bool {
        rng.next_uniform() * 100.0 < self.0
    }
}

/// Wire representation of a throttle before range checks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ThrottleWire {
    Number(f64),
    Percent(String),
}

impl ThrottleWire {
    pub(crate) fn validate(self) -> Option<Throttle> {
        match self {
            ThrottleWire::Number(n) => Throttle::new(n),
            ThrottleWire::Percent(s) => Throttle::from_percent_str(&s),
        }
    }
}

/// Report whether a raw value is a usable throttle.
pub fn is_valid(value: &serde_json::Value) -> bool {
    Throttle::parse(value).is_some()
}

/// Decide a raw throttle. Invalid throttles never resolve "on".
pub fn decide(value: &serde_json::Value, rng: &mut impl RandomSource) -> bool {
    Throttle::parse(value).map_or(false, |throttle| throttle.decide(rng))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    use crate::random::SequenceRandom;

    use super::{decide, is_valid, Throttle};

    #[test]
    fn accepts_numbers_and_percent_strings() {
        assert!(is_valid(&json!(0)));
        assert!(is_valid(&json!(100)));
        assert!(is_valid(&json!(12.5)));
        assert!(is_valid(&json!("30%")));
        assert!(is_valid(&json!("100%")));
        assert!(is_valid(&json!("0.5%")));
        assert_eq!(Throttle::parse(&json!("30%")), Throttle::new(30.0));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(!is_valid(&json!(-1)));
        assert!(!is_valid(&json!(100.01)));
        assert!(!is_valid(&json!("101%")));
        assert!(!is_valid(&json!("30")));
        assert!(!is_valid(&json!("abc%")));
        assert!(!is_valid(&json!(true)));
        assert!(!is_valid(&json!(null)));
        assert!(!is_valid(&json!([50])));
        assert_eq!(Throttle::new(f64::NAN), None);
        assert_eq!(Throttle::new(f64::INFINITY), None);
    }

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            assert!(decide(&json!(100), &mut rng));
            assert!(!decide(&json!(0), &mut rng));
        }
    }

    #[test]
    fn compares_draw_against_threshold() {
        let throttle = Throttle::new(30.0).unwrap();
        assert!(throttle.decide(&mut SequenceRandom(vec![0.29], 0)));
        assert!(!throttle.decide(&mut SequenceRandom(vec![0.3], 0)));
        assert!(!throttle.decide(&mut SequenceRandom(vec![0.99], 0)));
    }

    #[test]
    fn roughly_matches_percentage() {
        let mut rng = StdRng::seed_from_u64(1);
        let on = (0..10_000)
            .filter(|_| decide(&json!(25), &mut rng))
            .count();
        assert!((2_000..3_000).contains(&on), "got {on}");
    }

    #[test]
    fn invalid_throttle_never_decides_on() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(!decide(&json!("lots"), &mut rng));
    }
}
