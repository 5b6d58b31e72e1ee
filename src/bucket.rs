//! Multivariant bucket selection.
use crate::{gene::Gene, instruction::Instruction, random::RandomSource, Error, Result};

/// Pick a bucket from `buckets`.
///
/// A [`Gene::Bucket`] is sticky: its recorded bucket is returned as is and `rng` is not touched.
/// Otherwise a bucket is drawn uniformly. Returns `None` only when `buckets` is empty and there is
/// no bucket gene.
pub fn select<'a>(
    buckets: &'a [String],
    gene: Option<&'a Gene>,
    rng: &mut impl RandomSource,
) -> Option<&'a str> {
    if let Some(Gene::Bucket(bucket)) = gene {
        log::debug!(target: "muton", bucket:display = bucket; "reusing bucket from gene");
        return Some(bucket.as_str());
    }

    pick_one(buckets, rng).map(String::as_str)
}

/// Like [`select`], but for a bucket list that has not been validated yet.
///
/// Fails with [`Error::InvalidArgument`] if `buckets` is not an array of strings. An empty array
/// is accepted.
pub fn select_raw(
    buckets: &serde_json::Value,
    gene: Option<&Gene>,
    rng: &mut impl RandomSource,
) -> Result<Option<String>> {
    let buckets = buckets
        .as_array()
        .ok_or_else(|| Error::InvalidArgument(format!("bucket list is not an array: {buckets}")))?
        .iter()
        .map(|bucket| {
            bucket.as_str().map(str::to_owned).ok_or_else(|| {
                Error::InvalidArgument(format!("bucket name is not a string: {bucket}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(select(&buckets, gene, rng).map(str::to_owned))
}

/// Report whether `instruction` declares at least one bucket.
pub fn contains_multivariant(instruction: &Instruction) -> bool {
    instruction
        .buckets
        .as_ref()
        .map_or(false, |buckets| !buckets.is_empty())
}

fn pick_one<'a, T>(items: &'a [T], rng: &mut impl RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    // Guard against a source returning exactly 1.0.
    let index = ((rng.next_uniform() * items.len() as f64) as usize).min(items.len() - 1);
    items.get(index)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    use crate::{gene::Gene, instruction::Instruction, random::SequenceRandom, Error};

    use super::{contains_multivariant, select, select_raw};

    fn buckets(names: &[&str]) -> Vec<String> {
        names.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn bucket_gene_is_sticky_for_any_seed() {
        let list = buckets(&["a", "b", "c"]);
        let gene = Gene::Bucket("b".to_owned());
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(select(&list, Some(&gene), &mut rng), Some("b"));
        }
    }

    #[test]
    fn bucket_gene_does_not_consume_randomness() {
        let list = buckets(&["a", "b"]);
        let gene = Gene::Bucket("a".to_owned());
        let mut rng = SequenceRandom(vec![0.9], 0);
        select(&list, Some(&gene), &mut rng);
        assert_eq!(rng.1, 0);
    }

    #[test]
    fn other_genes_do_not_pin_the_bucket() {
        let list = buckets(&["a", "b"]);
        let mut rng = SequenceRandom(vec![0.75], 0);
        assert_eq!(select(&list, Some(&Gene::Toggle(true)), &mut rng), Some("b"));
        assert_eq!(
            select(&list, Some(&Gene::Throttle(true)), &mut rng),
            Some("b")
        );
    }

    #[test]
    fn random_pick_is_a_member() {
        let list = buckets(&["red", "green", "blue"]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let bucket = select(&list, None, &mut rng).unwrap();
            assert!(list.iter().any(|b| b == bucket));
            seen.insert(bucket);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn index_follows_draw() {
        let list = buckets(&["a", "b", "c", "d"]);
        let mut rng = SequenceRandom(vec![0.0, 0.26, 0.5, 0.999], 0);
        let picks: Vec<_> = (0..4).map(|_| select(&list, None, &mut rng).unwrap()).collect();
        assert_eq!(picks, ["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_list_without_gene_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select(&[], None, &mut rng), None);
    }

    #[test]
    fn raw_rejects_non_arrays() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            select_raw(&json!("not-an-array"), None, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            select_raw(&json!({"a": 1}), None, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            select_raw(&json!(["a", 2]), None, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn raw_accepts_arrays() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_raw(&json!([]), None, &mut rng).unwrap(), None);
        assert_eq!(
            select_raw(&json!(["only"]), None, &mut rng).unwrap(),
            Some("only".to_owned())
        );
    }

    #[test]
    fn multivariant_requires_a_bucket() {
        assert!(contains_multivariant(
            &Instruction::with_toggle(true).buckets(["a"])
        ));
        assert!(!contains_multivariant(
            &Instruction::with_toggle(true).buckets(Vec::<String>::new())
        ));
        assert!(!contains_multivariant(&Instruction::with_toggle(true)));
    }
}
