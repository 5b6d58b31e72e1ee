use muton::{Event, GeneCorpus, InstructionSet, ResolverConfig};

pub fn main() {
    env_logger::init();

    let instructions = InstructionSet::from_json(
        r#"{"features": {
            "new-search": {"toggle": true},
            "gradual-rollout": {"throttle": "25%"},
            "checkout-experiment": {"toggle": true, "buckets": ["control", "one-page", "wizard"]}
        }}"#,
    )
    .unwrap();

    let decisions = std::sync::Mutex::new(Vec::new());
    let mut config = ResolverConfig::new();
    config.event_logger(|event: Event| {
        if let Event::Decision(decision) = event {
            decisions.lock().unwrap().push(decision);
        }
    });
    let resolver = config.to_resolver();

    // First visit: buckets are drawn at random.
    let mut rng = rand::thread_rng();
    let features = resolver.resolve_all(&instructions, &GeneCorpus::new(), &mut rng);
    println!("First visit: {:?}", features);

    // Remember what was decided, so the next visit lands in the same bucket.
    let mut corpus = GeneCorpus::new();
    for decision in decisions.lock().unwrap().iter() {
        corpus.record(decision);
    }

    let features = resolver.resolve_all(&instructions, &corpus, &mut rng);
    println!("Second visit: {:?}", features);
}
