//! Benchmark utilities for the shard bus
pub mod utils {
    use rand::Rng;
    use shard_bus::{Bus, Message};

    /// Random `m_<n>_<n>_<n>` message text.
    pub fn random_text<R: Rng>(rng: &mut R) -> String {
        format!(
            "m_{}_{}_{}",
            rng.gen_range(0..1000),
            rng.gen_range(0..1000),
            rng.gen_range(0..1000)
        )
    }

    /// One workload per pair of the bus.
    pub fn workloads(bus: &Bus, per_producer: usize) -> Vec<Vec<Message>> {
        let mut rng = rand::thread_rng();
        (0..bus.pair_count())
            .map(|_| {
                (0..per_producer)
                    .map(|_| {
                        bus.message(random_text(&mut rng))
                            .expect("generated text fits default limit")
                    })
                    .collect()
            })
            .collect()
    }
}
