//! # Concurrent Shard Creation
//!
//! Many callers hit one registry at once from blocking worker threads.
//!
//! ## Properties Tested:
//!
//! 1. Distinct tuples all succeed and each gets its two notices
//! 2. Racing on one tuple yields one shard, collisions for everyone else
//! 3. Every shard's MainNotice precedes its ShardNotice in global order

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use rand::seq::SliceRandom;
    use rand::Rng;
    use shard_registry::{
        Create2Deriver, InMemoryInputBox, InMemoryUnitFactory, Notice, RegistryConfig,
        RegistryError, ShardId, ShardRegistryApi, ShardRegistryService, TemplateHash, UnitAddress,
    };

    type Service = ShardRegistryService<Create2Deriver, InMemoryUnitFactory, InMemoryInputBox>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const WORKERS: u64 = 32;

    fn service(lock_stripes: usize) -> Arc<Service> {
        let config = RegistryConfig {
            factory_address: UnitAddress::new([0xFA; 20]),
            unit_creation_code: vec![0x60, 0x80, 0x60, 0x40],
            registry_address: UnitAddress::new([0xEE; 20]),
            lock_stripes,
        };
        Arc::new(ShardRegistryService::from_config(
            &config,
            InMemoryUnitFactory::new(config.factory_address, config.unit_creation_code.clone()),
            InMemoryInputBox::new(config.registry_address),
        ))
    }

    fn random_address() -> UnitAddress {
        UnitAddress::new(rand::thread_rng().gen())
    }

    fn template() -> TemplateHash {
        TemplateHash::new([0x2E; 32])
    }

    /// Global sequence of each notice, keyed by (kind, shard).
    fn notice_positions(service: &Service) -> HashMap<(bool, UnitAddress), u64> {
        let mut positions = HashMap::new();
        for entry in service.queue().all_inputs() {
            match Notice::classify(&entry.payload).unwrap() {
                Notice::Main(notice) => {
                    positions.insert((true, notice.shard), entry.receipt.sequence);
                }
                Notice::Shard(_) => {
                    positions.insert((false, entry.receipt.target), entry.receipt.sequence);
                }
            }
        }
        positions
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_tuples_all_succeed() {
        let service = service(8);
        let main = random_address();
        let owner = random_address();

        let mut ids: Vec<u64> = (1..=WORKERS).collect();
        ids.shuffle(&mut rand::thread_rng());

        let handles: Vec<_> = ids
            .into_iter()
            .map(|n| {
                let service = Arc::clone(&service);
                tokio::task::spawn_blocking(move || {
                    service.create_shard(&main, &owner, &template(), &ShardId::from_u64(n))
                })
            })
            .collect();

        let mut shards = Vec::new();
        for handle in handles {
            shards.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(service.queue().len(), 2 * WORKERS as usize);
        assert_eq!(service.queue().inputs_for(&main).len(), WORKERS as usize);
        assert_eq!(service.stats().shards_created, WORKERS);

        let positions = notice_positions(&service);
        for shard in &shards {
            let main_at = positions[&(true, *shard)];
            let shard_at = positions[&(false, *shard)];
            assert!(main_at < shard_at, "shard {shard} notified before main");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_tuple_race_yields_one_shard() {
        let service = service(8);
        let main = random_address();
        let shard_id = ShardId::from_u64(7);

        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                let service = Arc::clone(&service);
                let owner = random_address();
                tokio::task::spawn_blocking(move || {
                    service.create_shard(&main, &owner, &template(), &shard_id)
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        let expected = service.calculate_shard_address(&main, &template(), &shard_id);
        let successes: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(successes, vec![&expected]);

        for result in results.iter().filter(|r| r.is_err()) {
            assert_eq!(result, &Err(RegistryError::IdentityCollision(expected)));
        }

        assert_eq!(service.queue().len(), 2);
        assert_eq!(service.stats().identity_collisions, WORKERS - 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_stripe_still_correct() {
        // Every tuple shares one critical section.
        let service = service(1);
        let owner = random_address();

        let handles: Vec<_> = (0..WORKERS)
            .map(|n| {
                let service = Arc::clone(&service);
                let main = random_address();
                tokio::task::spawn_blocking(move || {
                    service.create_shard_detailed(&main, &owner, &template(), &ShardId::from_u64(n))
                })
            })
            .collect();

        for handle in handles {
            let creation = handle.await.unwrap().unwrap();
            assert_eq!(creation.shard_receipt.index, 0);
            assert_eq!(creation.main_receipt.sequence + 1, creation.shard_receipt.sequence);
        }

        assert_eq!(service.factory().unit_count(), WORKERS as usize);
    }
}
