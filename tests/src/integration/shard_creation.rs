//! # Shard Creation Flow
//!
//! A main unit is created through the factory like any application, then a
//! verifier shard is created under it.
//!
//! ## Flow Tested:
//!
//! 1. **Factory**: main unit placed at its deterministic address
//! 2. **Registry**: shard address predicted, shard created, address checked
//! 3. **Input box**: MainNotice to the main unit, then ShardNotice to the shard

#[cfg(test)]
mod tests {
    use shard_registry::{
        AddressDeriver, Create2Deriver, InMemoryInputBox, InMemoryUnitFactory, MainNotice, Notice,
        RegistryConfig, RegistryError, ShardId, ShardNotice, ShardRegistryApi, ShardRegistryService,
        TemplateHash, UnitAddress, UnitCreation, UnitFactory, MAIN_NOTICE_LEN,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const MAIN_TEMPLATE_HASH: &str =
        "0xb091eff80733ff3a75b190107fce6fd93cd73b245e7239a782ecd65ff3932fe6";
    const VERIFIER_TEMPLATE_HASH: &str =
        "0x2e57c8f996e73d50473276bae49e7ad97b84ea5ae34af1bc2ed0e71908dd9461";

    type Service = ShardRegistryService<Create2Deriver, InMemoryUnitFactory, InMemoryInputBox>;

    fn config() -> RegistryConfig {
        RegistryConfig {
            factory_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
            unit_creation_code: hex::decode("6080604052348015600f57600080fd5b50").unwrap(),
            registry_address: "0x59b670e9fA9D0A427751Af201D676719a970857b".parse().unwrap(),
            ..RegistryConfig::default()
        }
    }

    fn owner() -> UnitAddress {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
    }

    fn consensus() -> UnitAddress {
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
    }

    fn verifier_template() -> TemplateHash {
        VERIFIER_TEMPLATE_HASH.parse().unwrap()
    }

    fn service() -> Service {
        let config = config();
        ShardRegistryService::from_config(
            &config,
            InMemoryUnitFactory::new(config.factory_address, config.unit_creation_code.clone()),
            InMemoryInputBox::new(config.registry_address),
        )
    }

    /// Create the main unit through the factory, as an application would be.
    fn deploy_main(service: &Service) -> UnitAddress {
        service
            .factory()
            .create(&UnitCreation {
                parent: consensus(),
                owner: owner(),
                template_hash: MAIN_TEMPLATE_HASH.parse().unwrap(),
                salt: ShardId::ZERO,
            })
            .unwrap()
            .address
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_verifier_shard_scenario() {
        let service = service();
        let main = deploy_main(&service);
        let shard_id = ShardId::from_u64(1);

        let expected = service.calculate_shard_address(&main, &verifier_template(), &shard_id);
        let shard = service
            .create_shard(&main, &owner(), &verifier_template(), &shard_id)
            .unwrap();

        assert!(expected.to_hex().eq_ignore_ascii_case(&shard.to_hex()));

        let inputs = service.queue().all_inputs();
        assert_eq!(inputs.len(), 2);

        let main_input = &inputs[0];
        assert_eq!(main_input.receipt.target, main);
        assert_eq!(main_input.sender, config().registry_address);
        let main_hex = format!("0x{}", hex::encode(&main_input.payload));
        assert_eq!(main_hex.len(), 210);
        assert_eq!(
            MainNotice::decode(&main_input.payload).unwrap(),
            MainNotice {
                shard,
                owner: owner(),
                verifier_template_hash: verifier_template(),
                shard_id,
            }
        );

        let shard_input = &inputs[1];
        assert_eq!(shard_input.receipt.target, shard);
        assert_eq!(
            ShardNotice::decode(&shard_input.payload).unwrap(),
            ShardNotice { main_unit: main }
        );
    }

    #[test]
    fn test_main_notice_byte_layout() {
        let service = service();
        let main = deploy_main(&service);
        let shard_id = ShardId::from_u64(1);
        let shard = service
            .create_shard(&main, &owner(), &verifier_template(), &shard_id)
            .unwrap();

        let payload = &service.queue().inputs_for(&main)[0].payload;
        assert_eq!(payload.len(), MAIN_NOTICE_LEN);
        assert_eq!(&payload[0..20], shard.as_bytes());
        assert_eq!(&payload[20..40], owner().as_bytes());
        assert_eq!(&payload[40..72], verifier_template().as_bytes());
        assert_eq!(&payload[72..104], shard_id.as_bytes());
    }

    #[test]
    fn test_shard_is_owned_by_requester_and_bound_to_main() {
        let service = service();
        let main = deploy_main(&service);
        let shard = service
            .create_shard(&main, &owner(), &verifier_template(), &ShardId::from_u64(1))
            .unwrap();

        let created = service.factory().unit(&shard).unwrap();
        assert_eq!(created.owner, owner());
        assert_eq!(created.parent, main);
        assert_eq!(created.template_hash, verifier_template());
        assert_eq!(service.factory().unit_count(), 2);
    }

    #[test]
    fn test_owner_does_not_move_the_shard() {
        let first = service();
        let second = service();
        let main = deploy_main(&first);
        assert_eq!(deploy_main(&second), main);

        let other_owner = UnitAddress::new([0x42; 20]);
        let a = first
            .create_shard(&main, &owner(), &verifier_template(), &ShardId::from_u64(1))
            .unwrap();
        let b = second
            .create_shard(&main, &other_owner, &verifier_template(), &ShardId::from_u64(1))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_shard_rejected_without_notices() {
        let service = service();
        let main = deploy_main(&service);
        let shard_id = ShardId::from_u64(1);

        let shard = service
            .create_shard(&main, &owner(), &verifier_template(), &shard_id)
            .unwrap();
        let second = service.create_shard(&main, &owner(), &verifier_template(), &shard_id);

        assert_eq!(second, Err(RegistryError::IdentityCollision(shard)));
        assert_eq!(service.queue().len(), 2);
        assert_eq!(service.stats().identity_collisions, 1);
    }

    #[test]
    fn test_shards_of_one_main_share_its_inbox() {
        let service = service();
        let main = deploy_main(&service);

        let shards: Vec<_> = (1..=3)
            .map(|n| {
                service
                    .create_shard(&main, &owner(), &verifier_template(), &ShardId::from_u64(n))
                    .unwrap()
            })
            .collect();

        let main_inbox = service.queue().inputs_for(&main);
        assert_eq!(main_inbox.len(), 3);
        for (index, (entry, shard)) in main_inbox.iter().zip(&shards).enumerate() {
            assert_eq!(entry.receipt.index, index as u64);
            match Notice::classify(&entry.payload).unwrap() {
                Notice::Main(notice) => assert_eq!(notice.shard, *shard),
                other => panic!("expected main notice, got {other:?}"),
            }
        }

        for shard in &shards {
            let inbox = service.queue().inputs_for(shard);
            assert_eq!(inbox.len(), 1);
            assert_eq!(inbox[0].receipt.index, 0);
        }
    }

    #[test]
    fn test_creation_under_different_factory_differs() {
        let service = service();
        let main = deploy_main(&service);

        let mut other = config();
        other.factory_address = UnitAddress::new([0x99; 20]);
        let elsewhere = other
            .deriver()
            .derive(&main, &verifier_template(), &ShardId::from_u64(1));

        assert_ne!(
            service.calculate_shard_address(&main, &verifier_template(), &ShardId::from_u64(1)),
            elsewhere
        );
    }
}
