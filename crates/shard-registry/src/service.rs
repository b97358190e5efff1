//! # Shard Registry Service
//!
//! Orchestrates shard creation over the factory and input queue ports.
//!
//! ## Flow
//!
//! ```text
//! create_shard(main, owner, template, shard_id)
//!   │
//!   ├─ 1. expected = derive(main, template, shard_id)
//!   ├─ 2. created  = factory.create(parent=main, owner, template, salt=shard_id)
//!   ├─ 3. created.address == expected ?          ── no ──→ AddressMismatch
//!   ├─ 4. MainNotice  → main                     ┐
//!   ├─ 5. ShardNotice → created.address          ┘ one ordered batch
//!   └─ 6. return created.address
//! ```
//!
//! Steps 2–5 are all-or-nothing: when a step after creation fails, any
//! notices already appended are retracted and the created unit is discarded
//! before the error is returned.

use crate::config::RegistryConfig;
use crate::domain::{
    invariant_address_agreement, invariant_notice_order, shard_key, AddressDeriver,
    Create2Deriver, InputReceipt, MainNotice, RegistryError, ShardCreation, ShardId, ShardNotice,
    TemplateHash, UnitAddress, UnitCreation,
};
use crate::ports::inbound::ShardRegistryApi;
use crate::ports::outbound::{retract_all, InputQueue, UnitFactory};
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Create a shard of `main` and notify both units.
///
/// Runs the whole protocol once, with no locking of its own. Callers that may
/// race on the same tuple should go through [`ShardRegistryService`].
pub fn create_shard<D, F, Q>(
    deriver: &D,
    factory: &F,
    queue: &Q,
    main: &UnitAddress,
    owner: &UnitAddress,
    verifier_template_hash: &TemplateHash,
    shard_id: &ShardId,
) -> Result<ShardCreation, RegistryError>
where
    D: AddressDeriver + ?Sized,
    F: UnitFactory + ?Sized,
    Q: InputQueue + ?Sized,
{
    let expected = deriver.derive(main, verifier_template_hash, shard_id);
    debug!(expected = %expected, "Derived shard address");

    let created = factory.create(&UnitCreation {
        parent: *main,
        owner: *owner,
        template_hash: *verifier_template_hash,
        salt: *shard_id,
    })?;
    let shard = created.address;

    if let Err(err) = invariant_address_agreement(&expected, &shard) {
        error!(
            expected = %expected,
            actual = %shard,
            "Factory created shard at an unexpected address"
        );
        return Err(compensate(factory, &shard, err));
    }

    let main_notice = MainNotice {
        shard,
        owner: *owner,
        verifier_template_hash: *verifier_template_hash,
        shard_id: *shard_id,
    };
    let shard_notice = ShardNotice { main_unit: *main };

    let receipts = match queue.append_batch(&[
        (*main, main_notice.encode()),
        (shard, shard_notice.encode()),
    ]) {
        Ok(receipts) => receipts,
        Err(err) => return Err(compensate(factory, &shard, err)),
    };

    let (main_receipt, shard_receipt) = match receipts.as_slice() {
        [first, second] => (*first, *second),
        other => {
            let err = RegistryError::Queue(format!(
                "expected 2 receipts for shard notices, got {}",
                other.len()
            ));
            return Err(roll_back(factory, queue, &shard, &receipts, err));
        }
    };

    if let Err(err) = invariant_notice_order(main, &shard, &main_receipt, &shard_receipt) {
        return Err(roll_back(factory, queue, &shard, &receipts, err));
    }

    Ok(ShardCreation {
        shard,
        created,
        main_receipt,
        shard_receipt,
    })
}

/// Retract committed notices, then discard the unit, and hand back `cause`.
fn roll_back<F, Q>(
    factory: &F,
    queue: &Q,
    shard: &UnitAddress,
    receipts: &[InputReceipt],
    cause: RegistryError,
) -> RegistryError
where
    F: UnitFactory + ?Sized,
    Q: InputQueue + ?Sized,
{
    if let Err(retract_err) = retract_all(queue, receipts) {
        error!(
            shard = %shard,
            cause = %cause,
            error = %retract_err,
            "Failed to retract shard notices after aborted creation"
        );
    }
    compensate(factory, shard, cause)
}

/// Discard the unit created in this orchestration and hand back `cause`.
fn compensate<F: UnitFactory + ?Sized>(
    factory: &F,
    shard: &UnitAddress,
    cause: RegistryError,
) -> RegistryError {
    if let Err(discard_err) = factory.discard(shard) {
        error!(
            shard = %shard,
            cause = %cause,
            error = %discard_err,
            "Failed to discard shard after aborted creation"
        );
    } else {
        warn!(shard = %shard, cause = %cause, "Shard creation aborted; unit discarded");
    }
    cause
}

/// Statistics for the Shard Registry Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Shards created and notified.
    pub shards_created: u64,
    /// Notices appended (two per created shard).
    pub notices_appended: u64,
    /// Requests rejected because the address was taken.
    pub identity_collisions: u64,
    /// Factory placed a shard somewhere unexpected.
    pub address_mismatches: u64,
    /// Any other failure.
    pub other_failures: u64,
}

/// Critical sections keyed by shard tuple.
///
/// Tuples hash onto a fixed set of mutexes so calls for the same tuple
/// serialize while unrelated tuples rarely contend.
struct TupleLocks {
    stripes: Vec<Mutex<()>>,
}

impl TupleLocks {
    fn new(count: usize) -> Self {
        Self {
            stripes: (0..count.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    fn lock(&self, key: &[u8; 32]) -> MutexGuard<'_, ()> {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&key[..8]);
        let stripe = (u64::from_be_bytes(prefix) % self.stripes.len() as u64) as usize;
        self.stripes[stripe].lock()
    }
}

/// The Shard Registry Service.
///
/// This service:
/// 1. Predicts shard addresses
/// 2. Creates shards through the factory
/// 3. Notifies main unit and shard through the input queue
/// 4. Maintains creation statistics
pub struct ShardRegistryService<D: AddressDeriver, F: UnitFactory, Q: InputQueue> {
    /// Address deriver.
    deriver: D,
    /// Application factory adapter.
    factory: F,
    /// Input queue adapter.
    queue: Q,
    /// Per-tuple critical sections.
    locks: TupleLocks,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<F: UnitFactory, Q: InputQueue> ShardRegistryService<Create2Deriver, F, Q> {
    /// Service deriving addresses from `config`.
    pub fn from_config(config: &RegistryConfig, factory: F, queue: Q) -> Self {
        Self::new(config.deriver(), factory, queue, config.lock_stripes)
    }
}

impl<D: AddressDeriver, F: UnitFactory, Q: InputQueue> ShardRegistryService<D, F, Q> {
    /// Create a new Shard Registry Service.
    pub fn new(deriver: D, factory: F, queue: Q, lock_stripes: usize) -> Self {
        Self {
            deriver,
            factory,
            queue,
            locks: TupleLocks::new(lock_stripes),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Factory adapter.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Input queue adapter.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    fn record(&self, result: &Result<ShardCreation, RegistryError>) {
        let mut stats = self.stats.write();
        match result {
            Ok(_) => {
                stats.shards_created += 1;
                stats.notices_appended += 2;
            }
            Err(RegistryError::IdentityCollision(_)) => stats.identity_collisions += 1,
            Err(RegistryError::AddressMismatch { .. }) => stats.address_mismatches += 1,
            Err(_) => stats.other_failures += 1,
        }
    }
}

impl<D: AddressDeriver, F: UnitFactory, Q: InputQueue> ShardRegistryApi
    for ShardRegistryService<D, F, Q>
{
    fn calculate_shard_address(
        &self,
        main: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> UnitAddress {
        self.deriver.derive(main, verifier_template_hash, shard_id)
    }

    #[instrument(
        skip_all,
        fields(
            correlation_id = %Uuid::new_v4(),
            main = %main,
            shard_id = %shard_id,
        )
    )]
    fn create_shard_detailed(
        &self,
        main: &UnitAddress,
        owner: &UnitAddress,
        verifier_template_hash: &TemplateHash,
        shard_id: &ShardId,
    ) -> Result<ShardCreation, RegistryError> {
        let key = shard_key(main, verifier_template_hash, shard_id);
        let result = {
            let _guard = self.locks.lock(&key);
            create_shard(
                &self.deriver,
                &self.factory,
                &self.queue,
                main,
                owner,
                verifier_template_hash,
                shard_id,
            )
        };
        self.record(&result);

        match &result {
            Ok(creation) => info!(
                shard = %creation.shard,
                owner = %owner,
                template = %verifier_template_hash,
                main_index = creation.main_receipt.index,
                shard_index = creation.shard_receipt.index,
                "Shard created"
            ),
            Err(RegistryError::IdentityCollision(address)) => {
                warn!(shard = %address, "Shard already exists")
            }
            Err(err) if err.is_fatal() => error!(error = %err, "Shard creation failed fatally"),
            Err(err) => warn!(error = %err, "Shard creation failed"),
        }

        result
    }
}
