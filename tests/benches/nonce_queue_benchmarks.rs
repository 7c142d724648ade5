//! # Nonce Queue Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Operation hash | < 10µs per op |
//! | Reconcile pass, batched read | < 5ms for 1,000 entries |
//! | Reconcile pass, per-entry fallback | < 20ms for 1,000 entries |
//!
//! Entries are kept ineligible so every iteration reconciles the same queue.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_nonce_queue::{
    compose_nonce, compute_operation_hash, Address, InMemoryLedger, NonceQueueApi,
    NonceQueueConfig, NonceQueueService, OperationSink, UserOperation, U256,
};
use std::sync::Arc;
use std::time::Duration;

const ENTRY_POINT: Address = [0x5F; 20];

struct DiscardSink;

#[async_trait::async_trait]
impl OperationSink for DiscardSink {
    async fn accept(&self, _operation: UserOperation, _entry_point: Address) -> bool {
        true
    }
}

fn create_user_op(index: u32, sequence: u64) -> UserOperation {
    let mut sender = [0x01; 20];
    sender[16..].copy_from_slice(&index.to_be_bytes());
    UserOperation {
        sender,
        nonce: compose_nonce(U256::zero(), sequence),
        call_data: vec![0xAB; 256],
        call_gas_limit: U256::from(100_000u64),
        max_fee_per_gas: U256::from(2_000_000_000u64),
        signature: vec![0x01; 65],
        ..Default::default()
    }
}

fn bench_operation_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-operation-hash");
    let op = create_user_op(1, 0);

    group.bench_function("compute_operation_hash", |b| {
        b.iter(|| black_box(compute_operation_hash(&op, &ENTRY_POINT, 1)))
    });

    group.finish();
}

fn bench_reconcile_pass(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("qc-18-reconcile");
    group.measurement_time(Duration::from_secs(10));

    for size in [100u32, 1_000] {
        for fallback in [false, true] {
            let ledger = Arc::new(InMemoryLedger::new());
            ledger.set_batch_unavailable(fallback);
            let service = NonceQueueService::new(
                NonceQueueConfig::default(),
                ledger.clone(),
                Arc::new(DiscardSink),
            )
            .unwrap();
            // Chain sits at 0, every op waits for 1
            for i in 0..size {
                service.enqueue(create_user_op(i, 1), ENTRY_POINT).unwrap();
            }

            let name = if fallback { "per_entry" } else { "batched" };
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &service, |b, service| {
                b.iter(|| black_box(rt.block_on(service.reconcile_once())))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_operation_hash, bench_reconcile_pass);
criterion_main!(benches);
