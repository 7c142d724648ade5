//! # Nonce Queue Integration Flows
//!
//! ## Flows Tested:
//!
//! 1. **RPC → Queue → Mempool**: scheduled reconciler releases an operation
//!    once the chain catches up, over the mempool channel
//! 2. **Sequential nonces**: a chain of operations from one account drains
//!    one per pass as the mempool "executes" them
//! 3. **Ledger outage**: reads fail, entries are kept, then the retention
//!    window drops them
//! 4. **Closed mempool**: release is one-shot even when the pool is gone

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use qc_18_nonce_queue::{
        compose_nonce, Address, ChannelOperationSink, FetchMode, InMemoryLedger,
        ManualTimeSource, NonceQueueApi, NonceQueueConfig, NonceQueueService, RunOutcome,
        UserOperation, U256,
    };

    use crate::integration::init_test_logging;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ENTRY_POINT: Address = [0x5F; 20];
    const START: u64 = 1_700_000_000_000;

    fn create_user_op(sender_byte: u8, key: u64, sequence: u64) -> UserOperation {
        UserOperation {
            sender: [sender_byte; 20],
            nonce: compose_nonce(U256::from(key), sequence),
            call_data: vec![0xb6, 0x1d, 0x27, 0xf6, sender_byte],
            call_gas_limit: U256::from(100_000u64),
            verification_gas_limit: U256::from(150_000u64),
            pre_verification_gas: U256::from(21_000u64),
            max_fee_per_gas: U256::from(2_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            signature: vec![0x01; 65],
            ..Default::default()
        }
    }

    fn set_chain(ledger: &InMemoryLedger, sender_byte: u8, key: u64, sequence: u64) {
        ledger.set_sequence(ENTRY_POINT, [sender_byte; 20], U256::from(key), sequence);
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    /// A is released, B keeps waiting, C outlives the retention window
    #[tokio::test]
    async fn test_scheduled_reconciler_releases_to_mempool() {
        init_test_logging();

        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(ManualTimeSource::new(START));
        let (sink, mut mempool_rx) = ChannelOperationSink::channel(16);
        let config = NonceQueueConfig::for_testing();
        let retention = config.retention_ms;

        let service = Arc::new(
            NonceQueueService::new(config, ledger.clone(), Arc::new(sink))
                .unwrap()
                .with_time_source(clock.clone()),
        );

        let c = service.enqueue(create_user_op(0xCC, 0, 0), ENTRY_POINT).unwrap();
        clock.advance(retention + 1);
        let a = service.enqueue(create_user_op(0xAA, 0, 3), ENTRY_POINT).unwrap();
        let b = service.enqueue(create_user_op(0xBB, 0, 5), ENTRY_POINT).unwrap();
        set_chain(&ledger, 0xAA, 0, 3);
        set_chain(&ledger, 0xBB, 0, 4);

        service.start().unwrap();

        let released = timeout(Duration::from_secs(2), mempool_rx.recv())
            .await
            .expect("timeout waiting for release")
            .expect("mempool channel open");
        assert_eq!(released.operation.sender, [0xAA; 20]);
        assert_eq!(released.entry_point, ENTRY_POINT);

        service.stop().await.unwrap();

        assert!(!service.contains(&a));
        assert!(service.contains(&b));
        assert!(!service.contains(&c));
        assert!(mempool_rx.try_recv().is_err());
    }

    /// Operations 0..3 from one account drain one per pass
    #[tokio::test]
    async fn test_sequential_nonces_drain_in_order() {
        init_test_logging();

        let ledger = Arc::new(InMemoryLedger::new());
        let (sink, mut mempool_rx) = ChannelOperationSink::channel(16);
        let service =
            NonceQueueService::new(NonceQueueConfig::default(), ledger.clone(), Arc::new(sink))
                .unwrap();

        for sequence in (0..3).rev() {
            service
                .enqueue(create_user_op(0xAA, 0, sequence), ENTRY_POINT)
                .unwrap();
        }

        for expected in 0..3u64 {
            let report = service.reconcile_once().await;
            assert_eq!(report.resubmitted, 1);

            let released = mempool_rx.recv().await.unwrap();
            assert_eq!(released.operation.nonce.low_u64(), expected);

            // Mempool includes it; the chain moves on
            set_chain(&ledger, 0xAA, 0, expected + 1);
        }

        assert!(service.is_empty());
        let report = service.reconcile_once().await;
        assert_eq!(report.outcome, RunOutcome::Idle);
    }

    /// Persistent read failures keep entries until the retention window ends
    #[tokio::test]
    async fn test_ledger_outage_bounded_by_retention() {
        init_test_logging();

        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(ManualTimeSource::new(START));
        let (sink, _mempool_rx) = ChannelOperationSink::channel(16);
        let config = NonceQueueConfig::default();
        let retention = config.retention_ms;
        let service = NonceQueueService::new(config, ledger.clone(), Arc::new(sink))
            .unwrap()
            .with_time_source(clock.clone());

        service.enqueue(create_user_op(0xAA, 0, 0), ENTRY_POINT).unwrap();
        service.enqueue(create_user_op(0xBB, 2, 0), ENTRY_POINT).unwrap();
        ledger.set_batch_unavailable(true);
        ledger.fail_sender([0xAA; 20]);
        ledger.fail_sender([0xBB; 20]);

        let report = service.reconcile_once().await;
        assert_eq!(report.fetch_mode, Some(FetchMode::PerEntry));
        assert_eq!(report.deferred, 2);
        assert_eq!(service.len(), 2);

        clock.advance(retention + 1);
        let calls_before = ledger.single_calls();
        let report = service.reconcile_once().await;

        assert_eq!(report.evicted, 2);
        assert_eq!(report.outcome, RunOutcome::Idle);
        assert_eq!(ledger.single_calls(), calls_before);
        assert!(service.is_empty());

        let stats = service.stats();
        assert_eq!(stats.fallbacks.load(std::sync::atomic::Ordering::Relaxed), 1);
        assert_eq!(stats.evicted.load(std::sync::atomic::Ordering::Relaxed), 2);
    }

    /// A closed mempool rejects the release; the operation is not queued again
    #[tokio::test]
    async fn test_closed_mempool_rejection_is_final() {
        init_test_logging();

        let ledger = Arc::new(InMemoryLedger::new());
        let (sink, mempool_rx) = ChannelOperationSink::channel(1);
        drop(mempool_rx);
        let service =
            NonceQueueService::new(NonceQueueConfig::default(), ledger.clone(), Arc::new(sink))
                .unwrap();

        let hash = service.enqueue(create_user_op(0xAA, 0, 0), ENTRY_POINT).unwrap();

        let report = service.reconcile_once().await;

        assert_eq!(report.rejected, 1);
        assert!(!service.contains(&hash));
        assert_eq!(service.reconcile_once().await.outcome, RunOutcome::Idle);
    }
}
