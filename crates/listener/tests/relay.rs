//! Integration tests of the listener driving the deposit and rotate handlers.

use alloy_primitives::{address, b256, Address, Bytes, B256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use spectre_evm::abi::logs::Deposit;
use spectre_listener::{
    DepositEventHandler, EventHandler, Listener, ListenerConfig, ListenerError,
    RotateEventHandler,
};
use spectre_primitives::{BlockRange, MessageBatch, MessageKind, MessagePayload};
use spectre_providers::test_utils::{
    beacon_block, finality_checkpoints, sync_committee, MockBeaconProvider, MockEventFetcher,
    MockProver,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const BRIDGE_ADDRESS: Address = address!("0xb0b13f0109ef097C3Aa70Fb543EA4942114A845d");
const USER: Address = address!("0xd68eb9b5E135b96c1Af165e1D8c4e2eB0E1CE4CD");
const FINALIZED_ROOT: B256 =
    b256!("0x00000000000000000000000000000000000000000000000000000000000000f1");
const JUSTIFIED_ROOT: B256 =
    b256!("0x00000000000000000000000000000000000000000000000000000000000000f2");

const CONFIG: ListenerConfig =
    ListenerConfig { domain_id: 1, retry_interval: Duration::from_millis(5), block_interval: 32 };

fn deposit_log(nonce: u64) -> Log {
    let event = Deposit {
        destinationDomainID: 2,
        securityModel: 1,
        resourceID: B256::with_last_byte(1),
        depositNonce: nonce,
        user: USER,
        data: Bytes::from_static(&[0xde, 0xad]),
    };
    let mut log = Log::default();
    log.inner.address = BRIDGE_ADDRESS;
    log.inner.data = event.encode_log_data();
    log
}

fn beacon_provider() -> Arc<MockBeaconProvider> {
    let provider = Arc::new(MockBeaconProvider::default());
    provider
        .push_finality(finality_checkpoints(7, FINALIZED_ROOT, JUSTIFIED_ROOT))
        .insert_block(JUSTIFIED_ROOT, beacon_block(224))
        .push_sync_committee(sync_committee([5, 6, 7]));
    provider
}

async fn recv(rx: &mut mpsc::Receiver<MessageBatch>) -> eyre::Result<MessageBatch> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await?
        .ok_or_else(|| eyre::eyre!("channel closed"))
}

#[tokio::test]
async fn test_should_relay_deposits_then_rotations() -> eyre::Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Given
    let beacon = beacon_provider();
    let fetcher = Arc::new(MockEventFetcher::default());
    fetcher.push_logs(vec![deposit_log(1), deposit_log(2)]);
    let prover = Arc::new(MockProver::default());
    let (tx, mut rx) = mpsc::channel(1);

    let handlers: Vec<Box<dyn EventHandler>> = vec![
        Box::new(DepositEventHandler::new(tx.clone(), fetcher.clone(), BRIDGE_ADDRESS, 1)),
        Box::new(RotateEventHandler::new(1, vec![2, 3], tx, beacon.clone(), prover.clone())),
    ];
    let listener = Listener::new(beacon.clone(), handlers, CONFIG);
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(listener.run(shutdown.clone(), 7));

    // When
    let deposits = recv(&mut rx).await?;
    let first_rotation = recv(&mut rx).await?;
    let second_rotation = recv(&mut rx).await?;

    // Then
    let nonces: Vec<_> = deposits
        .iter()
        .map(|message| match &message.payload {
            MessagePayload::Deposit(deposit) => deposit.deposit_nonce,
            MessagePayload::Rotate(_) => unreachable!("expected deposit"),
        })
        .collect();
    assert_eq!(nonces, vec![1, 2]);

    for (batch, destination) in [(first_rotation, 2), (second_rotation, 3)] {
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind(), MessageKind::Rotate);
        assert_eq!(batch[0].destination, destination);
        let MessagePayload::Rotate(data) = &batch[0].payload else { unreachable!() };
        assert_eq!(data.block_number, 224);
    }

    let requests = fetcher.requests();
    assert_eq!((requests[0].from_block, requests[0].to_block), (192, 224));

    // the checkpoint is handled once, later ticks stay idle.
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle).await??;

    assert!(rx.try_recv().is_err());
    assert_eq!(fetcher.requests().len(), 1);
    assert_eq!(prover.step_calls(), 1);
    assert!(beacon.finality_calls() > 1);

    Ok(())
}

#[tokio::test]
async fn test_should_replay_range_after_rotation_failure() -> eyre::Result<()> {
    // Given
    let beacon = beacon_provider();
    let fetcher = Arc::new(MockEventFetcher::default());
    fetcher.push_logs(vec![deposit_log(1)]).push_logs(vec![deposit_log(1)]);
    let prover = Arc::new(MockProver::failing_step("Error"));
    let (tx, mut rx) = mpsc::channel(4);

    let handlers: Vec<Box<dyn EventHandler>> = vec![
        Box::new(DepositEventHandler::new(tx.clone(), fetcher.clone(), BRIDGE_ADDRESS, 1)),
        Box::new(RotateEventHandler::new(1, vec![2], tx, beacon.clone(), prover.clone())),
    ];
    let mut listener = Listener::new(beacon, handlers, CONFIG);

    // When
    let first = listener.step().await;
    let second = listener.step().await;

    // Then
    let range = BlockRange::new(192, 224);
    for res in [first, second] {
        assert!(
            matches!(res, Err(ListenerError::Handler { index: 1, range: r, .. }) if r == range)
        );
    }
    assert_eq!(listener.latest_checkpoint(), B256::ZERO);
    assert_eq!(fetcher.requests().len(), 2);
    assert_eq!(prover.step_calls(), 2);

    // deposits are delivered at least once, rotations never without proofs.
    for _ in 0..2 {
        let batch = rx.try_recv()?;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind(), MessageKind::Deposit);
    }
    assert!(rx.try_recv().is_err());

    Ok(())
}
