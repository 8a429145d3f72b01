#[cfg(test)]
mod tests {
    use crate::bridge::{BridgeAdapter, BridgeController, BridgeResult, ReceiveEvents};
    use crate::config::{BridgeConfig, ConnectionTarget};
    use crate::forwarder::{ForwardError, ForwardOutcome, Forwarder};
    use crate::protocol::{Command, Header};
    use std::time::Duration;
    use tokio_test::assert_ok;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::{Instant, timeout};

    async fn local_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    fn target_for(listener: &TcpListener, response_timeout: Option<Duration>) -> ConnectionTarget {
        ConnectionTarget {
            addr: listener.local_addr().unwrap(),
            response_timeout,
        }
    }

    async fn test_bridge(listener: &TcpListener, timeout_ms: Option<u64>) -> BridgeController {
        let addr = listener.local_addr().unwrap();
        let config = BridgeConfig {
            target_address: addr.ip().to_string(),
            target_port: addr.port(),
            response_timeout_ms: timeout_ms,
        };
        BridgeController::connect(&config).await.unwrap()
    }

    #[tokio::test]
    async fn forward_writes_header_then_body() {
        let listener = local_listener().await;
        let forwarder = Forwarder::new(target_for(&listener, None));

        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = Vec::new();
            socket.read_to_end(&mut wire).await.unwrap();
            wire
        });

        let command = Command::MotorSpeed {
            left: 100,
            right: -100,
        };
        let outcome = tokio_test::assert_ok!(forwarder.forward(&command).await);
        assert_eq!(outcome, ForwardOutcome::Sent);

        let wire = peer.await.unwrap();
        assert_eq!(wire, vec![2, 0, 8, 0, 0, 0, 100, 0, 0, 0xFF, 0x9C]);
    }

    #[tokio::test]
    async fn bodiless_command_sends_header_only() {
        let listener = local_listener().await;
        let forwarder = Forwarder::new(target_for(&listener, None));

        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = Vec::new();
            socket.read_to_end(&mut wire).await.unwrap();
            wire
        });

        let outcome = tokio_test::assert_ok!(forwarder.forward(&Command::MotorStop).await);
        assert_eq!(outcome, ForwardOutcome::Sent);
        assert_eq!(peer.await.unwrap(), vec![3, 0, 0]);
    }

    #[tokio::test]
    async fn acknowledgment_header_is_reported() {
        let listener = local_listener().await;
        let forwarder = Forwarder::new(target_for(&listener, Some(Duration::from_secs(2))));

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = [0u8; 7];
            socket.read_exact(&mut wire).await.unwrap();
            // Status byte 1 = peer handled the command
            socket.write_all(&[1, 0, 0]).await.unwrap();
        });

        let command = Command::MotorSettings { value: 42 };
        let outcome = tokio_test::assert_ok!(forwarder.forward(&command).await);
        assert_eq!(
            outcome,
            ForwardOutcome::Acknowledged(Header {
                command_id: 1,
                body_length: 0
            })
        );
    }

    #[tokio::test]
    async fn silent_peer_times_out_within_bound() {
        let listener = local_listener().await;
        let forwarder = Forwarder::new(target_for(&listener, Some(Duration::from_millis(100))));

        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = [0u8; 3];
            socket.read_exact(&mut wire).await.unwrap();
            // Hold the socket open without replying
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let started = Instant::now();
        let outcome = tokio_test::assert_ok!(forwarder.forward(&Command::MotorStop).await);
        assert_eq!(outcome, ForwardOutcome::NoAcknowledgment);
        assert!(started.elapsed() < Duration::from_secs(2));

        peer.abort();
    }

    #[tokio::test]
    async fn peer_disconnect_counts_as_no_acknowledgment() {
        let listener = local_listener().await;
        let forwarder = Forwarder::new(target_for(&listener, Some(Duration::from_secs(2))));

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = [0u8; 3];
            socket.read_exact(&mut wire).await.unwrap();
            // Close without writing a full header back
            socket.write_all(&[1]).await.unwrap();
        });

        let outcome = tokio_test::assert_ok!(forwarder.forward(&Command::MotorStop).await);
        assert_eq!(outcome, ForwardOutcome::NoAcknowledgment);
    }

    #[tokio::test]
    async fn unreachable_target_reports_connect_failure() {
        // Bind then drop to get a port with nothing listening
        let listener = local_listener().await;
        let target = target_for(&listener, Some(Duration::from_millis(500)));
        drop(listener);

        let forwarder = Forwarder::new(target);
        let err = forwarder.forward(&Command::MotorStop).await.unwrap_err();
        assert!(matches!(err, ForwardError::ConnectFailed(_)));
    }

    #[tokio::test]
    async fn bridge_forwards_valid_payload_end_to_end() {
        let listener = local_listener().await;
        let bridge = test_bridge(&listener, Some(1000)).await;

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = [0u8; 11];
            socket.read_exact(&mut wire).await.unwrap();
            assert_eq!(wire, [2, 0, 8, 0, 0, 0, 100, 0, 0, 0xFF, 0x9C]);
            socket.write_all(&[1, 0, 0]).await.unwrap();
        });

        // Command 2, left=100, right=-100 in network order
        let payload = [2, 0, 0, 0, 100, 0, 0, 0xFF, 0x9C];
        let result = bridge.on_payload_received(&payload).await;
        assert!(result.is_delivered());
        assert!(matches!(
            result,
            BridgeResult::Forwarded(ForwardOutcome::Acknowledged(Header {
                command_id: 1,
                body_length: 0
            }))
        ));
    }

    #[tokio::test]
    async fn bad_payload_never_touches_the_network() {
        let listener = local_listener().await;
        let bridge = test_bridge(&listener, Some(1000)).await;

        let result = bridge.on_payload_received(&[9, 1, 2, 3]).await;
        assert!(!result.is_delivered());
        assert!(matches!(result, BridgeResult::DecodeFailed(_)));

        // No connection should have been attempted
        let attempt = timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(attempt.is_err());
    }

    #[tokio::test]
    async fn unreachable_target_is_a_per_payload_failure() {
        let listener = local_listener().await;
        let bridge = test_bridge(&listener, Some(500)).await;
        drop(listener);

        let result = bridge.on_payload_received(&[3]).await;
        assert!(matches!(
            result,
            BridgeResult::ForwardFailed(ForwardError::ConnectFailed(_))
        ));
        bridge.shutdown();
    }

    #[tokio::test]
    async fn adapter_drops_missing_payload() {
        let listener = local_listener().await;
        let bridge = test_bridge(&listener, None).await;
        let adapter = BridgeAdapter::new(bridge);

        adapter.on_receiving(0);
        // Upstream decode failure: nothing must be forwarded
        adapter.on_received(None, 0).await;

        let attempt = timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(attempt.is_err());
    }

    #[tokio::test]
    async fn adapter_hands_payload_to_bridge() {
        let listener = local_listener().await;
        let bridge = test_bridge(&listener, None).await;
        let adapter = BridgeAdapter::new(bridge);

        let peer = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut wire = Vec::new();
            socket.read_to_end(&mut wire).await.unwrap();
            wire
        });

        adapter.on_received(Some(&[3]), 1).await;
        assert_eq!(peer.await.unwrap(), vec![3, 0, 0]);
    }
}
