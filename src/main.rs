//! Manual test harness for the bridge.
//!
//! Stands in for the audio channel: listens on TCP and treats each
//! hex-encoded line as one received payload, handing it to the bridge
//! exactly like a completed reception event. Lines that are not valid
//! hex are reported as upstream decode failures.
//!
//! Usage: chirp-bridge <config.json> [listen_addr]

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;

use chirp_bridge::{BridgeAdapter, BridgeConfig, BridgeController, ReceiveEvents};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .get(1)
        .context("usage: chirp-bridge <config.json> [listen_addr]")?;
    let listen_addr = args.get(2).map(String::as_str).unwrap_or("0.0.0.0:4040");

    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path))?;
    let config: BridgeConfig = serde_json::from_str(&raw).context("invalid config")?;

    let bridge = BridgeController::connect(&config)
        .await
        .context("failed to resolve forward target")?;
    let adapter = Arc::new(BridgeAdapter::new(bridge));

    let listener = TcpListener::bind(listen_addr).await?;
    println!("Listening for hex payload lines on {}", listen_addr);

    loop {
        let (socket, addr) = listener.accept().await?;
        println!("New connection from {}", addr);

        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move {
            let mut reader = BufReader::new(socket);
            let mut line = String::new();

            loop {
                line.clear();

                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        println!("Connection closed by {}", addr);
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("Read error from {}: {:?}", addr, e);
                        return;
                    }
                }

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                adapter.on_receiving(0);
                match hex::decode(trimmed) {
                    Ok(payload) => adapter.on_received(Some(&payload), 0).await,
                    Err(_) => adapter.on_received(None, 0).await,
                }
            }
        });
    }
}
