use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::sys::server;
use anyhow::Context;
use async_channel::{Receiver, Sender};
use orbit_core::Request;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the socket server and the config watcher on their own Tokio thread.
/// The GUI thread only talks to them through the two channels.
pub fn start_background_services(
    config: &Config,
    tx: Sender<AppEvent>,
    requests: Receiver<Request>,
) -> anyhow::Result<()> {
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let socket_path = config.socket_path.clone();

    thread::Builder::new()
        .name("orbit-runtime".into())
        .spawn(move || {
            rt.block_on(async {
                tokio::join!(
                    server::run_server(socket_path, tx.clone(), requests),
                    config::run_async_watcher(tx),
                );
            });
            log::warn!("Background services stopped");
        })
        .context("Failed to spawn runtime thread")?;

    Ok(())
}
