use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use orbit_core::host::{self, Host, HostEvent, OpenPayload, ProtocolError, Request};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};

/// Outbound half of the host link as seen from the GUI thread.
#[derive(Debug, Clone)]
pub struct HostLink(Sender<Request>);

impl HostLink {
    pub fn new(tx: Sender<Request>) -> Self {
        Self(tx)
    }
}

impl Host for HostLink {
    fn send(&mut self, request: Request) {
        if let Err(e) = self.0.try_send(request) {
            log::error!("Failed to queue {:?} for host: {}", request, e);
        }
    }
}

/// Identifies one accepted socket connection for the lifetime of the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ConnectionId(u64);

/// Connection bookkeeping sent from the readers to the request forwarder.
#[derive(Debug)]
enum Link {
    Connected(ConnectionId, OwnedWriteHalf),
    /// The connection opened a menu and now receives outbound requests.
    Promote(ConnectionId),
    Disconnected(ConnectionId),
}

pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>, requests: Receiver<Request>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(&socket_path).is_ok() {
        let _ = std::fs::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    let (link_tx, link_rx) = async_channel::unbounded();
    tokio::spawn(forward_requests(requests, link_rx));

    let mut next_id = 0;
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let id = ConnectionId(next_id);
                next_id += 1;
                tokio::spawn(handle_connection(id, stream, tx.clone(), link_tx.clone()));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Reads host events from one connection. The connection that most recently opened a menu
/// is the host that receives outbound requests, so one-shot `refresh`/`close` clients never
/// steal it.
async fn handle_connection(
    id: ConnectionId,
    stream: UnixStream,
    tx: Sender<AppEvent>,
    links: Sender<Link>,
) {
    let (read, write) = stream.into_split();
    if links.send(Link::Connected(id, write)).await.is_err() {
        return;
    }

    let mut reader = BufReader::new(read);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Stopped reading from host connection: {}", e);
                break;
            }
        }

        let event = match host::decode_bytes::<HostEvent>(&line) {
            Ok(event) => event,
            Err(ProtocolError::Empty) => continue,
            Err(e) => {
                log::error!("Dropping host message: {}", e);
                continue;
            }
        };

        if matches!(event, HostEvent::OpenRadialMenu(OpenPayload::Show(_)))
            && links.send(Link::Promote(id)).await.is_err()
        {
            break;
        }

        if tx.send(AppEvent::Host(event)).await.is_err() {
            break;
        }
    }

    let _ = links.send(Link::Disconnected(id)).await;
}

async fn forward_requests(requests: Receiver<Request>, links: Receiver<Link>) {
    let mut writers: HashMap<ConnectionId, OwnedWriteHalf> = HashMap::new();
    let mut host: Option<ConnectionId> = None;

    loop {
        tokio::select! {
            biased;

            Ok(link) = links.recv() => match link {
                Link::Connected(id, writer) => {
                    writers.insert(id, writer);
                }
                Link::Promote(id) => {
                    if host != Some(id) {
                        log::info!("Host attached ({:?})", id);
                        host = Some(id);
                    }
                }
                Link::Disconnected(id) => {
                    writers.remove(&id);
                    if host == Some(id) {
                        log::info!("Host detached ({:?})", id);
                        host = None;
                    }
                }
            },
            request = requests.recv() => match request {
                Ok(request) => {
                    let writer = host.and_then(|id| writers.get_mut(&id));
                    if !deliver(writer, request).await {
                        host = None;
                    }
                }
                Err(_) => break,
            },
        }
    }
}

/// Returns false once the host can no longer be written to.
async fn deliver(writer: Option<&mut OwnedWriteHalf>, request: Request) -> bool {
    let Some(writer) = writer else {
        log::warn!("No host attached, dropping {:?}", request);
        return true;
    };

    let line = match host::encode(&request) {
        Ok(line) => line,
        Err(e) => {
            log::error!("Failed to encode {:?}: {}", request, e);
            return true;
        }
    };

    if let Err(e) = writer.write_all(line.as_bytes()).await {
        log::warn!("Host went away: {}", e);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::unix::OwnedReadHalf;

    const OPEN: &str = r#"{"event":"openRadialMenu","data":{"items":[{"label":"Lock"}]}}"#;

    async fn send_line(stream: &mut OwnedWriteHalf, line: &str) {
        stream.write_all(line.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();
    }

    /// Connects a fake host and returns its side of the socket.
    fn connect(
        id: u64,
        events: &Sender<AppEvent>,
        links: &Sender<Link>,
    ) -> (OwnedReadHalf, OwnedWriteHalf) {
        let (daemon_side, host_side) = UnixStream::pair().unwrap();
        tokio::spawn(handle_connection(
            ConnectionId(id),
            daemon_side,
            events.clone(),
            links.clone(),
        ));
        host_side.into_split()
    }

    async fn next_request(lines: &mut tokio::io::Lines<BufReader<OwnedReadHalf>>) -> Request {
        let line = lines.next_line().await.unwrap().unwrap();
        host::decode::<Request>(&line).unwrap()
    }

    #[tokio::test]
    async fn test_open_attaches_connection_as_host() {
        let (events_tx, events_rx) = async_channel::unbounded();
        let (requests_tx, requests_rx) = async_channel::unbounded();
        let (links_tx, links_rx) = async_channel::unbounded();
        tokio::spawn(forward_requests(requests_rx, links_rx));

        let (host_read, mut host_write) = connect(0, &events_tx, &links_tx);

        send_line(&mut host_write, OPEN).await;
        let event = events_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::Host(HostEvent::OpenRadialMenu(OpenPayload::Show(_)))
        ));

        HostLink::new(requests_tx).send(Request::Select(0));

        let mut lines = BufReader::new(host_read).lines();
        assert_eq!(next_request(&mut lines).await, Request::Select(0));
    }

    #[tokio::test]
    async fn test_latest_opener_receives_requests() {
        let (events_tx, events_rx) = async_channel::unbounded();
        let (requests_tx, requests_rx) = async_channel::unbounded();
        let (links_tx, links_rx) = async_channel::unbounded();
        tokio::spawn(forward_requests(requests_rx, links_rx));
        let mut link = HostLink::new(requests_tx);

        let (a_read, mut a_write) = connect(0, &events_tx, &links_tx);
        let (b_read, mut b_write) = connect(1, &events_tx, &links_tx);
        let mut a_lines = BufReader::new(a_read).lines();
        let mut b_lines = BufReader::new(b_read).lines();

        send_line(&mut a_write, OPEN).await;
        events_rx.recv().await.unwrap();
        link.send(Request::Select(1));
        assert_eq!(next_request(&mut a_lines).await, Request::Select(1));

        send_line(&mut b_write, OPEN).await;
        events_rx.recv().await.unwrap();
        link.send(Request::Select(2));
        assert_eq!(next_request(&mut b_lines).await, Request::Select(2));

        send_line(&mut a_write, OPEN).await;
        events_rx.recv().await.unwrap();
        link.send(Request::Back);
        assert_eq!(next_request(&mut a_lines).await, Request::Back);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let (events_tx, events_rx) = async_channel::unbounded();
        let (links_tx, links_rx) = async_channel::unbounded();

        let (_host_read, mut host_write) = connect(0, &events_tx, &links_tx);

        send_line(&mut host_write, "not json").await;
        send_line(&mut host_write, "").await;
        send_line(&mut host_write, r#"{"event":"refreshItems","data":[]}"#).await;

        let event = events_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::Host(HostEvent::RefreshItems(ref items)) if items.is_empty()
        ));
        assert!(matches!(
            links_rx.recv().await.unwrap(),
            Link::Connected(ConnectionId(0), _)
        ));
        assert!(links_rx.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_stop_reading() {
        let (events_tx, events_rx) = async_channel::unbounded();
        let (links_tx, _links_rx) = async_channel::unbounded();

        let (_host_read, mut host_write) = connect(0, &events_tx, &links_tx);

        host_write.write_all(b"\xff\n").await.unwrap();
        host_write.write_all(b"{\"event\":\"x\xff\"}\n").await.unwrap();
        send_line(&mut host_write, r#"{"event":"refreshItems","data":[]}"#).await;

        let event = events_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::Host(HostEvent::RefreshItems(ref items)) if items.is_empty()
        ));
    }
}
