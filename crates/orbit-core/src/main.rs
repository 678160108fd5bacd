use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use orbit_core::host::{self, HostEvent, OpenMenu, OpenPayload, Request};
use orbit_core::item::{MenuId, MenuItem};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

const DEFAULT_SOCKET_PATH: &str = "/tmp/orbit.sock";

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket the orbit daemon listens on
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open a menu and act as its host until it is closed
    Open {
        /// JSON array of items, `-` for stdin
        items: PathBuf,

        /// Open as a sub-menu, the centre button then requests `back`
        #[arg(long)]
        sub: bool,

        /// Start on the page holding the first item of this menu group
        #[arg(short, long)]
        focus: Option<String>,

        /// Refuse every page transition
        #[arg(long)]
        veto: bool,
    },
    /// Replace the items of the open menu, keeping its page
    Refresh {
        /// JSON array of items, `-` for stdin
        items: PathBuf,
    },
    /// Hide the menu
    Close,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Open {
            items,
            sub,
            focus,
            veto,
        } => {
            let menu = OpenMenu {
                items: read_items(&items)?,
                is_sub_menu: sub,
                focus_menu_id: focus.map(MenuId::new),
            };
            host_menu(&cli.socket, menu, veto)
        }
        Commands::Refresh { items } => {
            let mut stream = connect(&cli.socket)?;
            send(&mut stream, &HostEvent::RefreshItems(read_items(&items)?))
        }
        Commands::Close => {
            let mut stream = connect(&cli.socket)?;
            send(&mut stream, &HostEvent::OpenRadialMenu(OpenPayload::Hide))
        }
    }
}

fn read_items(path: &Path) -> anyhow::Result<Vec<MenuItem>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid item list in {}", path.display()))
}

fn connect(socket: &Path) -> anyhow::Result<UnixStream> {
    UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit daemon at {}: {}. Is orbit running?",
            socket.display(),
            e
        )
    })
}

fn send(stream: &mut UnixStream, event: &HostEvent) -> anyhow::Result<()> {
    stream.write_all(host::encode(event)?.as_bytes())?;
    Ok(())
}

/// Opens `menu` and answers the daemon's requests until the menu is closed or the daemon goes
/// away.
fn host_menu(socket: &Path, menu: OpenMenu, veto: bool) -> anyhow::Result<()> {
    let labels: Vec<String> = menu.items.iter().map(|i| i.label.clone()).collect();
    let mut stream = connect(socket)?;
    send(
        &mut stream,
        &HostEvent::OpenRadialMenu(OpenPayload::Show(menu)),
    )?;

    let reader = BufReader::new(stream.try_clone()?);
    for line in reader.lines() {
        let line = line?;
        let request = match host::decode::<Request>(&line) {
            Ok(r) => r,
            Err(host::ProtocolError::Empty) => continue,
            Err(e) => {
                log::warn!("Skipping daemon message: {}", e);
                continue;
            }
        };

        match request {
            Request::Select(index) => {
                let label = labels.get(index).map_or("?", String::as_str);
                println!("select {} ({})", index, label);
            }
            Request::PageTransition(id) => {
                println!(
                    "page transition {} {}",
                    id,
                    if veto { "vetoed" } else { "granted" }
                );
                send(
                    &mut stream,
                    &HostEvent::TransitionResolved { id, granted: !veto },
                )?;
            }
            Request::Back => println!("back"),
            Request::Close => {
                println!("close");
                break;
            }
        }
    }
    Ok(())
}
