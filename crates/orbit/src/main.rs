use clap::Parser;
use orbit::config;
use orbit::gui::app::AppModel;
use orbit::sys::runtime;
use orbit::sys::server::HostLink;
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about, long_about = None)]
struct Args {
    /// Write the default config file (if missing), print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        match config::write_default_config() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                log::error!("Failed to write default config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);
    let (request_tx, request_rx) = async_channel::unbounded();

    // Start Background Services
    if let Err(e) = runtime::start_background_services(&config, tx, request_rx) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }

    let app = RelmApp::new("org.orbit.menu");

    app.run::<AppModel>((config, HostLink::new(request_tx), rx));
}
