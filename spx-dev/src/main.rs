use std::net::SocketAddr;

use spx_dev::DevServer;

/// Overrides the listen address.
const ADDR_VAR: &str = "SPX_DEV_ADDR";

const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8000);

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = match std::env::var(ADDR_VAR) {
        Ok(value) => match value.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                eprintln!("invalid {ADDR_VAR} value {value:?}: {err}");
                std::process::exit(2);
            }
        },
        Err(_) => SocketAddr::from(DEFAULT_ADDR),
    };

    log::info!("development server listening on {addr}");
    println!("SPX development server running on http://{addr}");

    DevServer::new().run(addr).await;
}
