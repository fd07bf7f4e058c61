//! Backend Binary
//!
//! Serves the bandhub HTTP API on BIND_ADDR (e.g. 0.0.0.0:8888).
//! Configuration comes from flags or the environment; see `--help`.
use clap::Parser;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = bh_server::Config::parse();
    bh_core::log()?;
    bh_server::run(config).await
}
