//! certgen - provision a self-signed TLS key/certificate pair for the
//! RemoteNote KOReader plugin server.

use anyhow::Result;

fn main() -> Result<()> {
    certgen_cli::run()
}
