//! # AgroVolt Backend
//!
//! Thin entry point that delegates to lib-web for server setup.
//!
//! ```bash
//! BIND_ADDRESS=0.0.0.0:5000 DATABASE_URL=sqlite:data/agrovolt.db cargo run --bin agrovolt
//! ```

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig {
        migrations_path: "migrations",
        ..Default::default()
    };

    start_server(config).await
}
