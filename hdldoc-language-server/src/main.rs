use anyhow::Result;
use hdldoc_language_server::create_backend;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; env_logger writes to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (service, socket) = LspService::new(create_backend);
    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
