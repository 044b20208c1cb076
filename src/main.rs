use clap::Parser;

use persona::{Config, Server, api, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(&config)?;

    Server::bind(&config.listen_addr())?
        .serve(api::router())
        .await?;

    Ok(())
}
