mod app;
mod client;
mod config;
mod error;
mod logging;
mod records;
mod session;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
