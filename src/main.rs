use fixtured::{logger, Config, FixtureServer, ServerError};

fn main() -> Result<(), ServerError> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Single-threaded cooperative scheduling: one logical thread processes
    // requests, suspending only at explicit await points.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = FixtureServer::bind(cfg)?;
        logger::log_server_start(server.local_addr().port());
        server.run().await;
        Ok(())
    })
}
