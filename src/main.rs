use api_demo_server::{config, logger, server};
use std::sync::Arc;
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    cfg.validate()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::signal::spawn_shutdown_listener(Arc::clone(&shutdown));

    server::run(listener, Arc::new(cfg), shutdown).await?;
    Ok(())
}
