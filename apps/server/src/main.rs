use anyhow::Context;
use atelier::kernel::config::load_config;
use atelier_logger::Logger;
use atelier_server::Server;

#[cfg(feature = "profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[atelier_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let _log = Logger::builder(env!("CARGO_PKG_NAME")).init()?;

    let cfg = load_config(Some("config/server"))
        .context("Configuration did not parse; fix it before booting")?;

    Server::builder().config(cfg).build().await?.run().await
}
