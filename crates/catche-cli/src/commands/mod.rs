pub mod chrome;
pub mod completion;
pub mod run;
pub mod serve;

/// Multi-threaded runtime for commands that do async work
pub(crate) fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
