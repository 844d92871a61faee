use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = tagmove::cli::parse();
    app::run(args)
}
