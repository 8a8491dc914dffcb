use clap::Parser;
use todos_front::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    todos_front::app::run(Config::parse()).await
}
