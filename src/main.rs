use {anyhow::Result, env_sensor::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_backtrace::install();

    let config = Config::from_env()?;

    env_sensor::run(config).await
}
