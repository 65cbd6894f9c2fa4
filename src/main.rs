#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = tuner_bot::run().await {
        eprintln!("tuner-bot fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
