#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = hirelens::run().await {
        eprintln!("hirelens fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
