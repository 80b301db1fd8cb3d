#[tokio::main]
async fn main() -> anyhow::Result<()> {
    meerab_server::start_server().await
}
