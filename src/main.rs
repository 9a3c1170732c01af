#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vehicle_stoppage_lib::run().await
}
