use anyhow::Result;
use mindmap_history::cli::run;

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}
