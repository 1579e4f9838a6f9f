use eyre::Context;
use mcp_server_youtube::{Credentials, McpServer, YouTubeTools};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A local .env may carry the YOUTUBE_* credentials and RUST_LOG; load it
    // before anything reads the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr) // stdout belongs to the protocol
        .with_ansi(false)
        .init();

    let credentials = Credentials::from_env().context("load YouTube OAuth credentials")?;
    let tools = YouTubeTools::new(credentials);

    McpServer::new(tools)
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("serve MCP over stdio")?;

    Ok(())
}
