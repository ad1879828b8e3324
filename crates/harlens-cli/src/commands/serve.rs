use anyhow::Result;
use harlens_server::{ServerConfig, UploadServer};

pub fn execute(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting harlens upload server on {}", config.addr());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = UploadServer::bind(config.clone()).await?;
        let addr = server.local_addr()?;

        println!("✓ Listening on http://{}", addr);
        println!();
        println!("Upload a HAR file with:");
        println!(
            "  curl --data-binary @capture.har 'http://{}/api/har/upload?filename=capture.har'",
            addr
        );
        if let Some(origin) = &config.allowed_origin {
            println!("  Browser uploads allowed from: {}", origin);
        }
        println!();
        println!("Press Ctrl+C to stop...");

        server.serve(shutdown_signal()).await
    })?;

    println!("✅ Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down...");
}
