//! Poll a watch folder example
//!
//! This example demonstrates the core functionality of usenet-blackhole:
//! - Configuring the watch and drop folders
//! - Checking that both folders are usable
//! - Listing what the external engine has produced
//! - Running the unpacking guard over the files of completed releases
//!
//! Usage: cargo run --example poll_watch_folder -- <watch folder> <nzb folder>

use std::path::PathBuf;
use std::time::Duration;

use usenet_blackhole::{
    BlackholeConfig, DiskProvider, DownloadClient, DownloadItemStatus, ImportCandidate, LocalDisk,
    UsenetBlackhole,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let watch: PathBuf = args.next().unwrap_or_else(|| "downloads/watch".into()).into();
    let nzb: PathBuf = args.next().unwrap_or_else(|| "downloads/nzb".into()).into();

    let config = BlackholeConfig {
        fetch_timeout: Duration::from_secs(15),
        ..BlackholeConfig::new(watch, nzb)
    };
    let client = UsenetBlackhole::new(config)?;

    client.test().await?;
    println!("Folders look good, polling every 10 seconds (Ctrl+C to stop)");

    let guard = client.unpacking_guard();
    let disk = LocalDisk::new();
    let mut interval = tokio::time::interval(Duration::from_secs(10));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let items = match client.list_items().await {
            Ok(items) => items,
            Err(e) => {
                eprintln!("Poll failed: {}", e);
                continue;
            }
        };

        println!("{} item(s)", items.len());
        for item in items {
            let marker = match item.status {
                DownloadItemStatus::Downloading => "downloading",
                DownloadItemStatus::Completed => "completed",
            };
            println!("  [{}] {} ({} bytes)", marker, item.title, item.total_size);

            if !item.is_completed() {
                continue;
            }

            // Release folders are checked file by file; loose videos are the file
            let output = PathBuf::from(item.output_path.as_str());
            let files = if disk.folder_exists(&output).await {
                match disk.get_files(&output, true).await {
                    Ok(files) => files,
                    Err(e) => {
                        println!("    listing failed: {}", e);
                        continue;
                    }
                }
            } else {
                vec![output]
            };

            for file in files {
                let name = file.file_name().unwrap_or_default().to_string_lossy().into_owned();
                match guard.evaluate(&ImportCandidate::new(&file)).await {
                    Ok(decision) if decision.is_accepted() => println!("    {} ready to import", name),
                    Ok(decision) => println!("    {} held back: {:?}", name, decision),
                    Err(e) => println!("    {} check failed: {}", name, e),
                }
            }
        }
    }

    Ok(())
}
