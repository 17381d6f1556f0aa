use atelier_logger::{LevelFilter, Logger, Rotation};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn rolling_file_receives_records() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let logs = dir.path().join("logs");

    let log = Logger::builder("atelier-files")
        .console(false)
        .level(LevelFilter::INFO)
        .file(&logs)
        .rotation(Rotation::NEVER)
        .retain(3)
        .init()?;
    assert!(log.has_file_sink());

    tracing::info!("first record for the rolling sink");
    tracing::warn!("second record for the rolling sink");

    std::thread::sleep(Duration::from_millis(30));
    drop(log); // flushes the non-blocking worker

    let written = fs::read_dir(&logs)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .ok_or("no log file written")?;

    let body = fs::read_to_string(&written)?;
    assert!(body.contains("first record"), "flushed file should hold the records: {body}");
    assert!(body.contains("second record"), "flushed file should hold the records: {body}");
    Ok(())
}
