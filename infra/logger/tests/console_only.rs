use atelier_logger::Logger;

#[test]
fn console_logger_runs_without_a_file_worker() {
    let log = Logger::builder("atelier-console")
        .directives("atelier=debug")
        .init()
        .expect("console logger installs");

    tracing::info!(sink = "console", "emitting through the console layer");

    assert!(!log.has_file_sink(), "no file sink was requested");
}
