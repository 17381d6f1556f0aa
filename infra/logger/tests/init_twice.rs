use atelier_logger::{Logger, LoggerError};

#[test]
fn second_install_reports_the_existing_subscriber() {
    let _keep = Logger::builder("atelier-first").init().expect("first install wins");

    let err = Logger::builder("atelier-second").init().expect_err("only one global subscriber");

    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
