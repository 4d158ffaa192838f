use logging::{LogConfig, LogInitError, Logger, init};

#[test]
fn second_init_reports_already_installed() {
    let config = LogConfig::new(false, false);
    init(&config).expect("first install succeeds");

    let error = init(&config).expect_err("second install fails");
    assert!(matches!(error, LogInitError::AlreadyInstalled));

    let logger = Logger::new("tests");
    tracing::info!(parent: logger.span(), "subscriber installed");
    assert_eq!(logger.child("inner").component(), "inner");
}
