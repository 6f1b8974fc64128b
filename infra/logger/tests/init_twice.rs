use bhub_logger::{Logger, LoggerError};
use serial_test::serial;

#[test]
#[serial]
fn second_init_in_same_process_fails() {
    let _first = Logger::builder().name("first").init().expect("first init");

    let err = Logger::builder().name("second").init().unwrap_err();
    assert!(matches!(err, LoggerError::Subscriber(_)));
}
