use crate::*;

#[test]
fn file_logging_keeps_save_load_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = init(LevelFilter::Error, dir.path()).unwrap();
    assert!(path.starts_with(dir.path()));

    log::warn!(target: "gs_save_load::decode", "unknown entity 'Ghost'");
    log::warn!(target: "some_other_crate", "too chatty");
    log::error!("something broke");
    log::logger().flush();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("unknown entity 'Ghost'"));
    assert!(text.contains("something broke"));
    assert!(!text.contains("too chatty"));

    // Only one logger per process.
    assert!(matches!(
        init_console(LevelFilter::Info),
        Err(LogInitError::Logger(_))
    ));
}

#[test]
fn save_load_target_is_at_least_warn() {
    assert_eq!(save_load_filter(LevelFilter::Off), LevelFilter::Warn);
    assert_eq!(save_load_filter(LevelFilter::Error), LevelFilter::Warn);
    assert_eq!(save_load_filter(LevelFilter::Debug), LevelFilter::Debug);
}
