//! Unit tests for `AppError` display formats and conversions.

use inbox_valet::AppError;

// ─── Display prefixes ────────────────────────────────────────────────

#[test]
fn config_error_display() {
    let err = AppError::Config("bad value".into());
    assert_eq!(err.to_string(), "config: bad value");
}

#[test]
fn db_error_display() {
    let err = AppError::Db("database is locked".into());
    assert_eq!(err.to_string(), "db: database is locked");
}

#[test]
fn telegram_error_display() {
    let err = AppError::Telegram("flood wait".into());
    assert_eq!(err.to_string(), "telegram: flood wait");
}

#[test]
fn transcribe_error_display() {
    let err = AppError::Transcribe("http 500".into());
    assert_eq!(err.to_string(), "transcribe: http 500");
}

#[test]
fn not_found_error_display() {
    let err = AppError::NotFound("control message".into());
    assert_eq!(err.to_string(), "not found: control message");
}

#[test]
fn io_error_display() {
    let err = AppError::Io("permission denied".into());
    assert_eq!(err.to_string(), "io: permission denied");
}

#[test]
fn variants_with_same_message_stay_distinct() {
    let db = AppError::Db("boom".into());
    let io = AppError::Io("boom".into());
    assert_ne!(db.to_string(), io.to_string());
}

#[test]
fn messages_have_no_trailing_period() {
    let err = AppError::Telegram("request failed".into());
    let s = err.to_string();
    assert!(
        !s.ends_with('.'),
        "error message must not end with a period: {s}"
    );
}

// ─── Conversions ─────────────────────────────────────────────────────

#[test]
fn sqlx_errors_convert_to_db() {
    let err = AppError::from(sqlx::Error::RowNotFound);
    assert!(matches!(err, AppError::Db(_)));
    assert!(err.to_string().starts_with("db:"));
}

#[test]
fn io_errors_convert_to_io() {
    let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
    let err = AppError::from(source);
    assert!(matches!(err, AppError::Io(_)));
    assert!(err.to_string().starts_with("io:"));
}

#[test]
fn toml_errors_convert_to_config() {
    let source = toml::from_str::<toml::Value>("not == toml").expect_err("invalid toml");
    let err = AppError::from(source);
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("invalid config"));
}

#[test]
fn implements_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(AppError::NotFound("session".into()));
    assert!(!err.to_string().is_empty());
    assert!(format!("{err:?}").contains("NotFound"));
}
