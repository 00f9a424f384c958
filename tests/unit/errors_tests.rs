/*!
 * Tests for error types and conversions
 */

use translatable::TranslatableError;

#[test]
fn test_persistenceError_shouldDisplayTableAndMessage() {
    let error = TranslatableError::persistence("country_translations", "disk full");
    let display = format!("{}", error);
    assert!(display.contains("country_translations"));
    assert!(display.contains("disk full"));
    assert!(error.is_persistence());
}

#[test]
fn test_invalidIdentifier_shouldDisplayName() {
    let error = TranslatableError::InvalidIdentifier("bad name".to_string());
    assert!(format!("{}", error).contains("bad name"));
    assert!(!error.is_persistence());
}

#[test]
fn test_fromAnyhow_shouldBecomeStorageError() {
    let error: TranslatableError = anyhow::anyhow!("lock poisoned").into();
    match error {
        TranslatableError::Storage(message) => assert!(message.contains("lock poisoned")),
        other => panic!("Expected Storage error, got {:?}", other),
    }
}

#[test]
fn test_fromIoError_shouldBecomeConfigError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let error: TranslatableError = io.into();
    assert!(matches!(error, TranslatableError::Config(_)));
}
