/*!
 * Tests for error types and their classification
 */

use bierdopje_provider::errors::{ErrorClass, ProviderError};

#[test]
fn test_providerError_timeout_shouldDisplayAndBeUnavailable() {
    let error = ProviderError::Timeout(10);
    let display = format!("{}", error);
    assert!(display.contains("timeout after 10 seconds"));
    assert_eq!(error.class(), ErrorClass::Unavailable);
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndBeProviderError() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Request failed with status code 500".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert_eq!(error.class(), ErrorClass::Provider);
    assert!(!error.is_unavailable());
}

#[test]
fn test_providerError_invalidSubtitle_shouldBeInvalidContent() {
    let error = ProviderError::InvalidSubtitle("Lost.S01E02.srt".to_string());
    assert!(format!("{}", error).contains("Lost.S01E02.srt"));
    assert_eq!(error.class(), ErrorClass::InvalidContent);
}

#[test]
fn test_providerError_contractViolations_shouldBeContract() {
    assert_eq!(ProviderError::MissingShowIdentifier.class(), ErrorClass::Contract);
    assert_eq!(ProviderError::NotInitialized.class(), ErrorClass::Contract);
    assert_eq!(ProviderError::UnsupportedLanguage("French".to_string()).class(), ErrorClass::Contract);
}

#[test]
fn test_providerError_fromXmlError_shouldBecomeParseError() {
    let xml_error = quick_xml::de::from_str::<u32>("<a>not a number</a>").unwrap_err();
    let error: ProviderError = xml_error.into();
    assert!(matches!(error, ProviderError::ParseError(_)));
    assert_eq!(error.class(), ErrorClass::Provider);
}
