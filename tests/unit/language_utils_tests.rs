/*!
 * Tests for language code utilities
 */

use locmem::errors::ConfigError;
use locmem::language_utils::{display_name, split_locale, validate_locale};

#[test]
fn test_splitLocale_withRegion_shouldSeparateParts() {
    assert_eq!(split_locale("pt-BR"), ("pt".to_string(), Some("BR".to_string())));
    assert_eq!(split_locale("zh_Hant"), ("zh".to_string(), Some("Hant".to_string())));
    assert_eq!(split_locale("fr"), ("fr".to_string(), None));
}

#[test]
fn test_validateLocale_knownCodes_shouldPass() {
    for code in ["fr", "de", "pt-BR", "zh-Hans", "ja", "fra"] {
        assert!(validate_locale(code).is_ok(), "{}", code);
    }
}

#[test]
fn test_validateLocale_unknownCodes_shouldFail() {
    assert_eq!(validate_locale("xx"), Err(ConfigError::InvalidLanguage("xx".to_string())));
    assert!(validate_locale("").is_err());
}

#[test]
fn test_displayName_shouldUseEnglishNames() {
    assert_eq!(display_name("de"), "German");
    assert_eq!(display_name("pt-BR"), "Portuguese (BR)");
}
