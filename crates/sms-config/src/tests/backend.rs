use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Backend
// =========================================================================

#[test]
#[serial]
fn given_no_anon_key_when_validate_then_error_mentions_anon_key() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _key = EnvGuard::remove("SMS_BACKEND_ANON_KEY");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("anon_key"));
}

#[test]
#[serial]
fn given_blank_anon_key_when_validate_then_error() {
    let (_temp, _guards) = setup_config_dir();
    let _key = EnvGuard::set("SMS_BACKEND_ANON_KEY", "   ");

    let config = Config::load().unwrap();

    assert_that!(config.validate(), err(anything()));
}

#[test]
#[serial]
fn given_url_without_scheme_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _url = EnvGuard::set("SMS_BACKEND_URL", "center.supabase.co");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("backend.url"));
}

#[test]
#[serial]
fn given_https_url_when_validate_then_ok() {
    let (_temp, _guards) = setup_config_dir();
    let _url = EnvGuard::set("SMS_BACKEND_URL", "https://center.supabase.co");

    let config = Config::load().unwrap();

    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_zero_timeout_when_validate_then_error() {
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("SMS_BACKEND_TIMEOUT_SECS", "0");

    let config = Config::load().unwrap();
    let result = config.validate();

    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("request_timeout_secs"));
}

#[test]
#[serial]
fn given_timeout_secs_when_request_timeout_then_duration_matches() {
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("SMS_BACKEND_TIMEOUT_SECS", "7");

    let config = Config::load().unwrap();

    assert_that!(config.backend.request_timeout().as_secs(), eq(7));
}
