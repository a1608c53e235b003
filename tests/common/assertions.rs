//! Custom assertion macros
//!
//! Assertions over JSON response bodies with descriptive failure output.

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert the `{"error", "status"}` body of a failed request
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {{
        $response.assert_status($status);
        let body: serde_json::Value = $response.json();
        assert_eq!(
            body["status"].as_u64(),
            Some($status.as_u16() as u64),
            "unexpected error body: {}",
            body
        );
        body["error"].as_str().unwrap_or_default().to_string()
    }};
}
