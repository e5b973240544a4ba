use axum::http::HeaderMap;

use backend_domain::RuntimeConfig;

/// Open when no token is configured, otherwise requires `Authorization: Bearer <token>`.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn open_without_token() {
        assert!(authorize(&RuntimeConfig::default(), &HeaderMap::new()));
    }

    #[test]
    fn requires_matching_bearer() {
        let config = RuntimeConfig {
            api_token: Some("s3cret".to_string()),
            ..RuntimeConfig::default()
        };
        assert!(authorize(&config, &headers("Bearer s3cret")));
        assert!(!authorize(&config, &headers("Bearer other")));
        assert!(!authorize(&config, &headers("Basic s3cret")));
        assert!(!authorize(&config, &headers("Bearer ")));
        assert!(!authorize(&config, &HeaderMap::new()));
    }
}
