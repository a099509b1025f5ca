use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// Pull the `err` field out of a JSON error body when there is one.
    pub(crate) fn from_body(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("err")?.as_str().map(str::to_string))
            .unwrap_or(body);
        ApiError::HttpStatus(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body() {
        let err = ApiError::from_body(StatusCode::NOT_FOUND, r#"{"err": "path not found: a"}"#.into());
        assert_eq!(err.to_string(), "HTTP status 404 Not Found: path not found: a");

        let err = ApiError::from_body(StatusCode::BAD_GATEWAY, "upstream".into());
        assert_eq!(err.to_string(), "HTTP status 502 Bad Gateway: upstream");
    }
}
