use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::http::HttpClient;
use crate::translate::{Translator, language_pair};

pub const DEFAULT_URL: &str = "https://api.mymemory.translated.net/get";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: ResponseData,
    /// A number on success, sometimes a string on errors.
    #[serde(default)]
    response_status: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    translated_text: String,
}

/// Translator backed by the MyMemory public API.
pub struct MyMemoryTranslator {
    url: String,
    http: HttpClient,
}

impl MyMemoryTranslator {
    pub fn new(url: &str, http: HttpClient) -> Self {
        Self {
            url: url.to_string(),
            http,
        }
    }
}

impl Translator for MyMemoryTranslator {
    fn translate(
        &self,
        word: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let (from, to) = language_pair(source_language, target_language);
        let langpair = format!("{from}|{to}");
        let body = self
            .http
            .get(&self.url, &[("q", word), ("langpair", &langpair)])
            .with_context(|| format!("translating {word:?} {from}->{to}"))?;
        let translation = parse_response(&body)?;
        log::debug!("translated {word:?} {from}->{to} as {translation:?}");
        Ok(translation)
    }
}

fn parse_response(body: &str) -> Result<String> {
    let response: MyMemoryResponse =
        serde_json::from_str(body).context("unexpected translation response")?;
    let status = match &response.response_status {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    let text = response.response_data.translated_text.trim().to_string();
    if status != Some(200) {
        bail!("translation service refused the request: {text}");
    }
    if text.is_empty() {
        bail!("translation service returned no text");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"responseData":{"translatedText":" dog ","match":1},"responseStatus":200}"#;
        assert_eq!(parse_response(body).unwrap(), "dog");
    }

    #[test]
    fn test_parse_error_status_as_string() {
        let body =
            r#"{"responseData":{"translatedText":"INVALID LANGUAGE PAIR"},"responseStatus":"403"}"#;
        let err = parse_response(body).unwrap_err().to_string();
        assert!(err.contains("INVALID LANGUAGE PAIR"));
    }

    #[test]
    fn test_parse_empty_translation() {
        let body = r#"{"responseData":{"translatedText":""},"responseStatus":200}"#;
        assert!(parse_response(body).is_err());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_response("<html>").is_err());
    }
}
