use std::time::Duration;

use anyhow::Result;

/// Blocking HTTP calls shared by the translator and the text generator.
#[derive(Clone, Debug)]
pub struct HttpClient {
    #[cfg_attr(not(feature = "network"), allow(dead_code))]
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(feature = "network")]
impl HttpClient {
    fn client(&self) -> Result<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?)
    }

    pub fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.client()?.get(url).query(query).send()?;
        Self::body(response)
    }

    pub fn post_json(&self, url: &str, bearer: Option<&str>, body: String) -> Result<String> {
        let mut request = self
            .client()?
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        Self::body(request.send()?)
    }

    fn body(response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            anyhow::bail!("request failed with {status}: {snippet}");
        }
        Ok(text)
    }
}

#[cfg(not(feature = "network"))]
impl HttpClient {
    pub fn get(&self, url: &str, _query: &[(&str, &str)]) -> Result<String> {
        anyhow::bail!("cannot reach {url}: built without the `network` feature")
    }

    pub fn post_json(&self, url: &str, _bearer: Option<&str>, _body: String) -> Result<String> {
        anyhow::bail!("cannot reach {url}: built without the `network` feature")
    }
}
