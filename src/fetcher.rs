use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect;

use crate::error::{Result, ScrapeError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
const MAX_REDIRECTS: usize = 10;

/// Anything that can hand back the HTML of a page.
pub trait PageSource {
    fn fetch_html(&self, url: &str) -> Result<String>;
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                attempt.error("Too many redirects")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self { client })
    }
}

impl PageSource for Fetcher {
    fn fetch_html(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");
        let fetch_error = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(fetch_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = resp.text().map_err(fetch_error)?;
        log::debug!("fetched {} bytes from {url}", html.len());
        Ok(html)
    }
}
