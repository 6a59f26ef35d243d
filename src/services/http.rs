use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::{Resource, VodService};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{School, SchoolsData, Sport, SportsData, VideoPage};

const USER_AGENT_STRING: &str = "vod-cards/1.0";

pub struct HttpVodService {
    client: Client,
    base_url: String,
}

impl HttpVodService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(USER_AGENT_STRING)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Build the URL for a resource, with optional query parameters
    pub fn endpoint(&self, resource: Resource, query: &[(&str, String)]) -> Result<Url> {
        let invalid = |source| AppError::InvalidEndpoint {
            endpoint: self.base_url.clone(),
            source,
        };

        // Url::join replaces the last path segment unless the base ends in '/'
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let mut url = Url::parse(&base)
            .and_then(|base| base.join(resource.path()))
            .map_err(invalid)?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self.endpoint(resource, query)?;
        tracing::debug!("Requesting {} from {}", resource.label(), url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch {}: HTTP {}",
                resource.label(),
                response.status()
            )
            .into());
        }

        let bytes = response.bytes().await?;
        decode_payload(resource, &bytes)
    }
}

/// Decode a response body, treating an empty body or JSON `null` as "no data"
pub(crate) fn decode_payload<T: DeserializeOwned>(
    resource: Resource,
    bytes: &[u8],
) -> Result<Option<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<Option<T>>(bytes).map_err(|source| AppError::Decode {
        resource: resource.label(),
        source,
    })
}

impl VodService for HttpVodService {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Option<VideoPage>> {
        let query = [("page", page.to_string()), ("pagesize", page_size.to_string())];
        self.fetch_json(Resource::Vod, &query).await
    }

    async fn fetch_sports(&self) -> Result<Option<Vec<Sport>>> {
        let data: Option<SportsData> = self.fetch_json(Resource::Sports, &[]).await?;
        Ok(data.map(|d| d.sports))
    }

    async fn fetch_schools(&self) -> Result<Option<Vec<School>>> {
        let data: Option<SchoolsData> = self.fetch_json(Resource::Schools, &[]).await?;
        Ok(data.map(|d| d.schools))
    }
}
