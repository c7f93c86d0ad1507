use crate::config::Config;
use crate::models::{SearchItem, SearchPage};
use crate::utils::unique_ids;
use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// Upper bound on ids per `videos`/`channels` request enforced by the Data API.
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Calls made against the video search service during one aggregation.
#[rocket::async_trait]
pub trait VideoSearchApi: Send + Sync {
    /// One page of video results. `category_id` narrows results to a video category.
    async fn search(
        &self,
        query: &str,
        page_token: &str,
        category_id: Option<&str>,
    ) -> Result<SearchPage>;

    /// View counts keyed by video id. Videos without a public count are left out.
    async fn video_stats(&self, video_ids: &[String]) -> Result<HashMap<String, String>>;

    /// Subscriber counts keyed by channel id. Hidden counts are left out.
    async fn channel_stats(&self, channel_ids: &[String]) -> Result<HashMap<String, String>>;
}

pub struct YoutubeClient {
    http: Client,
    base_url: String,
    api_key: String,
    max_results: u32,
    region_code: Option<String>,
    relevance_language: Option<String>,
}

impl YoutubeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(YoutubeClient {
            http,
            base_url: config.youtube_api_base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.youtube_api_key.clone(),
            max_results: config.max_results,
            region_code: config.region_code.clone(),
            relevance_language: config.relevance_language.clone(),
        })
    }

    fn search_params(
        &self,
        query: &str,
        page_token: &str,
        category_id: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("maxResults", self.max_results.to_string()),
            ("q", query.to_string()),
        ];
        if !page_token.is_empty() {
            params.push(("pageToken", page_token.to_string()));
        }
        if let Some(category) = category_id {
            params.push(("videoCategoryId", category.to_string()));
        }
        if let Some(region) = &self.region_code {
            params.push(("regionCode", region.clone()));
        }
        if let Some(lang) = &self.relevance_language {
            params.push(("relevanceLanguage", lang.clone()));
        }
        params
    }

    /// GET `{base}/{resource}` with the API key appended. Errors never carry the URL.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{resource}", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("YouTube {resource} request failed"))?
            .error_for_status()
            .map_err(|e| e.without_url())
            .with_context(|| format!("YouTube {resource} request returned an error status"))?;

        response
            .json::<T>()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to parse YouTube {resource} response"))
    }

    /// One `part=statistics` lookup per chunk of ids, merged into a single map.
    async fn statistics(
        &self,
        resource: &str,
        ids: &[String],
        count_field: fn(&Statistics) -> Option<&String>,
    ) -> Result<HashMap<String, String>> {
        let mut counts = HashMap::with_capacity(ids.len());

        for batch in id_batches(ids) {
            debug!("Fetching {resource} statistics for {} ids", batch.len());
            let params = [
                ("part", "statistics".to_string()),
                ("id", batch.join(",")),
                ("maxResults", MAX_IDS_PER_REQUEST.to_string()),
            ];
            let response: StatisticsListResponse = self.get_json(resource, &params).await?;
            counts.extend(response.items.into_iter().filter_map(|item| {
                let count = count_field(&item.statistics)?.clone();
                Some((item.id, count))
            }));
        }

        Ok(counts)
    }
}

/// Unique, non-empty ids split into request-sized batches.
fn id_batches(ids: &[String]) -> Vec<Vec<String>> {
    unique_ids(ids.iter().map(String::as_str))
        .chunks(MAX_IDS_PER_REQUEST)
        .map(<[String]>::to_vec)
        .collect()
}

#[rocket::async_trait]
impl VideoSearchApi for YoutubeClient {
    async fn search(
        &self,
        query: &str,
        page_token: &str,
        category_id: Option<&str>,
    ) -> Result<SearchPage> {
        let params = self.search_params(query, page_token, category_id);
        let response: SearchListResponse = self.get_json("search", &params).await?;
        Ok(response.into_page())
    }

    async fn video_stats(&self, video_ids: &[String]) -> Result<HashMap<String, String>> {
        self.statistics("videos", video_ids, |s| s.view_count.as_ref())
            .await
    }

    async fn channel_stats(&self, channel_ids: &[String]) -> Result<HashMap<String, String>> {
        self.statistics("channels", channel_ids, |s| s.subscriber_count.as_ref())
            .await
    }
}

// Documentation: https://developers.google.com/youtube/v3/docs/search/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResource {
    #[serde(default)]
    id: ResourceId,
    #[serde(default)]
    snippet: SearchSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchSnippet {
    channel_id: String,
    title: String,
    channel_title: String,
    description: String,
    published_at: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best_url(&self) -> String {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.clone())
            .next()
            .unwrap_or_default()
    }
}

impl SearchListResponse {
    fn into_page(self) -> SearchPage {
        let items = self
            .items
            .into_iter()
            .map(|resource| SearchItem {
                thumbnail_url: resource.snippet.thumbnails.best_url(),
                video_id: resource.id.video_id,
                channel_id: resource.snippet.channel_id,
                title: resource.snippet.title,
                channel_title: resource.snippet.channel_title,
                published_at: resource.snippet.published_at,
                description: resource.snippet.description,
            })
            .collect();

        SearchPage {
            items,
            next_page_token: self.next_page_token.unwrap_or_default(),
        }
    }
}

// Documentation: https://developers.google.com/youtube/v3/docs/videos
// and https://developers.google.com/youtube/v3/docs/channels
#[derive(Debug, Deserialize)]
struct StatisticsListResponse {
    #[serde(default)]
    items: Vec<StatisticsResource>,
}

#[derive(Debug, Deserialize)]
struct StatisticsResource {
    id: String,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
    subscriber_count: Option<String>,
}
