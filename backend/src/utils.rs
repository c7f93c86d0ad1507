use std::collections::HashSet;
use url::Url;

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Canonical watch page for a video id. The id is treated as opaque.
pub fn watch_url(video_id: &str) -> String {
    match Url::parse_with_params(WATCH_URL, &[("v", video_id)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{WATCH_URL}?v={video_id}"),
    }
}

/// Drops duplicates and empty ids, keeping first-seen order.
pub fn unique_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(String::from)
        .collect()
}
