use crate::models::{AggregatedResult, EnrichedItem};
use crate::services::youtube_client::VideoSearchApi;
use crate::utils::{unique_ids, watch_url};
use anyhow::Result;
use log::info;

const MISSING_COUNT: &str = "0";

/// Runs one search and joins its items with video and channel statistics.
///
/// The two statistics lookups depend only on the search response, so they are
/// issued concurrently. Any failure aborts the whole aggregation.
pub async fn aggregate(
    api: &dyn VideoSearchApi,
    query: &str,
    page_token: &str,
    category_id: Option<&str>,
) -> Result<AggregatedResult> {
    let page = api.search(query, page_token, category_id).await?;

    let video_ids: Vec<String> = page.items.iter().map(|i| i.video_id.clone()).collect();
    let channel_ids = unique_ids(page.items.iter().map(|i| i.channel_id.as_str()));

    let (view_counts, subscriber_counts) = tokio::try_join!(
        api.video_stats(&video_ids),
        api.channel_stats(&channel_ids)
    )?;

    info!(
        "Aggregated {} results for '{query}' ({} videos with stats, {} of {} channels with stats)",
        page.items.len(),
        view_counts.len(),
        subscriber_counts.len(),
        channel_ids.len()
    );

    let items = page
        .items
        .into_iter()
        .map(|item| EnrichedItem {
            video_url: watch_url(&item.video_id),
            view_count: view_counts
                .get(&item.video_id)
                .cloned()
                .unwrap_or_else(|| MISSING_COUNT.to_string()),
            subscriber_count: subscriber_counts
                .get(&item.channel_id)
                .cloned()
                .unwrap_or_else(|| MISSING_COUNT.to_string()),
            thumbnail: item.thumbnail_url,
            title: item.title,
            channel_title: item.channel_title,
            published_at: item.published_at,
            description: item.description,
        })
        .collect();

    Ok(AggregatedResult {
        items,
        next_page_token: page.next_page_token,
    })
}
