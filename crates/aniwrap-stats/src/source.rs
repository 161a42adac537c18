//! Paged access to the AniList data behind a report

use aniwrap_common::anilist::AnilistClient;
use aniwrap_common::models::{ActivityRecord, MediaListEntry, Page, UserId, YearWindow};
use aniwrap_common::Result;
use async_trait::async_trait;
use tracing::debug;

/// Paged access to one user's activities, list entries and favorites
///
/// Each statistic re-reads the feed it needs through this trait, so tests
/// can swap in canned pages without a network.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// One page of list activities inside the report window
    async fn activity_page(&self, page: u32) -> Result<Page<ActivityRecord>>;

    /// One page of the user's anime list with scores
    async fn media_list_page(&self, page: u32) -> Result<Page<MediaListEntry>>;

    /// One page of favorited anime titles in profile order
    async fn favorites_page(&self, page: u32) -> Result<Page<String>>;
}

/// Live source backed by the AniList GraphQL API
#[derive(Debug, Clone, Copy)]
pub struct AnilistSource<'a> {
    client: &'a AnilistClient,
    user_id: UserId,
    window: YearWindow,
}

impl<'a> AnilistSource<'a> {
    /// Source for one user and one report window
    pub const fn new(client: &'a AnilistClient, user_id: UserId, window: YearWindow) -> Self {
        Self {
            client,
            user_id,
            window,
        }
    }
}

#[async_trait]
impl ActivitySource for AnilistSource<'_> {
    async fn activity_page(&self, page: u32) -> Result<Page<ActivityRecord>> {
        self.client
            .fetch_activity_page(self.user_id, self.window, page)
            .await
    }

    async fn media_list_page(&self, page: u32) -> Result<Page<MediaListEntry>> {
        self.client.fetch_media_list_page(self.user_id, page).await
    }

    async fn favorites_page(&self, page: u32) -> Result<Page<String>> {
        self.client.fetch_favorites_page(self.user_id, page).await
    }
}

/// Drain every activity page in the report window
pub async fn collect_activities<S: ActivitySource + ?Sized>(
    source: &S,
) -> Result<Vec<ActivityRecord>> {
    let mut records = Vec::new();
    let mut page = 0;
    loop {
        let batch = source.activity_page(page).await?;
        records.extend(batch.entries);
        if !batch.has_next {
            break;
        }
        page += 1;
    }

    debug!(
        "Collected {} activity records over {} pages",
        records.len(),
        page + 1
    );
    Ok(records)
}

/// Drain every page of the user's media list
pub async fn collect_media_list<S: ActivitySource + ?Sized>(
    source: &S,
) -> Result<Vec<MediaListEntry>> {
    let mut entries = Vec::new();
    let mut page = 0;
    loop {
        let batch = source.media_list_page(page).await?;
        entries.extend(batch.entries);
        if !batch.has_next {
            break;
        }
        page += 1;
    }

    debug!(
        "Collected {} media list entries over {} pages",
        entries.len(),
        page + 1
    );
    Ok(entries)
}

/// Drain every page of favorited anime titles
pub async fn collect_favorites<S: ActivitySource + ?Sized>(source: &S) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    let mut page = 0;
    loop {
        let batch = source.favorites_page(page).await?;
        titles.extend(batch.entries);
        if !batch.has_next {
            break;
        }
        page += 1;
    }

    debug!("Collected {} favorites over {} pages", titles.len(), page + 1);
    Ok(titles)
}
