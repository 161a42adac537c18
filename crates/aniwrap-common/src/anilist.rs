//! AniList GraphQL client with connection pooling, retries, and rate limiting
//!
//! All queries go through one retrying `execute` path. Server errors and
//! transport failures are retried with exponential backoff; client (4xx)
//! errors are not, so an unknown user surfaces immediately. The full
//! media-list query is additionally throttled through a rate limiter; that
//! endpoint has historically been rate limited much harder than the activity
//! feed, and the asymmetry is deliberate.

use crate::error::{AniwrapError, Result};
use crate::models::{
    ActivityKind, ActivityRecord, ActivityStatus, MediaFormat, MediaListEntry, MediaSnapshot,
    MediaType, Page, RelationEdge, RelationType, StudioSnapshot, TagSnapshot, UserId, YearWindow,
    PAGE_SIZE,
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, info, instrument, warn};

/// Public AniList GraphQL endpoint
pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

/// Page size for the favorites connection, which caps lower than `Page`
const FAVORITES_PAGE_SIZE: u32 = 25;

/// Configuration for the AniList API client
#[derive(Debug, Clone)]
pub struct AnilistConfig {
    /// GraphQL endpoint URL (default: the public AniList API)
    pub api_url: String,
    /// Optional bearer token, only needed for private lists
    pub token: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit for full media-list pages, in pages per second (default: 1)
    pub list_rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            api_url: ANILIST_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
            max_idle_per_host: 10,
            list_rate_limit_per_sec: 1,
            max_retries: 3,
        }
    }
}

impl AnilistConfig {
    /// Create a configuration pointing at the given endpoint
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    /// Set the media-list page rate limit
    pub fn with_list_rate_limit(mut self, pages_per_sec: u32) -> Self {
        self.list_rate_limit_per_sec = pages_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// AniList GraphQL client
#[derive(Debug, Clone)]
pub struct AnilistClient {
    client: Client,
    config: AnilistConfig,
    list_limiter: Arc<DefaultDirectRateLimiter>,
}

impl AnilistClient {
    /// Create a new client with the given configuration
    pub fn new(config: AnilistConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| AniwrapError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.list_rate_limit_per_sec)
                .ok_or_else(|| AniwrapError::config("List rate limit must be greater than 0"))?,
        );
        let list_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            list_limiter,
        })
    }

    /// Create a new client against the public API with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(AnilistConfig::default())
    }

    /// Execute one GraphQL operation with retry and decode its `data` payload
    #[instrument(skip(self, query, variables))]
    async fn execute<T>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = RetryIf::spawn(
            retry_strategy,
            || async {
                let body = GraphQLRequest {
                    query,
                    variables: &variables,
                };
                let mut request = self.client.post(&self.config.api_url).json(&body);
                if let Some(token) = &self.config.token {
                    request = request.bearer_auth(token);
                }

                match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            debug!("{} request successful: {}", operation, status);
                            Ok(response)
                        } else if status.is_client_error() {
                            error!("Client error from AniList: {}", status);
                            Err(AniwrapError::api_with_status(
                                format!("API returned client error: {}", status),
                                status.as_u16(),
                            ))
                        } else {
                            warn!("Server error from AniList, will retry: {}", status);
                            Err(AniwrapError::api_with_status(
                                format!("API returned server error: {}", status),
                                status.as_u16(),
                            ))
                        }
                    }
                    Err(e) if e.is_timeout() => {
                        warn!("Request timeout, will retry: {}", e);
                        Err(AniwrapError::network_with_source("Request timeout", e))
                    }
                    Err(e) if e.is_connect() => {
                        warn!("Connection error, will retry: {}", e);
                        Err(AniwrapError::network_with_source("Connection error", e))
                    }
                    Err(e) => {
                        error!("Request failed: {}", e);
                        Err(AniwrapError::network_with_source("Request failed", e))
                    }
                }
            },
            // Client errors are final; everything else gets another attempt.
            |err: &AniwrapError| {
                !matches!(err, AniwrapError::Api { status_code: Some(code), .. } if *code < 500)
            },
        )
        .await?;

        let text = response
            .text()
            .await
            .map_err(|e| AniwrapError::network_with_source("Failed to read response body", e))?;
        debug!("{} response: {} bytes", operation, text.len());

        let envelope: GraphQLResponse<T> = serde_json::from_str(&text)?;
        unwrap_envelope(operation, envelope)
    }

    /// Resolve an AniList username to its numeric user id
    ///
    /// An unknown username is fatal for the whole run: it maps to
    /// [`AniwrapError::UserNotFound`] and is never retried.
    #[instrument(skip(self))]
    pub async fn resolve_user_id(&self, username: &str) -> Result<UserId> {
        info!("Resolving AniList user id for {}", username);
        let data: UserData = match self
            .execute("user lookup", USER_ID_QUERY, json!({ "userName": username }))
            .await
        {
            Ok(data) => data,
            Err(AniwrapError::Api {
                status_code: Some(404),
                ..
            }) => return Err(AniwrapError::user_not_found(username)),
            Err(e) => return Err(e),
        };

        data.user
            .map(|user| user.id)
            .ok_or_else(|| AniwrapError::user_not_found(username))
    }

    /// Fetch one 0-indexed page of the user's activity feed, bounded to the
    /// given year window
    #[instrument(skip(self, window), fields(year = window.year))]
    pub async fn fetch_activity_page(
        &self,
        user_id: UserId,
        window: YearWindow,
        page: u32,
    ) -> Result<Page<ActivityRecord>> {
        debug!("Fetching activity page {} for user {}", page, user_id);
        let data: ActivityPageData = self
            .execute(
                "activity page",
                ACTIVITY_PAGE_QUERY,
                json!({
                    "userId": user_id,
                    "page": page,
                    "perPage": PAGE_SIZE,
                    "from": window.start_epoch(),
                    "to": window.end_epoch(),
                }),
            )
            .await?;

        Ok(Page {
            has_next: data.page.page_info.has_next_page,
            entries: data
                .page
                .activities
                .into_iter()
                .map(ActivityRecord::from)
                .collect(),
        })
    }

    /// Fetch one 0-indexed page of the user's full media list
    ///
    /// Awaits the list limiter first; with the default quota that spaces
    /// pages roughly one second apart.
    #[instrument(skip(self))]
    pub async fn fetch_media_list_page(
        &self,
        user_id: UserId,
        page: u32,
    ) -> Result<Page<MediaListEntry>> {
        self.list_limiter.until_ready().await;

        debug!("Fetching media list page {} for user {}", page, user_id);
        let data: MediaListPageData = self
            .execute(
                "media list page",
                MEDIA_LIST_QUERY,
                json!({
                    "userId": user_id,
                    "page": page,
                    "perPage": PAGE_SIZE,
                }),
            )
            .await?;

        Ok(Page {
            has_next: data.page.page_info.has_next_page,
            entries: data
                .page
                .media_list
                .into_iter()
                .map(MediaListEntry::from)
                .collect(),
        })
    }

    /// Fetch one 0-indexed page of the user's favorite anime titles, in the
    /// favorites list's own order
    #[instrument(skip(self))]
    pub async fn fetch_favorites_page(&self, user_id: UserId, page: u32) -> Result<Page<String>> {
        debug!("Fetching favorites page {} for user {}", page, user_id);
        let data: FavoritesData = self
            .execute(
                "favorites page",
                FAVORITES_QUERY,
                json!({
                    "userId": user_id,
                    "page": page,
                    "perPage": FAVORITES_PAGE_SIZE,
                }),
            )
            .await?;

        let anime = data
            .user
            .and_then(|user| user.favourites)
            .map(|favourites| favourites.anime);

        Ok(anime.map_or_else(Page::empty, |page| Page {
            has_next: page.page_info.has_next_page,
            entries: page
                .nodes
                .into_iter()
                .filter_map(|node| node.title.and_then(|title| title.romaji))
                .collect(),
        }))
    }
}

/// Check a decoded GraphQL envelope for errors and extract its data payload
fn unwrap_envelope<T>(operation: &str, envelope: GraphQLResponse<T>) -> Result<T> {
    if let Some(errors) = envelope.errors {
        if let Some(first) = errors.into_iter().next() {
            error!("GraphQL error on {}: {}", operation, first.message);
            return Err(match first.status {
                Some(status) => AniwrapError::api_with_status(first.message, status),
                None => AniwrapError::api(first.message),
            });
        }
        return Err(AniwrapError::api(format!("{} query failed", operation)));
    }

    envelope
        .data
        .ok_or_else(|| AniwrapError::api(format!("{} response contained no data", operation)))
}

// ============================================================================
// GraphQL query documents
// ============================================================================

const USER_ID_QUERY: &str = r"
query ($userName: String) {
    User(name: $userName) {
        id
    }
}
";

const ACTIVITY_PAGE_QUERY: &str = r"
query ($userId: Int, $page: Int, $perPage: Int, $from: Int, $to: Int) {
    Page(page: $page, perPage: $perPage) {
        pageInfo {
            hasNextPage
        }
        activities(userId: $userId, createdAt_greater: $from, createdAt_lesser: $to) {
            ... on ListActivity {
                type
                status
                progress
                media {
                    title {
                        romaji
                    }
                    duration
                    seasonYear
                    format
                    averageScore
                    genres
                    relations {
                        edges {
                            relationType
                        }
                    }
                    tags {
                        name
                        category
                        rank
                    }
                    studios {
                        nodes {
                            name
                            isAnimationStudio
                        }
                    }
                }
            }
        }
    }
}
";

const MEDIA_LIST_QUERY: &str = r"
query ($userId: Int, $page: Int, $perPage: Int) {
    Page(page: $page, perPage: $perPage) {
        pageInfo {
            hasNextPage
        }
        mediaList(userId: $userId) {
            score
            media {
                title {
                    romaji
                }
                type
            }
        }
    }
}
";

const FAVORITES_QUERY: &str = r"
query ($userId: Int, $page: Int, $perPage: Int) {
    User(id: $userId) {
        favourites {
            anime(page: $page, perPage: $perPage) {
                pageInfo {
                    hasNextPage
                }
                nodes {
                    title {
                        romaji
                    }
                }
            }
        }
    }
}
";

// ============================================================================
// Wire models
// ============================================================================

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    #[serde(rename = "User")]
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    id: UserId,
}

#[derive(Debug, Deserialize)]
struct ActivityPageData {
    #[serde(rename = "Page")]
    page: RawActivityPage,
}

#[derive(Debug, Deserialize)]
struct RawActivityPage {
    #[serde(rename = "pageInfo")]
    page_info: RawPageInfo,
    #[serde(default)]
    activities: Vec<RawActivity>,
}

#[derive(Debug, Deserialize)]
struct RawPageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
}

/// One activity as it appears on the wire. Non-list activities decode as
/// empty fragments, so every field is optional.
#[derive(Debug, Deserialize)]
struct RawActivity {
    #[serde(rename = "type")]
    kind: Option<ActivityKind>,
    status: Option<ActivityStatus>,
    progress: Option<String>,
    media: Option<RawMedia>,
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    title: Option<RawTitle>,
    duration: Option<u32>,
    #[serde(rename = "seasonYear")]
    season_year: Option<i32>,
    format: Option<MediaFormat>,
    #[serde(rename = "averageScore")]
    average_score: Option<f64>,
    genres: Option<Vec<String>>,
    relations: Option<RawRelations>,
    tags: Option<Vec<RawTag>>,
    studios: Option<RawStudios>,
}

#[derive(Debug, Deserialize)]
struct RawTitle {
    romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelations {
    #[serde(default)]
    edges: Vec<RawRelationEdge>,
}

#[derive(Debug, Deserialize)]
struct RawRelationEdge {
    #[serde(rename = "relationType")]
    relation_type: Option<RelationType>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
    category: Option<String>,
    rank: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawStudios {
    #[serde(default)]
    nodes: Vec<RawStudio>,
}

#[derive(Debug, Deserialize)]
struct RawStudio {
    name: String,
    #[serde(rename = "isAnimationStudio", default)]
    is_animation_studio: bool,
}

#[derive(Debug, Deserialize)]
struct MediaListPageData {
    #[serde(rename = "Page")]
    page: RawMediaListPage,
}

#[derive(Debug, Deserialize)]
struct RawMediaListPage {
    #[serde(rename = "pageInfo")]
    page_info: RawPageInfo,
    #[serde(rename = "mediaList", default)]
    media_list: Vec<RawMediaListEntry>,
}

#[derive(Debug, Deserialize)]
struct RawMediaListEntry {
    score: Option<f64>,
    media: Option<RawListedMedia>,
}

#[derive(Debug, Deserialize)]
struct RawListedMedia {
    title: Option<RawTitle>,
    #[serde(rename = "type")]
    media_type: Option<MediaType>,
}

#[derive(Debug, Deserialize)]
struct FavoritesData {
    #[serde(rename = "User")]
    user: Option<RawFavoritesUser>,
}

#[derive(Debug, Deserialize)]
struct RawFavoritesUser {
    favourites: Option<RawFavourites>,
}

#[derive(Debug, Deserialize)]
struct RawFavourites {
    anime: RawFavoritePage,
}

#[derive(Debug, Deserialize)]
struct RawFavoritePage {
    #[serde(rename = "pageInfo")]
    page_info: RawPageInfo,
    #[serde(default)]
    nodes: Vec<RawFavoriteNode>,
}

#[derive(Debug, Deserialize)]
struct RawFavoriteNode {
    title: Option<RawTitle>,
}

impl From<RawActivity> for ActivityRecord {
    fn from(raw: RawActivity) -> Self {
        Self {
            status: raw.status,
            kind: raw.kind,
            progress: raw.progress,
            media: raw.media.map(MediaSnapshot::from),
        }
    }
}

impl From<RawMedia> for MediaSnapshot {
    fn from(raw: RawMedia) -> Self {
        Self {
            title: raw
                .title
                .and_then(|title| title.romaji)
                .unwrap_or_default(),
            duration: raw.duration,
            season_year: raw.season_year,
            format: raw.format,
            average_score: raw.average_score,
            genres: raw.genres.unwrap_or_default(),
            relations: raw
                .relations
                .map(|relations| {
                    relations
                        .edges
                        .into_iter()
                        .filter_map(|edge| edge.relation_type)
                        .map(|relation_type| RelationEdge { relation_type })
                        .collect()
                })
                .unwrap_or_default(),
            tags: raw
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|tag| TagSnapshot {
                    name: tag.name,
                    category: tag.category.unwrap_or_default(),
                    rank: tag.rank.unwrap_or(0),
                })
                .collect(),
            studios: raw
                .studios
                .map(|studios| {
                    studios
                        .nodes
                        .into_iter()
                        .map(|studio| StudioSnapshot {
                            name: studio.name,
                            is_animation_studio: studio.is_animation_studio,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl From<RawMediaListEntry> for MediaListEntry {
    fn from(raw: RawMediaListEntry) -> Self {
        let (title, media_type) = raw
            .media
            .map(|media| {
                (
                    media
                        .title
                        .and_then(|title| title.romaji)
                        .unwrap_or_default(),
                    media.media_type,
                )
            })
            .unwrap_or_default();

        Self {
            title,
            media_type,
            // AniList reports a null score for unrated entries; the domain
            // treats 0 as unscored.
            score: raw.score.unwrap_or(0.0),
        }
    }
}
