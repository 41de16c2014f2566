//! Match result sharing
//!
//! Formats a fixed-template post from a finished match and forwards it to a
//! social network client. The client is optional: without credentials every
//! call reports `SocialError::NotConfigured`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SocialError;
use crate::scores::DEFAULT_MAP;

pub const GAME_HASHTAG: &str = "#ArenaBlast";
/// Search used for the public feed and stats (original posts only)
pub const FEED_QUERY: &str = "#ArenaBlast -is:retweet";
pub const DEFAULT_FEED_LIMIT: usize = 20;
/// Largest page the network returns per search
pub const MAX_SEARCH_RESULTS: usize = 100;
/// Achievements listed in a post
pub const MAX_LISTED_ACHIEVEMENTS: usize = 3;

const POST_URL_BASE: &str = "https://x.com/i/status/";

/// A finished match as reported by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSummary {
    pub winner: Option<String>,
    pub loser: Option<String>,
    /// Round score, e.g. "2-1"
    pub rounds: Option<String>,
    pub time: Option<String>,
    pub map: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Render the post text for a match
pub fn format_post(winner: &str, loser: &str, summary: &MatchSummary) -> String {
    let mut text = String::from("ARENA BLAST - Match over!\n\n");
    text.push_str(&format!("{} DEFEATED {}\n", winner, loser));
    text.push_str(&format!("Rounds: {}\n", or_default(&summary.rounds, "2-1")));
    text.push_str(&format!("Time: {}\n", or_default(&summary.time, "N/A")));
    text.push_str(&format!("Map: {}\n", or_default(&summary.map, DEFAULT_MAP)));

    if !summary.achievements.is_empty() {
        text.push_str("\nAchievements unlocked:\n");
        for achievement in summary.achievements.iter().take(MAX_LISTED_ACHIEVEMENTS) {
            text.push_str(&format!("- {}\n", achievement));
        }
    }

    text.push_str(&format!("\n{} #Arena3D #WebGames", GAME_HASHTAG));
    text
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: PostMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub posts: Vec<Post>,
    pub users: Vec<PostAuthor>,
    pub result_count: usize,
}

/// A published post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedPost {
    pub post_id: String,
    pub url: String,
}

/// Totals over recent game posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementStats {
    pub total_posts: usize,
    pub total_likes: u64,
    pub total_reposts: u64,
    pub total_replies: u64,
    pub engagement: u64,
}

impl EngagementStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut stats = Self {
            total_posts: posts.len(),
            ..Default::default()
        };
        for post in posts {
            stats.total_likes += post.metrics.like_count;
            stats.total_reposts += post.metrics.repost_count;
            stats.total_replies += post.metrics.reply_count;
        }
        stats.engagement = stats.total_likes + stats.total_reposts + stats.total_replies;
        stats
    }
}

/// A social network able to publish and search posts
pub trait SocialClient: Send {
    /// Publish `text`, returning the new post's id
    fn post(&mut self, text: &str) -> Result<String, SocialError>;

    fn search(&self, query: &str, max_results: usize) -> Result<SearchResult, SocialError>;
}

/// API credentials; all four must be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl SocialCredentials {
    pub const ENV_VARS: [&'static str; 4] = [
        "SOCIAL_API_KEY",
        "SOCIAL_API_SECRET",
        "SOCIAL_ACCESS_TOKEN",
        "SOCIAL_ACCESS_TOKEN_SECRET",
    ];

    /// Build from an arbitrary lookup (environment, config map, ...)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let [key, secret, token, token_secret] =
            Self::ENV_VARS.map(|name| lookup(name).filter(|v| !v.is_empty()));
        Some(Self {
            api_key: key?,
            api_secret: secret?,
            access_token: token?,
            access_token_secret: token_secret?,
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Sharing front-end over an optional client
#[derive(Default)]
pub struct SocialService {
    client: Option<Box<dyn SocialClient>>,
}

impl SocialService {
    pub fn new(client: Box<dyn SocialClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Service that answers `NotConfigured` to everything
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Connect a client when credentials are present, else run disabled.
    ///
    /// `connect` is only called with a complete credential set.
    pub fn from_credentials(
        credentials: Option<SocialCredentials>,
        connect: impl FnOnce(SocialCredentials) -> Box<dyn SocialClient>,
    ) -> Self {
        match credentials {
            Some(credentials) => {
                log::info!("Social sharing enabled");
                Self::new(connect(credentials))
            }
            None => {
                log::warn!("Social credentials not configured; sharing is disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&dyn SocialClient, SocialError> {
        self.client.as_deref().ok_or(SocialError::NotConfigured)
    }

    /// Publish a match summary
    pub fn share(&mut self, summary: &MatchSummary) -> Result<PublishedPost, SocialError> {
        let client = self.client.as_mut().ok_or(SocialError::NotConfigured)?;
        let (Some(winner), Some(loser)) = (
            summary.winner.as_deref().filter(|w| !w.is_empty()),
            summary.loser.as_deref().filter(|l| !l.is_empty()),
        ) else {
            return Err(SocialError::MissingFields);
        };

        let text = format_post(winner, loser, summary);
        let post_id = client.post(&text)?;
        log::info!("Match shared: post {}", post_id);
        Ok(PublishedPost {
            url: format!("{}{}", POST_URL_BASE, post_id),
            post_id,
        })
    }

    /// Recent game posts
    pub fn feed(&self, limit: Option<usize>) -> Result<SearchResult, SocialError> {
        let client = self.client()?;
        let limit = limit
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_FEED_LIMIT)
            .min(MAX_SEARCH_RESULTS);
        let result = client.search(FEED_QUERY, limit)?;
        log::info!("Feed fetched: {} posts", result.posts.len());
        Ok(result)
    }

    /// Engagement totals over the latest page of game posts
    pub fn stats(&self) -> Result<EngagementStats, SocialError> {
        let client = self.client()?;
        let result = client.search(FEED_QUERY, MAX_SEARCH_RESULTS)?;
        Ok(EngagementStats::from_posts(&result.posts))
    }
}
