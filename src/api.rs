//! Request dispatcher for the score and social endpoints
//!
//! Transport-agnostic: a server adapter hands over method, path and body and
//! writes back the status and JSON body. Every response is an envelope with a
//! `success` flag; failures carry an `error` message.

use std::path::PathBuf;

use chrono::Utc;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::scores::{NewScore, ScoreBoard};
use crate::settings::Environment;
use crate::social::{MatchSummary, SocialService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path with optional query string, e.g. `/scores/top?limit=5`
    pub path: String,
    pub body: Option<String>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body.into()),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    /// 200 with `success: true` merged into the payload object
    fn ok(payload: Value) -> Self {
        let mut body = json!({ "success": true });
        if let (Value::Object(envelope), Value::Object(fields)) = (&mut body, payload) {
            envelope.extend(fields);
        }
        Self { status: 200, body }
    }

    fn error(err: &ApiError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "success": false, "error": err.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }
}

/// Percent-decode a path segment or query value
fn decode(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ApiError::BadRequest(format!("invalid UTF-8 in `{}`: {}", raw, e)))
}

/// Decoded value of `key` in a `a=1&b=2` query string
fn query_param(query: &str, key: &str) -> Result<Option<String>, ApiError> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| decode(&v.replace('+', " ")))
        .transpose()
}

/// Unparseable limits fall back to the endpoint default
fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn parse_body<T: DeserializeOwned + Default>(body: Option<&str>) -> Result<T, ApiError> {
    match body.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| ApiError::BadRequest(format!("invalid body: {}", e))),
    }
}

/// Score and social endpoints over in-process services
pub struct ArenaApi {
    pub scores: ScoreBoard,
    pub social: SocialService,
    pub environment: Environment,
    /// Score file rewritten after every change
    pub store_path: Option<PathBuf>,
}

impl ArenaApi {
    pub fn new(scores: ScoreBoard, social: SocialService, environment: Environment) -> Self {
        Self {
            scores,
            social,
            environment,
            store_path: None,
        }
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Route a request and turn any failure into an error envelope
    pub fn handle(&mut self, request: &Request) -> Response {
        log::info!("{} {}", request.method.as_str(), request.path);
        match self.route(request) {
            Ok(payload) => Response::ok(payload),
            Err(err) => {
                if err.status_code() >= 500 {
                    log::error!("{} {} failed: {}", request.method.as_str(), request.path, err);
                } else {
                    log::warn!("{} {} rejected: {}", request.method.as_str(), request.path, err);
                }
                Response::error(&err)
            }
        }
    }

    fn route(&mut self, request: &Request) -> Result<Value, ApiError> {
        let (path, query) = request
            .path
            .split_once('?')
            .unwrap_or((request.path.as_str(), ""));
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let body = request.body.as_deref();

        match (request.method, segments.as_slice()) {
            (Method::Get, [""]) => Ok(self.health()),
            (Method::Post, ["scores"]) => self.submit_score(parse_body(body)?),
            (Method::Get, ["scores", "top"]) => {
                let limit = query_param(query, "limit")?;
                Ok(self.top(parse_limit(limit.as_deref())))
            }
            (Method::Get, ["scores", "top", n]) => {
                let n = decode(n)?;
                Ok(self.top(parse_limit(Some(&n))))
            }
            (Method::Get, ["scores", "history", player]) => {
                let player = decode(player)?;
                let limit = query_param(query, "limit")?;
                Ok(self.history(&player, parse_limit(limit.as_deref())))
            }
            (Method::Delete, ["scores"]) => self.clear_scores(),
            (Method::Post, ["social", "share"]) => self.share(parse_body(body)?),
            (Method::Get, ["social", "feed"]) => {
                let limit = query_param(query, "limit")?;
                let result = self.social.feed(parse_limit(limit.as_deref()))?;
                Ok(json!({
                    "posts": result.posts,
                    "users": result.users,
                    "total": result.result_count,
                }))
            }
            (Method::Get, ["social", "stats"]) => {
                let stats = self.social.stats()?;
                Ok(json!({ "stats": stats }))
            }
            _ => Err(ApiError::NotFound),
        }
    }

    fn health(&self) -> Value {
        json!({
            "status": "Arena Blast API up",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339(),
            "environment": self.environment.as_str(),
            "social_enabled": self.social.is_configured(),
            "endpoints": {
                "scores": {
                    "submit": "POST /scores",
                    "top": "GET /scores/top/{n}",
                    "history": "GET /scores/history/{player}",
                },
                "social": {
                    "share": "POST /social/share",
                    "feed": "GET /social/feed",
                    "stats": "GET /social/stats",
                },
            },
        })
    }

    fn persist(&self) -> Result<(), ApiError> {
        if let Some(path) = &self.store_path {
            self.scores.save(path)?;
        }
        Ok(())
    }

    fn submit_score(&mut self, score: NewScore) -> Result<Value, ApiError> {
        let record = self.scores.submit(score)?;
        self.persist()?;
        Ok(json!({ "score": record, "message": "Score saved" }))
    }

    fn top(&self, limit: Option<usize>) -> Value {
        let top = self.scores.top(limit);
        json!({ "total": top.len(), "scores": top })
    }

    fn history(&self, player: &str, limit: Option<usize>) -> Value {
        let history = self.scores.history(player, limit);
        json!({
            "player": history.player,
            "history": history.history,
            "stats": history.stats,
        })
    }

    fn clear_scores(&mut self) -> Result<Value, ApiError> {
        let removed = self.scores.clear(self.environment)?;
        self.persist()?;
        Ok(json!({ "removed": removed, "message": "All scores deleted" }))
    }

    fn share(&mut self, summary: MatchSummary) -> Result<Value, ApiError> {
        let published = self.social.share(&summary)?;
        Ok(json!({
            "post_id": published.post_id,
            "url": published.url,
            "message": "Match shared",
        }))
    }
}
