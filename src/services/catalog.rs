//! Subtitle catalog client.
//!
//! The pipeline talks to the catalog through [`CatalogSession`]; the
//! [`HttpCatalog`] implementation speaks a JSON RPC dialect where every
//! method is `POST <endpoint>/<Method>` and every response carries a
//! `status` string that must start with `200`.

use crate::models::catalog::{DownloadedSubtitle, MovieDetails, SearchRequest, SubtitleCandidate};
use crate::models::config::CatalogConfig;
use crate::models::language::Language;
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Remote subtitle catalog.
///
/// One session token is obtained with [`login`](Self::login) and passed to
/// every later call until [`logout`](Self::logout).
#[async_trait]
pub trait CatalogSession: Send + Sync {
    /// Open a session and return its token.
    async fn login(&self) -> Result<String>;

    /// Run every request in a single call. Results keep catalog order.
    async fn search(&self, token: &str, requests: &[SearchRequest]) -> Result<Vec<SubtitleCandidate>>;

    /// Fetch encoded payloads for subtitle ids in a single call.
    async fn download(&self, token: &str, ids: &[String]) -> Result<Vec<DownloadedSubtitle>>;

    /// Fetch the enrichment record for an IMDb id.
    async fn movie_details(&self, token: &str, imdb_id: &str) -> Result<MovieDetails>;

    /// Fetch a cover image.
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>>;

    /// Close the session.
    async fn logout(&self, token: &str) -> Result<()>;
}

/// HTTP catalog client.
pub struct HttpCatalog {
    config: CatalogConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct LoginParams<'a> {
    username: &'a str,
    password: &'a str,
    language: &'a str,
    useragent: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    sublanguageid: &'a str,
    moviehash: &'a str,
    moviebytesize: String,
}

#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    token: &'a str,
    queries: Vec<SearchQuery<'a>>,
}

#[derive(Debug, Serialize)]
struct DownloadParams<'a> {
    token: &'a str,
    ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct DetailsParams<'a> {
    token: &'a str,
    imdbid: String,
}

#[derive(Debug, Serialize)]
struct TokenParams<'a> {
    token: &'a str,
}

/// Status envelope shared by every response.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "list_or_false")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    data: Option<RawMovieDetails>,
}

/// Search result record as sent by the catalog.
#[derive(Debug, Deserialize)]
struct RawSubtitle {
    #[serde(rename = "IDSubtitleFile")]
    id_subtitle_file: String,
    #[serde(rename = "MovieHash")]
    movie_hash: String,
    #[serde(rename = "MovieByteSize", default)]
    movie_byte_size: String,
    #[serde(rename = "SubLanguageID")]
    sub_language_id: String,
    #[serde(rename = "LanguageName", default)]
    language_name: String,
    #[serde(rename = "MovieName", default)]
    movie_name: String,
    #[serde(rename = "MovieYear", default)]
    movie_year: String,
    #[serde(rename = "IDMovieImdb", default)]
    id_movie_imdb: String,
    #[serde(rename = "SubFormat", default)]
    sub_format: String,
}

#[derive(Debug, Deserialize)]
struct RawDownload {
    idsubtitlefile: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMovieDetails {
    id: Value,
    title: String,
    year: Value,
    cover: Option<String>,
    rating: Value,
    tagline: Option<String>,
    plot: Option<String>,
    duration: Option<String>,
    genres: Value,
    directors: Value,
    writers: Value,
    cast: Value,
    country: Value,
}

/// Accept either a list or the catalog's `false` for "nothing".
fn list_or_false<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

/// Render a scalar JSON value as a trimmed string.
fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Collect names from a list, or from an `{id: name}` map.
fn name_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        Value::Object(map) => map.values().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

impl RawSubtitle {
    /// Convert to a domain candidate. Unknown languages are dropped.
    fn into_candidate(self) -> Option<SubtitleCandidate> {
        let Some(language) = Language::lookup(&self.sub_language_id) else {
            tracing::debug!(
                "Dropping subtitle {} with unknown language {}",
                self.id_subtitle_file,
                self.sub_language_id
            );
            return None;
        };

        Some(SubtitleCandidate {
            id: self.id_subtitle_file,
            movie_hash: self.movie_hash.to_lowercase(),
            movie_byte_size: self.movie_byte_size.trim().parse().unwrap_or(0),
            language,
            language_name: self.language_name,
            movie_name: self.movie_name,
            movie_year: self.movie_year.trim().parse().ok(),
            imdb_id: Some(self.id_movie_imdb).filter(|id| !id.is_empty() && id != "0"),
            format: if self.sub_format.is_empty() {
                "srt".to_string()
            } else {
                self.sub_format.to_lowercase()
            },
        })
    }
}

impl RawMovieDetails {
    fn into_details(self, imdb_id: &str) -> MovieDetails {
        MovieDetails {
            imdb_id: scalar_string(&self.id).unwrap_or_else(|| imdb_id.to_string()),
            title: self.title,
            year: scalar_string(&self.year).and_then(|y| y.parse().ok()),
            cover_url: self.cover.filter(|c| !c.trim().is_empty()),
            rating: scalar_string(&self.rating).and_then(|r| r.parse().ok()),
            tagline: self.tagline,
            plot: self.plot,
            runtime: self.duration,
            genres: name_list(&self.genres),
            directors: name_list(&self.directors),
            writers: name_list(&self.writers),
            cast: name_list(&self.cast),
            countries: name_list(&self.country),
        }
    }
}

impl HttpCatalog {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    /// Call one RPC method and check its status.
    async fn call<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> Result<Value> {
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), method);
        tracing::debug!("Catalog call: {}", method);

        let response = self.client.post(&url).json(params).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::Network(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let status: StatusResponse = serde_json::from_value(body.clone())?;
        if !status.status.starts_with("200") {
            return Err(crate::Error::Network(format!(
                "{} failed with status '{}'",
                method, status.status
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl CatalogSession for HttpCatalog {
    async fn login(&self) -> Result<String> {
        let params = LoginParams {
            username: &self.config.username,
            password: &self.config.password,
            language: &self.config.language,
            useragent: &self.config.user_agent,
        };
        let resp: LoginResponse = serde_json::from_value(self.call("LogIn", &params).await?)?;
        if resp.token.is_empty() {
            return Err(crate::Error::Network("LogIn returned no token".to_string()));
        }
        Ok(resp.token)
    }

    async fn search(&self, token: &str, requests: &[SearchRequest]) -> Result<Vec<SubtitleCandidate>> {
        let params = SearchParams {
            token,
            queries: requests
                .iter()
                .map(|r| SearchQuery {
                    sublanguageid: r.language.catalog_id(),
                    moviehash: &r.movie_hash,
                    moviebytesize: r.movie_byte_size.to_string(),
                })
                .collect(),
        };

        let resp: ListResponse<RawSubtitle> =
            serde_json::from_value(self.call("SearchSubtitles", &params).await?)?;
        Ok(resp.data.into_iter().filter_map(RawSubtitle::into_candidate).collect())
    }

    async fn download(&self, token: &str, ids: &[String]) -> Result<Vec<DownloadedSubtitle>> {
        let params = DownloadParams { token, ids };
        let resp: ListResponse<RawDownload> =
            serde_json::from_value(self.call("DownloadSubtitles", &params).await?)?;
        Ok(resp
            .data
            .into_iter()
            .map(|d| DownloadedSubtitle {
                id: d.idsubtitlefile,
                payload: d.data,
            })
            .collect())
    }

    async fn movie_details(&self, token: &str, imdb_id: &str) -> Result<MovieDetails> {
        let digits = imdb_id.trim_start_matches("tt");
        let params = DetailsParams {
            token,
            imdbid: format!("{:0>7}", digits),
        };
        let resp: DetailsResponse =
            serde_json::from_value(self.call("GetIMDBMovieDetails", &params).await?)?;
        resp.data
            .map(|raw| raw.into_details(digits))
            .ok_or_else(|| crate::Error::Network(format!("no details for imdb id {}", imdb_id)))
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::Network(format!(
                "cover download failed with status: {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.call("LogOut", &TokenParams { token }).await?;
        Ok(())
    }
}
