/*!
 * BierDopje subtitle provider.
 *
 * BierDopje serves Dutch and English subtitles for TV episodes. Shows are
 * addressed either by their TVDB id or by an internal show id that is
 * resolved from the series name and cached for a long time.
 *
 * - `client`: HTTP calls and response classification
 * - `dto`: XML response documents
 * - `subtitle`: the subtitle type and its match scoring
 */

use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use futures::future::try_join_all;
use isolang::Language;
use log::{debug, info, warn};

use crate::app_config::ProviderSettings;
use crate::cache::ExpiringCache;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::SubtitleProvider;
use crate::providers::transport::HttpTransport;
use crate::text_encoding::decode_best_effort;
use crate::validation::{SrtValidator, SubtitleValidator};
use crate::video::Episode;

pub mod client;
pub mod dto;
pub mod subtitle;

pub use client::ApiClient;
pub use subtitle::BierDopjeSubtitle;

use dto::ResultEntry;

/// Name the provider reports
pub const PROVIDER_NAME: &str = "bierdopje";

/// Languages the service carries subtitles for
pub const SUPPORTED_LANGUAGES: [Language; 2] = [Language::Eng, Language::Nld];

/// Cache key of a show lookup: lowercased series name and optional year
pub type ShowKey = (String, Option<u16>);

/// Show id lookups; `None` records that the series is unknown
pub type ShowCache = ExpiringCache<ShowKey, Option<u32>>;

/// BierDopje provider
#[derive(Debug)]
pub struct BierDopjeProvider {
    /// API client
    client: ApiClient,
    /// Memoized show id lookups
    show_cache: ShowCache,
    /// Acceptance check for downloaded text
    validator: Arc<dyn SubtitleValidator>,
    /// Languages the provider searches
    languages: HashSet<Language>,
}

impl BierDopjeProvider {
    /// Create a provider talking to the service over `reqwest`
    pub fn new(settings: ProviderSettings) -> Self {
        Self::from_client(ApiClient::new(settings))
    }

    /// Create a provider talking to the service over `transport`
    pub fn with_transport(settings: ProviderSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self::from_client(ApiClient::with_transport(settings, transport))
    }

    fn from_client(client: ApiClient) -> Self {
        let languages = enabled_languages(client.settings());
        Self {
            client,
            show_cache: ShowCache::new(),
            validator: Arc::new(SrtValidator::new()),
            languages,
        }
    }

    /// Share a show cache with other provider instances
    pub fn with_show_cache(mut self, show_cache: ShowCache) -> Self {
        self.show_cache = show_cache;
        self
    }

    /// Replace the subtitle validator
    pub fn with_validator(mut self, validator: Arc<dyn SubtitleValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Show id cache in use
    pub fn show_cache(&self) -> &ShowCache {
        &self.show_cache
    }

    /// Find the show id of `series` with optional `year`
    ///
    /// # Arguments
    /// * `series` - Series of the episode, in lowercase
    /// * `year` - Year of the series, if any
    ///
    /// # Returns
    /// * `Result<Option<u32>, ProviderError>` - The show id, or `None` if the series is unknown.
    ///   Answers, including `None`, are cached for the show expiration window; errors are not.
    pub async fn find_show_id(&self, series: &str, year: Option<u16>) -> Result<Option<u32>, ProviderError> {
        let series = series.to_lowercase();
        let key: ShowKey = (series.clone(), year);
        let ttl = self.client.settings().show_expiration();

        self.show_cache
            .get_or_compute(key, ttl, || self.search_show_id(&series, year))
            .await
    }

    async fn search_show_id(&self, series: &str, year: Option<u16>) -> Result<Option<u32>, ProviderError> {
        debug!("Searching for series {:?}", series);
        let document = self
            .client
            .get("FindShowByName/{series}", &[("series", series.to_string())])
            .await?;

        if !document.has_results() {
            info!("Series {:?} not found", series);
            return Ok(None);
        }

        select_show_id(document.results(), series, year)
    }

    /// Search subtitles for one episode in one language
    ///
    /// # Arguments
    /// * `language` - Language of the subtitles
    /// * `season` / `episode` - Episode to search for
    /// * `tvdb_id` - TVDB id of the series; takes precedence over `series`
    /// * `series` - Series name, resolved to a show id when no TVDB id is given
    /// * `year` - Year of the series, used to resolve `series`
    ///
    /// # Returns
    /// * `Result<Vec<BierDopjeSubtitle>, ProviderError>` - Candidates in response order; empty
    ///   when the show is unknown or has no subtitles
    pub async fn query(
        &self,
        language: Language,
        season: u32,
        episode: u32,
        tvdb_id: Option<u32>,
        series: Option<&str>,
        year: Option<u16>,
    ) -> Result<Vec<BierDopjeSubtitle>, ProviderError> {
        if !self.languages.contains(&language) {
            return Err(ProviderError::UnsupportedLanguage(language.to_name().to_string()));
        }
        let language_code = language_utils::to_alpha2(language)
            .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))?;

        let (show_id, is_tvdb_id) = match (tvdb_id, series) {
            (Some(tvdb_id), _) => (tvdb_id, true),
            (None, Some(series)) => match self.find_show_id(series, year).await? {
                Some(show_id) => (show_id, false),
                None => return Ok(Vec::new()),
            },
            (None, None) => return Err(ProviderError::MissingShowIdentifier),
        };

        let params = [
            ("showid", show_id.to_string()),
            ("season", season.to_string()),
            ("episode", episode.to_string()),
            ("language", language_code.to_string()),
            ("istvdbid", is_tvdb_id.to_string()),
        ];
        debug!("Searching subtitles {:?}", params);
        let document = self
            .client
            .get("GetAllSubsFor/{showid}/{season}/{episode}/{language}/{istvdbid}", &params)
            .await?;

        if !document.has_results() {
            debug!("No subtitle found");
            return Ok(Vec::new());
        }

        debug!("Found {} subtitles", document.results().len());
        document
            .results()
            .iter()
            .map(|result| -> Result<BierDopjeSubtitle, ProviderError> {
                Ok(BierDopjeSubtitle::new(
                    language,
                    season,
                    episode,
                    tvdb_id,
                    series.map(str::to_string),
                    year,
                    result.file_name()?,
                    result.download_link()?,
                ))
            })
            .collect()
    }
}

/// Configured languages the service carries; unknown codes are dropped
fn enabled_languages(settings: &ProviderSettings) -> HashSet<Language> {
    settings
        .languages
        .iter()
        .filter_map(|code| match language_utils::parse_language(code) {
            Ok(language) if SUPPORTED_LANGUAGES.contains(&language) => Some(language),
            Ok(language) => {
                warn!("BierDopje has no {} subtitles, ignoring it", language.to_name());
                None
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
        .collect()
}

/// Pick the show id among search results
///
/// An exact `"<series> (<year>)"` name wins when a year is given, then an
/// exact series name, and otherwise the first result is taken as the best
/// guess of the fuzzy search.
pub fn select_show_id(results: &[ResultEntry], series: &str, year: Option<u16>) -> Result<Option<u32>, ProviderError> {
    if let Some(year) = year {
        let with_year = format!("{} ({})", series, year);
        if let Some(result) = results.iter().find(|r| r.show_name().to_lowercase() == with_year) {
            return result.show_id().map(Some);
        }
    }

    if let Some(result) = results.iter().find(|r| r.show_name().to_lowercase() == series) {
        return result.show_id().map(Some);
    }

    match results.first() {
        Some(result) => {
            debug!("No exact match for {:?}, using {:?}", series, result.show_name());
            result.show_id().map(Some)
        }
        None => {
            info!("Series {:?} not found", series);
            Ok(None)
        }
    }
}

#[async_trait]
impl SubtitleProvider for BierDopjeProvider {
    type Subtitle = BierDopjeSubtitle;

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn languages(&self) -> &HashSet<Language> {
        &self.languages
    }

    async fn initialize(&mut self) -> Result<(), ProviderError> {
        self.client.open()
    }

    async fn terminate(&mut self) -> Result<(), ProviderError> {
        self.client.close();
        Ok(())
    }

    async fn list_subtitles(
        &self,
        video: &Episode,
        languages: &[Language],
    ) -> Result<Vec<BierDopjeSubtitle>, ProviderError> {
        let languages: Vec<Language> = languages
            .iter()
            .copied()
            .filter(|language| {
                let supported = self.languages.contains(language);
                if !supported {
                    debug!("Skipping unsupported language {}", language.to_name());
                }
                supported
            })
            .collect();
        if languages.is_empty() {
            return Ok(Vec::new());
        }

        // Resolve the show once so the per-language queries hit the cache
        if let (None, Some(series)) = (video.tvdb_id, video.series.as_deref()) {
            if self.find_show_id(series, video.year).await?.is_none() {
                return Ok(Vec::new());
            }
        }

        let queries = languages.into_iter().map(|language| {
            self.query(
                language,
                video.season,
                video.episode,
                video.tvdb_id,
                video.series.as_deref(),
                video.year,
            )
        });

        // try_join_all keeps the input order
        let per_language = try_join_all(queries).await?;
        Ok(per_language.into_iter().flatten().collect())
    }

    async fn download_subtitle(&self, subtitle: &mut BierDopjeSubtitle) -> Result<(), ProviderError> {
        let bytes = self.client.download_raw(subtitle.download_link()).await?;
        let text = decode_best_effort(&bytes);

        if !self.validator.is_valid(&text) {
            warn!("Downloaded subtitle {:?} is not a valid subtitle", subtitle.filename());
            return Err(ProviderError::InvalidSubtitle(subtitle.filename().to_string()));
        }

        subtitle.set_content(text);
        Ok(())
    }
}
