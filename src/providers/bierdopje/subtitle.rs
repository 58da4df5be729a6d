use std::collections::HashSet;
use isolang::Language;

use crate::guess::{compute_guess_matches, EpisodeGuesser, FilenameGuesser};
use crate::subtitle::{MatchTag, Subtitle};
use crate::video::Episode;

use super::PROVIDER_NAME;

/// A subtitle offered by BierDopje
///
/// Season, episode and show identity come from the query that produced the
/// subtitle, not from the service's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BierDopjeSubtitle {
    language: Language,
    season: u32,
    episode: u32,
    tvdb_id: Option<u32>,
    series: Option<String>,
    year: Option<u16>,
    filename: String,
    download_link: String,
    content: Option<String>,
}

impl BierDopjeSubtitle {
    /// Create a subtitle that has not been downloaded yet
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        language: Language,
        season: u32,
        episode: u32,
        tvdb_id: Option<u32>,
        series: Option<String>,
        year: Option<u16>,
        filename: impl Into<String>,
        download_link: impl Into<String>,
    ) -> Self {
        Self {
            language,
            season,
            episode,
            tvdb_id,
            series,
            year,
            filename: filename.into(),
            download_link: download_link.into(),
            content: None,
        }
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn tvdb_id(&self) -> Option<u32> {
        self.tvdb_id
    }

    pub fn series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Name of the release the subtitle was made for
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn download_link(&self) -> &str {
        &self.download_link
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    /// Attributes on which this subtitle agrees with `video`, reading the
    /// release name with `guesser`
    pub fn compute_matches_with(&self, video: &Episode, guesser: &dyn EpisodeGuesser) -> HashSet<MatchTag> {
        let mut matches = HashSet::new();

        if video.tvdb_id.is_some() && self.tvdb_id == video.tvdb_id {
            matches.insert(MatchTag::TvdbId);
        }
        if video.series.is_some() && self.series == video.series {
            matches.insert(MatchTag::Series);
        }
        if self.season == video.season {
            matches.insert(MatchTag::Season);
        }
        if self.episode == video.episode {
            matches.insert(MatchTag::Episode);
        }
        // No year on either side counts as agreement
        if self.year == video.year {
            matches.insert(MatchTag::Year);
        }

        let guess = guesser.guess_episode(&self.filename);
        matches.extend(compute_guess_matches(video, &guess));
        matches
    }
}

impl Subtitle for BierDopjeSubtitle {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn language(&self) -> Language {
        self.language
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn compute_matches(&self, video: &Episode) -> HashSet<MatchTag> {
        self.compute_matches_with(video, &FilenameGuesser)
    }
}
