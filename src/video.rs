use serde::{Deserialize, Serialize};

use crate::guess::EpisodeGuesser;

// @module: Video metadata supplied by the caller

// @struct: A TV episode a subtitle is searched for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Episode {
    // @field: File name or path of the video
    #[serde(default)]
    pub name: String,

    // @field: Series name
    pub series: Option<String>,

    // @field: Season number
    pub season: u32,

    // @field: Episode number
    pub episode: u32,

    // @field: TVDB id of the series
    pub tvdb_id: Option<u32>,

    // @field: First air year of the series, used to tell remakes apart
    pub year: Option<u16>,

    // @field: Release group
    pub release_group: Option<String>,

    // @field: Screen size, e.g. 720p
    pub resolution: Option<String>,

    // @field: Source format, e.g. HDTV
    pub format: Option<String>,

    // @field: Video codec, e.g. h264
    pub video_codec: Option<String>,
}

impl Episode {
    /// Create an episode of a named series
    pub fn new(series: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            series: Some(series.into()),
            season,
            episode,
            ..Default::default()
        }
    }

    /// Create an episode known only by its TVDB id
    pub fn from_tvdb_id(tvdb_id: u32, season: u32, episode: u32) -> Self {
        Self {
            tvdb_id: Some(tvdb_id),
            season,
            episode,
            ..Default::default()
        }
    }

    /// Build an episode from what a guesser can read out of its file name
    ///
    /// Returns `None` when the name carries no season or episode number.
    pub fn from_name(name: impl Into<String>, guesser: &dyn EpisodeGuesser) -> Option<Self> {
        let name = name.into();
        let guess = guesser.guess_episode(&name);
        let (season, episode) = (guess.season?, guess.episode?);

        Some(Self {
            name,
            series: guess.series,
            season,
            episode,
            tvdb_id: None,
            year: guess.year,
            release_group: guess.release_group,
            resolution: guess.resolution,
            format: guess.format,
            video_codec: guess.video_codec,
        })
    }

    /// Set the TVDB id
    pub fn with_tvdb_id(mut self, tvdb_id: u32) -> Self {
        self.tvdb_id = Some(tvdb_id);
        self
    }

    /// Set the series year
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Whether the episode can be looked up at all: by TVDB id or by series
    pub fn has_show_identifier(&self) -> bool {
        self.tvdb_id.is_some() || self.series.is_some()
    }
}
