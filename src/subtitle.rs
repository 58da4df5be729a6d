/*!
 * Provider-independent subtitle abstractions.
 *
 * `Subtitle` is what every provider hands back from `list_subtitles`, and
 * `MatchTag` names one dimension on which a subtitle agrees with a video.
 */

use std::collections::HashSet;
use std::fmt;
use isolang::Language;
use serde::{Deserialize, Serialize};

use crate::video::Episode;

/// An attribute on which a subtitle candidate agrees with the target video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTag {
    TvdbId,
    Series,
    Season,
    Episode,
    Year,
    ReleaseGroup,
    Resolution,
    Format,
    VideoCodec,
}

impl MatchTag {
    /// Every tag a scorer may produce
    pub const ALL: [MatchTag; 9] = [
        MatchTag::TvdbId,
        MatchTag::Series,
        MatchTag::Season,
        MatchTag::Episode,
        MatchTag::Year,
        MatchTag::ReleaseGroup,
        MatchTag::Resolution,
        MatchTag::Format,
        MatchTag::VideoCodec,
    ];

    /// Stable snake_case name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TvdbId => "tvdb_id",
            Self::Series => "series",
            Self::Season => "season",
            Self::Episode => "episode",
            Self::Year => "year",
            Self::ReleaseGroup => "release_group",
            Self::Resolution => "resolution",
            Self::Format => "format",
            Self::VideoCodec => "video_codec",
        }
    }
}

impl fmt::Display for MatchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subtitle offered by a provider
///
/// Candidates are ranked by the number of tags `compute_matches` returns;
/// breaking ties is up to the caller.
pub trait Subtitle: Send + Sync + fmt::Debug {
    /// Name of the provider that produced this subtitle
    fn provider_name(&self) -> &'static str;

    /// Language of the subtitle
    fn language(&self) -> Language;

    /// Decoded text, available once the subtitle has been downloaded
    fn content(&self) -> Option<&str>;

    /// Attributes on which this subtitle agrees with `video`
    fn compute_matches(&self, video: &Episode) -> HashSet<MatchTag>;
}
