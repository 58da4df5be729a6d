/*!
 * Metadata guessing from release file names.
 *
 * Subtitle services label their files with the name of the release they were
 * synced against. `FilenameGuesser` reads series, season, episode, year and
 * release properties out of such names, and `compute_guess_matches` compares
 * a guess against a video.
 */

use std::collections::HashSet;
use std::fmt::Debug;
use regex::Regex;
use once_cell::sync::Lazy;

use crate::subtitle::MatchTag;
use crate::video::Episode;

static EXTENSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mkv|mp4|avi|m4v|mov|wmv|ts|srt|sub|ass)$").unwrap()
});

static EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bs(\d{1,2})[ ._-]?e(\d{1,3})|\b(\d{1,2})x(\d{2,3})\b").unwrap()
});

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\b(19\d{2}|20\d{2})\b\)?").unwrap()
});

static RESOLUTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(480p|576p|720p|1080p|1080i|2160p)\b").unwrap()
});

static FORMAT_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\bHDTV\b").unwrap(), "HDTV"),
        (Regex::new(r"(?i)\bWEB[ ._-]?DL\b").unwrap(), "WEB-DL"),
        (Regex::new(r"(?i)\bWEB[ ._-]?Rip\b").unwrap(), "WEBRip"),
        (Regex::new(r"(?i)\b(BluRay|BDRip|BRRip)\b").unwrap(), "BluRay"),
        (Regex::new(r"(?i)\bDVD[ ._-]?Rip\b").unwrap(), "DVD"),
    ]
});

static CODEC_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\b(x264|h\.?264)\b").unwrap(), "h264"),
        (Regex::new(r"(?i)\b(x265|h\.?265|hevc)\b").unwrap(), "h265"),
        (Regex::new(r"(?i)\bxvid\b").unwrap(), "XviD"),
    ]
});

static RELEASE_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([A-Za-z0-9]+)$").unwrap()
});

/// Best-effort metadata read from a file name; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeGuess {
    pub series: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub year: Option<u16>,
    pub release_group: Option<String>,
    pub resolution: Option<String>,
    pub format: Option<String>,
    pub video_codec: Option<String>,
}

/// Infers episode metadata from a file name
pub trait EpisodeGuesser: Send + Sync + Debug {
    /// Guess what `filename` describes
    fn guess_episode(&self, filename: &str) -> EpisodeGuess;
}

/// Regex-based guesser for scene-style release names
#[derive(Debug, Default, Clone, Copy)]
pub struct FilenameGuesser;

impl FilenameGuesser {
    /// Create a new guesser
    pub fn new() -> Self {
        Self
    }

    /// File name without directories or a known media extension
    fn stem(filename: &str) -> &str {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        match EXTENSION_REGEX.find(base) {
            Some(ext) => &base[..ext.start()],
            None => base,
        }
    }

    /// Turn the part of the name before the episode marker into a series name
    fn clean_series(prefix: &str) -> Option<String> {
        let without_year = YEAR_REGEX.replace_all(prefix, " ");
        let words: Vec<&str> = without_year
            .split(|c: char| c == '.' || c == '_' || c.is_whitespace())
            .filter(|word| !word.is_empty() && *word != "-")
            .collect();

        let series = words.join(" ");
        let series = series.trim_matches(|c: char| c == '-' || c.is_whitespace());
        if series.is_empty() {
            None
        } else {
            Some(series.to_string())
        }
    }

    fn first_label(patterns: &[(Regex, &'static str)], text: &str) -> Option<String> {
        patterns
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, label)| label.to_string())
    }
}

impl EpisodeGuesser for FilenameGuesser {
    fn guess_episode(&self, filename: &str) -> EpisodeGuess {
        let stem = Self::stem(filename);
        let mut guess = EpisodeGuess::default();

        let series_part = match EPISODE_REGEX.captures(stem) {
            Some(caps) => {
                let season = caps.get(1).or_else(|| caps.get(3));
                let episode = caps.get(2).or_else(|| caps.get(4));
                guess.season = season.and_then(|m| m.as_str().parse().ok());
                guess.episode = episode.and_then(|m| m.as_str().parse().ok());
                caps.get(0).map_or(stem, |m| &stem[..m.start()])
            }
            None => "",
        };

        guess.year = YEAR_REGEX
            .captures(series_part)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());
        guess.series = Self::clean_series(series_part);

        guess.resolution = RESOLUTION_REGEX
            .find(stem)
            .map(|m| m.as_str().to_lowercase());
        guess.format = Self::first_label(&FORMAT_PATTERNS, stem);
        guess.video_codec = Self::first_label(&CODEC_PATTERNS, stem);
        guess.release_group = RELEASE_GROUP_REGEX
            .captures(stem)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|group| !group.eq_ignore_ascii_case("dl"));

        guess
    }
}

fn eq_ignore_case(left: &Option<String>, right: &Option<String>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left.to_lowercase() == right.to_lowercase(),
        _ => false,
    }
}

/// Tags on which a file name guess agrees with a video
///
/// Like the direct comparison on subtitles, the year counts as a match when
/// neither side has one.
pub fn compute_guess_matches(video: &Episode, guess: &EpisodeGuess) -> HashSet<MatchTag> {
    let mut matches = HashSet::new();

    if eq_ignore_case(&video.series, &guess.series) {
        matches.insert(MatchTag::Series);
    }
    if guess.season == Some(video.season) {
        matches.insert(MatchTag::Season);
    }
    if guess.episode == Some(video.episode) {
        matches.insert(MatchTag::Episode);
    }
    if video.year == guess.year {
        matches.insert(MatchTag::Year);
    }
    if eq_ignore_case(&video.release_group, &guess.release_group) {
        matches.insert(MatchTag::ReleaseGroup);
    }
    if video.resolution.is_some() && video.resolution == guess.resolution {
        matches.insert(MatchTag::Resolution);
    }
    if eq_ignore_case(&video.format, &guess.format) {
        matches.insert(MatchTag::Format);
    }
    if video.video_codec.is_some() && video.video_codec == guess.video_codec {
        matches.insert(MatchTag::VideoCodec);
    }

    matches
}
