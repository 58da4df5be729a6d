use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

// @module: SRT parsing for downloaded subtitle text

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

// @struct: Where and why strict parsing stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtParseError {
    // @field: 1-based line number of the offending line
    pub line: usize,

    // @field: What was expected there
    pub reason: String,
}

impl fmt::Display for SrtParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl std::error::Error for SrtParseError {}

/// Position inside an SRT block
enum BlockState {
    ExpectIndex,
    ExpectTimestamp(usize),
    Text { seq_num: usize, start_ms: u64, end_ms: u64 },
}

impl SubtitleEntry {
    /// Parse SRT text strictly, stopping at the first malformed block
    ///
    /// Unlike a lenient reader this never skips lines it cannot place; the
    /// error reports the line where the structure broke.
    pub fn parse_srt_strict(content: &str) -> Result<Vec<SubtitleEntry>, SrtParseError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut entries = Vec::new();
        let mut state = BlockState::ExpectIndex;
        let mut current_text = String::new();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();

            state = match state {
                BlockState::ExpectIndex if trimmed.is_empty() => BlockState::ExpectIndex,
                BlockState::ExpectIndex => match trimmed.parse::<usize>() {
                    Ok(seq_num) => BlockState::ExpectTimestamp(seq_num),
                    Err(_) => {
                        return Err(SrtParseError {
                            line: line_number,
                            reason: format!("expected a sequence number, found '{}'", trimmed),
                        });
                    }
                },
                BlockState::ExpectTimestamp(seq_num) => {
                    let caps = TIMESTAMP_REGEX.captures(trimmed).ok_or_else(|| SrtParseError {
                        line: line_number,
                        reason: format!("expected a timestamp line, found '{}'", trimmed),
                    })?;
                    let start_ms = Self::parse_timestamp_to_ms(&caps, 1);
                    let end_ms = Self::parse_timestamp_to_ms(&caps, 5);
                    if end_ms < start_ms {
                        return Err(SrtParseError {
                            line: line_number,
                            reason: "end time is before start time".to_string(),
                        });
                    }
                    BlockState::Text { seq_num, start_ms, end_ms }
                }
                BlockState::Text { seq_num, start_ms, end_ms } if trimmed.is_empty() => {
                    entries.push(SubtitleEntry {
                        seq_num,
                        start_time_ms: start_ms,
                        end_time_ms: end_ms,
                        text: std::mem::take(&mut current_text),
                    });
                    BlockState::ExpectIndex
                }
                BlockState::Text { seq_num, start_ms, end_ms } => {
                    if !current_text.is_empty() {
                        current_text.push('\n');
                    }
                    current_text.push_str(trimmed);
                    BlockState::Text { seq_num, start_ms, end_ms }
                }
            };
        }

        match state {
            BlockState::Text { seq_num, start_ms, end_ms } => entries.push(SubtitleEntry {
                seq_num,
                start_time_ms: start_ms,
                end_time_ms: end_ms,
                text: current_text,
            }),
            BlockState::ExpectTimestamp(_) => {
                return Err(SrtParseError {
                    line: content.lines().count(),
                    reason: "block ends without a timestamp".to_string(),
                });
            }
            BlockState::ExpectIndex => {}
        }

        debug!("Parsed {} subtitle entries", entries.len());
        Ok(entries)
    }

    /// Parse timestamp to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |offset: usize| -> u64 {
            caps.get(start_idx + offset)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3)
    }
}
