/*!
 * SubRip validation.
 *
 * Text is accepted when it parses as SubRip. A file whose structure only
 * breaks late, after a substantial valid prefix, is still accepted: trailing
 * garbage is common in subtitles found in the wild.
 */

use log::{debug, warn};

use crate::subtitle_processor::SubtitleEntry;
use crate::validation::SubtitleValidator;

/// Parse errors past this line do not reject the file
const DEFAULT_TOLERATED_ERROR_LINE: usize = 80;

/// Validator that accepts SubRip text
#[derive(Debug, Clone)]
pub struct SrtValidator {
    /// Errors on or before this line reject the text
    tolerated_error_line: usize,
}

impl SrtValidator {
    /// Create a validator with the default tolerance
    pub fn new() -> Self {
        Self {
            tolerated_error_line: DEFAULT_TOLERATED_ERROR_LINE,
        }
    }

    /// Create a validator that rejects parse errors up to `line`
    pub fn with_tolerated_error_line(line: usize) -> Self {
        Self {
            tolerated_error_line: line,
        }
    }
}

impl Default for SrtValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleValidator for SrtValidator {
    fn is_valid(&self, text: &str) -> bool {
        match SubtitleEntry::parse_srt_strict(text) {
            Ok(entries) if entries.is_empty() => {
                debug!("Rejecting subtitle without any entry");
                false
            }
            Ok(_) => true,
            Err(e) if e.line > self.tolerated_error_line => {
                warn!("Accepting subtitle with a late parse error at {}", e);
                true
            }
            Err(e) => {
                debug!("Rejecting subtitle: {}", e);
                false
            }
        }
    }
}
