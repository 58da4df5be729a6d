/*!
 * Plausibility checks for downloaded subtitle text.
 *
 * A provider never trusts the payload it downloads: the service may answer
 * with an HTML error page or a truncated file. Every download is passed
 * through a `SubtitleValidator` before it is attached to a subtitle.
 *
 * # Architecture
 *
 * - `srt`: accepts text that parses as SubRip
 */

use std::fmt::Debug;

pub mod srt;

// Re-export main types
pub use srt::SrtValidator;

/// Decides whether decoded text is a usable subtitle
pub trait SubtitleValidator: Send + Sync + Debug {
    /// Return true if `text` looks like a subtitle
    fn is_valid(&self, text: &str) -> bool;
}
