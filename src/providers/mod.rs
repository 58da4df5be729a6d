/*! 
 * Subtitle provider implementations.
 * 
 * This module contains the provider capability contract and its
 * implementations:
 * - `transport`: HTTP seam shared by providers
 * - `bierdopje`: BierDopje API integration
 */

use async_trait::async_trait;
use isolang::Language;
use std::collections::HashSet;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::video::Episode;

/// Common trait for all subtitle providers
/// 
/// A provider is initialized once, queried any number of times, and
/// terminated once. Requests made outside that window fail with
/// `ProviderError::NotInitialized`.
#[async_trait]
pub trait SubtitleProvider: Send + Sync + Debug {
    /// The subtitle type this provider produces
    type Subtitle: crate::subtitle::Subtitle;

    /// Short name of the provider
    fn name(&self) -> &'static str;

    /// Languages the provider can search for
    fn languages(&self) -> &HashSet<Language>;

    /// Acquire the provider's connection context
    async fn initialize(&mut self) -> Result<(), ProviderError>;

    /// Release the connection context
    async fn terminate(&mut self) -> Result<(), ProviderError>;

    /// List the subtitles available for `video` in `languages`
    /// 
    /// # Arguments
    /// * `video` - The episode to search subtitles for
    /// * `languages` - The languages to search, in order of preference
    /// 
    /// # Returns
    /// * `Result<Vec<Self::Subtitle>, ProviderError>` - Candidates grouped by language, in `languages` order
    async fn list_subtitles(
        &self,
        video: &Episode,
        languages: &[Language],
    ) -> Result<Vec<Self::Subtitle>, ProviderError>;

    /// Download the content of `subtitle` and attach it
    async fn download_subtitle(&self, subtitle: &mut Self::Subtitle) -> Result<(), ProviderError>;
}

pub mod transport;
pub mod bierdopje;
