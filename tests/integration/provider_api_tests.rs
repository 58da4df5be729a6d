/*!
 * Integration tests for provider API interactions
 */

use std::sync::Arc;
use isolang::Language;

use bierdopje_provider::errors::{ErrorClass, ProviderError};
use bierdopje_provider::{BierDopjeProvider, Episode, ProviderSettings, Subtitle, SubtitleProvider};
use crate::common::mock_transport::MockTransport;
use crate::common::{error_xml, initialized_provider, not_found_xml, shows_xml, subtitles_xml, SAMPLE_SRT};

fn lost_search() -> Arc<MockTransport> {
    Arc::new(
        MockTransport::new()
            .route("FindShowByName/lost", 200, shows_xml(&[(1, "Lost (2004)"), (2, "Lost")])),
    )
}

#[tokio::test]
async fn test_findShowId_withYear_shouldPreferYearQualifiedMatch() {
    let transport = lost_search();
    let provider = initialized_provider(&transport).await;

    assert_eq!(provider.find_show_id("lost", Some(2004)).await.unwrap(), Some(1));
    assert_eq!(provider.find_show_id("lost", None).await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_findShowId_calledTwice_shouldHitNetworkOnce() {
    let transport = lost_search();
    let provider = initialized_provider(&transport).await;

    provider.find_show_id("lost", None).await.unwrap();
    provider.find_show_id("lost", None).await.unwrap();

    assert_eq!(transport.count_matching("FindShowByName"), 1);
}

#[tokio::test]
async fn test_findShowId_withUnknownSeries_shouldCacheNotFound() {
    let transport = Arc::new(MockTransport::new().route("FindShowByName", 200, not_found_xml()));
    let provider = initialized_provider(&transport).await;

    assert_eq!(provider.find_show_id("no such show", None).await.unwrap(), None);
    assert_eq!(provider.find_show_id("no such show", None).await.unwrap(), None);

    assert_eq!(transport.count_matching("FindShowByName/no%20such%20show"), 1);
}

#[tokio::test]
async fn test_findShowId_withSharedCache_shouldReuseAcrossProviders() {
    let transport = lost_search();
    let first = initialized_provider(&transport).await;
    let second = BierDopjeProvider::with_transport(ProviderSettings::default(), transport.clone())
        .with_show_cache(first.show_cache().clone());
    let mut second = second;
    second.initialize().await.unwrap();

    first.find_show_id("lost", None).await.unwrap();
    assert_eq!(second.find_show_id("lost", None).await.unwrap(), Some(2));
    assert_eq!(transport.count_matching("FindShowByName"), 1);
}

#[tokio::test]
async fn test_query_withTvdbId_shouldNeverResolveShow() {
    let transport = Arc::new(
        MockTransport::new()
            .route("GetAllSubsFor/73739/1/2/nl/true", 200, subtitles_xml(&[("Lost.S01E02.HDTV.XviD-LOL", "http://dl.example/1")])),
    );
    let provider = initialized_provider(&transport).await;

    let subtitles = provider
        .query(Language::Nld, 1, 2, Some(73739), Some("Lost"), None)
        .await
        .unwrap();

    assert_eq!(subtitles.len(), 1);
    assert_eq!(transport.count_matching("FindShowByName"), 0);
    assert_eq!(subtitles[0].tvdb_id(), Some(73739));
}

#[tokio::test]
async fn test_query_withUnknownSeries_shouldReturnEmptyWithoutSearching() {
    let transport = Arc::new(MockTransport::new().route("FindShowByName", 200, not_found_xml()));
    let provider = initialized_provider(&transport).await;

    let subtitles = provider
        .query(Language::Eng, 1, 1, None, Some("foo"), None)
        .await
        .unwrap();

    assert!(subtitles.is_empty());
    assert_eq!(transport.count_matching("GetAllSubsFor"), 0);
}

#[tokio::test]
async fn test_query_withoutShowIdentifier_shouldFailWithoutNetwork() {
    let transport = Arc::new(MockTransport::new());
    let provider = initialized_provider(&transport).await;

    let result = provider.query(Language::Eng, 1, 1, None, None, None).await;

    assert!(matches!(result, Err(ProviderError::MissingShowIdentifier)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_query_withUnsupportedLanguage_shouldFail() {
    let transport = Arc::new(MockTransport::new());
    let provider = initialized_provider(&transport).await;

    let result = provider.query(Language::Fra, 1, 1, Some(1), None, None).await;

    assert!(matches!(result, Err(ProviderError::UnsupportedLanguage(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_query_withResolvedSeries_shouldStampRequestMetadata() {
    let transport = Arc::new(
        MockTransport::new()
            .route("FindShowByName/lost", 200, shows_xml(&[(1, "Lost (2004)"), (2, "Lost")]))
            .route(
                "GetAllSubsFor/1/3/7/en/false",
                200,
                subtitles_xml(&[
                    ("Lost.S03E07.720p.HDTV.x264-CTU", "http://dl.example/a"),
                    ("Lost.S03E07.HDTV.XviD-XOR", "http://dl.example/b"),
                ]),
            ),
    );
    let provider = initialized_provider(&transport).await;

    let subtitles = provider
        .query(Language::Eng, 3, 7, None, Some("Lost"), Some(2004))
        .await
        .unwrap();

    assert_eq!(subtitles.len(), 2);
    for subtitle in &subtitles {
        assert_eq!(subtitle.season(), 3);
        assert_eq!(subtitle.episode(), 7);
        assert_eq!(subtitle.series(), Some("Lost"));
        assert_eq!(subtitle.year(), Some(2004));
        assert_eq!(subtitle.tvdb_id(), None);
        assert_eq!(subtitle.language(), Language::Eng);
        assert!(subtitle.content().is_none());
    }
    assert_eq!(subtitles[0].filename(), "Lost.S03E07.720p.HDTV.x264-CTU");
    assert_eq!(subtitles[1].download_link(), "http://dl.example/b");
}

#[tokio::test]
async fn test_query_withNoSubtitles_shouldReturnEmpty() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 200, not_found_xml()));
    let provider = initialized_provider(&transport).await;

    let subtitles = provider.query(Language::Nld, 1, 1, Some(5), None, None).await.unwrap();
    assert!(subtitles.is_empty());
}

#[tokio::test]
async fn test_get_withRateLimit_shouldBeUnavailableAndNotCached() {
    let transport = Arc::new(MockTransport::new().route("FindShowByName", 429, "Too Many Requests"));
    let provider = initialized_provider(&transport).await;

    let error = provider.find_show_id("lost", None).await.unwrap_err();
    assert!(matches!(error, ProviderError::RateLimitExceeded(_)));
    assert_eq!(error.class(), ErrorClass::Unavailable);

    provider.find_show_id("lost", None).await.unwrap_err();
    assert_eq!(transport.count_matching("FindShowByName"), 2);
}

#[tokio::test]
async fn test_get_withEmbeddedErrorMessage_shouldBeProviderError() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 200, error_xml("Invalid API key")));
    let provider = initialized_provider(&transport).await;

    let error = provider.query(Language::Eng, 1, 1, Some(5), None, None).await.unwrap_err();
    match error {
        ProviderError::ServiceError(message) => assert_eq!(message, "Invalid API key"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_withServerError_shouldCarryStatusCode() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 500, "oops"));
    let provider = initialized_provider(&transport).await;

    let error = provider.query(Language::Eng, 1, 1, Some(5), None, None).await.unwrap_err();
    assert!(matches!(error, ProviderError::ApiError { status_code: 500, .. }));
    assert_eq!(error.class(), ErrorClass::Provider);
}

#[tokio::test]
async fn test_get_withMalformedBody_shouldBeParseError() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 200, "<html><body><p>Down for maintenance</body></html>"));
    let provider = initialized_provider(&transport).await;

    let error = provider.query(Language::Eng, 1, 1, Some(5), None, None).await.unwrap_err();
    assert!(matches!(error, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_get_withTimeout_shouldBeUnavailable() {
    let transport = Arc::new(MockTransport::new().route_timeout("FindShowByName"));
    let provider = initialized_provider(&transport).await;

    let error = provider.find_show_id("lost", None).await.unwrap_err();
    assert!(matches!(error, ProviderError::Timeout(10)));
    assert!(error.is_unavailable());
}

#[tokio::test]
async fn test_listSubtitles_withTwoLanguages_shouldGroupByLanguageOrder() {
    let transport = Arc::new(
        MockTransport::new()
            .route("GetAllSubsFor/42/1/2/en/true", 200, subtitles_xml(&[("en-a", "http://dl.example/en-a"), ("en-b", "http://dl.example/en-b")]))
            .route("GetAllSubsFor/42/1/2/nl/true", 200, subtitles_xml(&[("nl-a", "http://dl.example/nl-a")])),
    );
    let provider = initialized_provider(&transport).await;
    let video = Episode::from_tvdb_id(42, 1, 2);

    let subtitles = provider
        .list_subtitles(&video, &[Language::Eng, Language::Nld])
        .await
        .unwrap();

    let filenames: Vec<&str> = subtitles.iter().map(|s| s.filename()).collect();
    assert_eq!(filenames, vec!["en-a", "en-b", "nl-a"]);
    assert_eq!(transport.count_matching("GetAllSubsFor"), 2);

    let reversed = provider
        .list_subtitles(&video, &[Language::Nld, Language::Eng])
        .await
        .unwrap();
    assert_eq!(reversed[0].language(), Language::Nld);
    assert_eq!(reversed[1].language(), Language::Eng);
}

#[tokio::test]
async fn test_listSubtitles_withSeries_shouldResolveShowOnce() {
    let transport = Arc::new(
        MockTransport::new()
            .route("FindShowByName/lost", 200, shows_xml(&[(2, "Lost")]))
            .route("GetAllSubsFor/2/1/2/", 200, subtitles_xml(&[("Lost.S01E02", "http://dl.example/x")])),
    );
    let provider = initialized_provider(&transport).await;

    let subtitles = provider
        .list_subtitles(&Episode::new("Lost", 1, 2), &[Language::Eng, Language::Nld])
        .await
        .unwrap();

    assert_eq!(subtitles.len(), 2);
    assert_eq!(transport.count_matching("FindShowByName"), 1);
}

#[tokio::test]
async fn test_listSubtitles_withUnsupportedLanguage_shouldSkipIt() {
    let transport = Arc::new(
        MockTransport::new().route("GetAllSubsFor/42/1/2/nl/true", 200, subtitles_xml(&[("nl-a", "http://dl.example/nl-a")])),
    );
    let provider = initialized_provider(&transport).await;

    let subtitles = provider
        .list_subtitles(&Episode::from_tvdb_id(42, 1, 2), &[Language::Fra, Language::Nld])
        .await
        .unwrap();

    assert_eq!(subtitles.len(), 1);
    assert_eq!(transport.count_matching("GetAllSubsFor"), 1);
}

#[tokio::test]
async fn test_downloadSubtitle_withValidSrt_shouldAttachContent() {
    let transport = Arc::new(
        MockTransport::new()
            .route("GetAllSubsFor", 200, subtitles_xml(&[("Lost.S01E02", "http://dl.example/sub/1")]))
            .route("dl.example/sub/1", 200, SAMPLE_SRT),
    );
    let provider = initialized_provider(&transport).await;
    let mut subtitles = provider.query(Language::Nld, 1, 2, Some(73739), None, None).await.unwrap();
    let before = subtitles[0].clone();

    provider.download_subtitle(&mut subtitles[0]).await.unwrap();

    assert_eq!(subtitles[0].content(), Some(SAMPLE_SRT));
    assert_eq!(subtitles[0].filename(), before.filename());
    assert_eq!(subtitles[0].season(), before.season());
}

#[tokio::test]
async fn test_downloadSubtitle_withLatin1Payload_shouldRecoverText() {
    let srt = "1\n00:00:01,000 --> 00:00:04,000\nÉén café, één crème brûlée, één déjà vu.\n";
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(srt);
    let transport = Arc::new(MockTransport::new().route("dl.example/latin1", 200, bytes.into_owned()));
    let provider = initialized_provider(&transport).await;
    let mut subtitle = bierdopje_provider::BierDopjeSubtitle::new(
        Language::Nld, 1, 1, Some(1), None, None, "x", "http://dl.example/latin1",
    );

    provider.download_subtitle(&mut subtitle).await.unwrap();

    assert!(subtitle.content().unwrap().contains("café"));
}

#[tokio::test]
async fn test_downloadSubtitle_withInvalidPayload_shouldLeaveContentUnset() {
    let transport = Arc::new(MockTransport::new().route("dl.example/html", 200, "<html><body>Subtitle removed</body></html>"));
    let provider = initialized_provider(&transport).await;
    let mut subtitle = bierdopje_provider::BierDopjeSubtitle::new(
        Language::Eng, 1, 1, Some(1), None, None, "Lost.S01E01", "http://dl.example/html",
    );

    let error = provider.download_subtitle(&mut subtitle).await.unwrap_err();

    assert!(matches!(error, ProviderError::InvalidSubtitle(_)));
    assert_eq!(error.class(), ErrorClass::InvalidContent);
    assert!(subtitle.content().is_none());
}

#[tokio::test]
async fn test_downloadSubtitle_withRateLimit_shouldBeUnavailable() {
    let transport = Arc::new(MockTransport::new().route("dl.example", 429, ""));
    let provider = initialized_provider(&transport).await;
    let mut subtitle = bierdopje_provider::BierDopjeSubtitle::new(
        Language::Eng, 1, 1, Some(1), None, None, "x", "http://dl.example/1",
    );

    let error = provider.download_subtitle(&mut subtitle).await.unwrap_err();
    assert!(matches!(error, ProviderError::RateLimitExceeded(_)));
    assert!(subtitle.content().is_none());
}

#[tokio::test]
async fn test_provider_beforeInitializeAndAfterTerminate_shouldRefuseRequests() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 200, not_found_xml()));
    let mut provider = BierDopjeProvider::with_transport(ProviderSettings::default(), transport.clone());

    let before = provider.query(Language::Eng, 1, 1, Some(5), None, None).await;
    assert!(matches!(before, Err(ProviderError::NotInitialized)));

    provider.initialize().await.unwrap();
    assert!(provider.query(Language::Eng, 1, 1, Some(5), None, None).await.is_ok());

    provider.terminate().await.unwrap();
    let after = provider.query(Language::Eng, 1, 1, Some(5), None, None).await;
    assert!(matches!(after, Err(ProviderError::NotInitialized)));
    assert_eq!(transport.requests().len(), 1);
}

#[derive(Debug)]
struct AcceptAll;

impl bierdopje_provider::validation::SubtitleValidator for AcceptAll {
    fn is_valid(&self, _text: &str) -> bool {
        true
    }
}

#[tokio::test]
async fn test_downloadSubtitle_withCustomValidator_shouldUseIt() {
    let transport = Arc::new(MockTransport::new().route("dl.example/plain", 200, "just some text"));
    let mut provider = BierDopjeProvider::with_transport(ProviderSettings::default(), transport.clone())
        .with_validator(Arc::new(AcceptAll));
    provider.initialize().await.unwrap();
    let mut subtitle = bierdopje_provider::BierDopjeSubtitle::new(
        Language::Eng, 1, 1, Some(1), None, None, "x", "http://dl.example/plain",
    );

    provider.download_subtitle(&mut subtitle).await.unwrap();

    assert_eq!(subtitle.content(), Some("just some text"));
}

#[tokio::test]
async fn test_provider_withDutchOnlySettings_shouldSkipEnglish() {
    let transport = Arc::new(MockTransport::new().route("GetAllSubsFor", 200, not_found_xml()));
    let settings = ProviderSettings {
        languages: vec!["nl".to_string()],
        ..Default::default()
    };
    let mut provider = BierDopjeProvider::with_transport(settings, transport.clone());
    provider.initialize().await.unwrap();

    assert_eq!(provider.languages().len(), 1);
    provider
        .list_subtitles(&Episode::from_tvdb_id(1, 1, 1), &[Language::Eng, Language::Nld])
        .await
        .unwrap();
    assert_eq!(transport.count_matching("/en/"), 0);
    assert_eq!(transport.count_matching("/nl/"), 1);
}
