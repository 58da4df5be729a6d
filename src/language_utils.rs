/*!
 * Language utilities for ISO language code handling.
 *
 * The subtitle service addresses languages by their ISO 639-1 code while
 * callers commonly hold ISO 639-2 or ISO 639-3 codes. These helpers map
 * between the two.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent, if it differs
fn bibliographic_to_terminologic(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Parse an ISO 639-1, ISO 639-2/B, ISO 639-2/T or ISO 639-3 code
pub fn parse_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = bibliographic_to_terminologic(&normalized_code)
                .unwrap_or(&normalized_code);
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// ISO 639-1 code of a language, as used in the service's request paths
pub fn to_alpha2(language: Language) -> Result<&'static str> {
    language
        .to_639_1()
        .ok_or_else(|| anyhow!("Language {} has no ISO 639-1 code", language.to_639_3()))
}
