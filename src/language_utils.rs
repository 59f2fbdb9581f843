use isolang::Language;

use crate::errors::ConfigError;

/// Language utilities for localization locale tags
///
/// Catalog languages are locale tags such as `fr`, `pt-BR` or `zh-Hans`.
/// The primary subtag is an ISO 639-1 (2-letter) or ISO 639-2 (3-letter)
/// code; anything after the first `-` or `_` is a script or region.
/// Split a locale tag into its primary language subtag and the remainder
pub fn split_locale(tag: &str) -> (String, Option<String>) {
    let tag = tag.trim();
    match tag.find(['-', '_']) {
        Some(idx) => {
            let rest = &tag[idx + 1..];
            let rest = if rest.is_empty() { None } else { Some(rest.to_string()) };
            (tag[..idx].to_lowercase(), rest)
        }
        None => (tag.to_lowercase(), None),
    }
}

/// Resolve the primary subtag of a locale tag to an ISO language
fn lookup_language(tag: &str) -> Option<Language> {
    let (primary, _) = split_locale(tag);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&part2b_to_part2t(&primary)),
        _ => None,
    }
}

/// Map the ISO 639-2/B codes that differ from their ISO 639-2/T form
fn part2b_to_part2t(code: &str) -> String {
    match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        other => other,
    }
    .to_string()
}

/// Validate a locale tag against ISO 639
pub fn validate_locale(tag: &str) -> Result<(), ConfigError> {
    if lookup_language(tag).is_some() {
        Ok(())
    } else {
        Err(ConfigError::InvalidLanguage(tag.to_string()))
    }
}

/// Human readable name for a locale tag, e.g. `pt-BR` -> `Portuguese (BR)`.
///
/// Unknown tags are returned unchanged so prompt rendering never fails.
pub fn display_name(tag: &str) -> String {
    match lookup_language(tag) {
        Some(lang) => match split_locale(tag).1 {
            Some(variant) => format!("{} ({})", lang.to_name(), variant),
            None => lang.to_name().to_string(),
        },
        None => tag.trim().to_string(),
    }
}
