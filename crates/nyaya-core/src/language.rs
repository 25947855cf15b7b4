//! Response language guard.
//!
//! Generated answers are checked against the requested language. When the
//! generator falls back to English anyway, the response is kept and an
//! apology notice is prepended instead of failing the request.

use crate::prompt::BASELINE_LANGUAGE;

/// Notice prepended when a response does not come back in the requested
/// language. The wording is part of the API.
pub const APOLOGY_NOTICE: &str = "Sorry, the response could not be generated in the selected language. Here is the response in English:\n\n";

/// Request code for a detected language, covering the languages the prompt
/// registry has templates for.
fn request_code(lang: whatlang::Lang) -> Option<&'static str> {
    use whatlang::Lang;
    match lang {
        Lang::Eng => Some("en"),
        Lang::Hin => Some("hi"),
        Lang::Tam => Some("ta"),
        Lang::Tel => Some("te"),
        Lang::Kan => Some("kn"),
        Lang::Mal => Some("ml"),
        Lang::Ben => Some("bn"),
        Lang::Mar => Some("mr"),
        Lang::Guj => Some("gu"),
        Lang::Pan => Some("pa"),
        _ => None,
    }
}

/// Detected request code for `text`, or `None` when detection fails or the
/// detected language has no template.
#[must_use]
pub fn detect_language(text: &str) -> Option<&'static str> {
    whatlang::detect(text).and_then(|info| request_code(info.lang()))
}

/// Accept a generated response or annotate it with the apology notice.
///
/// Baseline-language requests pass through untouched. For any other
/// requested language, a response detected as some other language (or not
/// detected at all) keeps its content but gains the notice prefix.
#[must_use]
pub fn verify_language(response: String, language: &str) -> String {
    if language == BASELINE_LANGUAGE {
        return response;
    }
    match detect_language(&response) {
        Some(code) if code == language => response,
        detected => {
            tracing::warn!(
                requested = language,
                ?detected,
                "response not in requested language"
            );
            format!("{APOLOGY_NOTICE}{response}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGLISH_TEXT: &str = "The accused was convicted of theft under section three hundred \
        and seventy eight and sentenced to three years of imprisonment.";

    const HINDI_TEXT: &str = "आप भारतीय दंड संहिता के विशेषज्ञ हैं। चोरी करने वाले व्यक्ति को धारा के अनुसार तीन वर्ष तक के कारावास से दंडित किया जाएगा। यह अपराध की गंभीरता पर निर्भर करता है।";

    const TAMIL_TEXT: &str = "திருட்டு குற்றத்திற்கு மூன்று ஆண்டுகள் வரை சிறைத்தண்டனை விதிக்கப்படும். இது குற்றத்தின் தீவிரத்தைப் பொறுத்தது.";

    #[test]
    fn baseline_request_passes_through() {
        let out = verify_language(HINDI_TEXT.to_owned(), "en");
        assert_eq!(out, HINDI_TEXT);
    }

    #[test]
    fn matching_tamil_is_accepted() {
        let out = verify_language(TAMIL_TEXT.to_owned(), "ta");
        assert_eq!(out, TAMIL_TEXT);
    }

    #[test]
    fn matching_hindi_is_accepted() {
        let out = verify_language(HINDI_TEXT.to_owned(), "hi");
        assert_eq!(out, HINDI_TEXT);
    }

    #[test]
    fn english_fallback_gains_notice() {
        let out = verify_language(ENGLISH_TEXT.to_owned(), "ta");
        assert!(out.starts_with(APOLOGY_NOTICE));
        assert!(out.ends_with(ENGLISH_TEXT));
    }

    #[test]
    fn undetectable_response_gains_notice() {
        let out = verify_language("12345 67890".to_owned(), "hi");
        assert!(out.starts_with(APOLOGY_NOTICE));
    }

    #[test]
    fn unsupported_detection_counts_as_mismatch() {
        let russian = "Это руководство по уголовному праву и наказаниям за кражу имущества граждан страны.";
        assert_eq!(detect_language(russian), None);
        let out = verify_language(russian.to_owned(), "hi");
        assert!(out.starts_with(APOLOGY_NOTICE));
    }

    #[test]
    fn detection_maps_to_request_codes() {
        assert_eq!(detect_language(ENGLISH_TEXT), Some("en"));
        assert_eq!(detect_language(TAMIL_TEXT), Some("ta"));
        assert_eq!(detect_language(""), None);
    }
}
