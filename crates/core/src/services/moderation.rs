//! Moderation filter.
//!
//! Pure, stateless classification of outbound message text into a violation
//! verdict. The filter itself never writes; the messaging service composes
//! the verdict with violation records and a suspension.

use lovear_store::entities::ViolationType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Confidence threshold below which phone candidates are discarded.
const PHONE_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Lowered threshold used in strict mode.
const STRICT_PHONE_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Disguised-number candidates additionally need to clear this floor.
const DISGUISED_SURFACE_FLOOR: f64 = 0.4;

/// Confidence assigned to any word-list category hit.
const CATEGORY_HIT_CONFIDENCE: f64 = 0.8;

/// Cumulative score at which the spam verdict triggers.
const SPAM_TRIGGER_SCORE: f64 = 0.6;

/// Minimum run of consecutive number words that counts as a spelled-out
/// phone number.
const SPELLED_MIN_RUN: usize = 7;

/// Lookahead window for the spelled-out scan, in words.
const SPELLED_LOOKAHEAD: usize = 15;

// NANP-style numbers: optional +1 / 1 prefix, optional parenthesized area
// code, separators between the 3-3-4 groups.
static NANP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?1?[\s.-]?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
        .expect("valid NANP pattern")
});

// International numbers: leading + or 00, then 4-14 digits.
static INTERNATIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+|00)\d{4,14}")
        .expect("valid international pattern")
});

// Dashed/dotted 3-3-4 format marker within a NANP candidate.
static TRIAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{3}[.-]\d{3}[.-]\d{4}")
        .expect("valid triad pattern")
});

// Digits separated by symbol runs or "dot"/"dash" words.
static DISGUISED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d(?:(?:[^\w\s]|_)+\d|\s*(?:dot|dash)\s*\d|\d)+")
        .expect("valid disguised pattern")
});

// Runs of repeated terminal punctuation, a spam signal.
static PUNCT_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!?]{2,}").expect("valid punctuation pattern")
});

/// Fixed word lists per category, matched as case-insensitive substrings.
const SEXUAL_WORDS: &[&str] = &["nude", "nudes", "sexting", "onlyfans", "horny", "explicit pics"];

const OFFENSIVE_WORDS: &[&str] = &["idiot", "stupid", "loser", "pathetic", "disgusting", "trash human"];

const HARASSMENT_WORDS: &[&str] = &[
    "kill yourself",
    "kys",
    "i know where you live",
    "watch your back",
    "you can't hide",
    "i'm following you",
];

const SPAM_WORDS: &[&str] = &[
    "buy now",
    "click here",
    "free money",
    "limited offer",
    "promo code",
    "follow me on",
    "cash app",
    "crypto investment",
];

const PERSONAL_INFO_WORDS: &[&str] = &[
    "what's your number",
    "whats your number",
    "give me your number",
    "your home address",
    "social security",
    "bank account number",
    "send me your password",
];

/// Number words recognized by the spelled-out scan. "oh"/"o" stand for zero.
const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "oh", "o",
];

/// Verdict produced by [`ModerationFilter::moderate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationVerdict {
    /// Whether any sub-check triggered.
    pub is_violation: bool,
    /// Deduplicated categories that triggered.
    pub violation_types: Vec<ViolationType>,
    /// Maximum confidence across triggered sub-checks, in [0, 1].
    pub confidence: f64,
    /// Deduplicated flagged content spans.
    pub flagged_spans: Vec<String>,
}

impl ModerationVerdict {
    fn clean() -> Self {
        Self {
            is_violation: false,
            violation_types: Vec::new(),
            confidence: 0.0,
            flagged_spans: Vec::new(),
        }
    }
}

/// A phone-number candidate produced by one detection technique.
#[derive(Debug)]
struct PhoneCandidate {
    span: String,
    confidence: f64,
}

/// Pure text classifier gating the message-send path.
#[derive(Debug, Clone)]
pub struct ModerationFilter {
    strict_mode: bool,
}

impl ModerationFilter {
    /// Create a filter. Strict mode lowers the phone confidence threshold
    /// from 0.6 to 0.3.
    #[must_use]
    pub const fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    /// Classify `text`. Deterministic: identical input yields an identical
    /// verdict.
    #[must_use]
    pub fn moderate(&self, text: &str) -> ModerationVerdict {
        let mut verdict = ModerationVerdict::clean();

        let threshold = if self.strict_mode {
            STRICT_PHONE_CONFIDENCE_THRESHOLD
        } else {
            PHONE_CONFIDENCE_THRESHOLD
        };

        // Phone-number detection: four independent techniques, filtered by
        // the confidence threshold.
        let mut phone_candidates = Vec::new();
        phone_candidates.extend(detect_nanp(text));
        phone_candidates.extend(detect_international(text));
        phone_candidates.extend(detect_spelled_out(text));
        phone_candidates.extend(detect_disguised(text));

        for candidate in phone_candidates {
            if candidate.confidence >= threshold {
                record(
                    &mut verdict,
                    ViolationType::PhoneNumber,
                    candidate.confidence,
                    candidate.span,
                );
            }
        }

        // Word-list categories.
        let lowered = text.to_lowercase();
        for (words, violation_type) in [
            (SEXUAL_WORDS, ViolationType::Inappropriate),
            (OFFENSIVE_WORDS, ViolationType::Inappropriate),
            (HARASSMENT_WORDS, ViolationType::Harassment),
            (PERSONAL_INFO_WORDS, ViolationType::PersonalInfo),
        ] {
            for word in words {
                if lowered.contains(word) {
                    record(
                        &mut verdict,
                        violation_type,
                        CATEGORY_HIT_CONFIDENCE,
                        (*word).to_string(),
                    );
                }
            }
        }

        // Spam scoring.
        let (spam_score, spam_spans) = spam_score(text, &lowered);
        if spam_score >= SPAM_TRIGGER_SCORE {
            for span in spam_spans {
                record(&mut verdict, ViolationType::Spam, spam_score.min(1.0), span);
            }
        }

        verdict.violation_types.sort();
        verdict.violation_types.dedup();
        verdict
    }
}

/// Fold one triggered sub-check into the verdict.
fn record(
    verdict: &mut ModerationVerdict,
    violation_type: ViolationType,
    confidence: f64,
    span: String,
) {
    verdict.is_violation = true;
    verdict.violation_types.push(violation_type);
    if verdict.confidence < confidence {
        verdict.confidence = confidence;
    }
    if !verdict.flagged_spans.contains(&span) {
        verdict.flagged_spans.push(span);
    }
}

/// Standard NANP-style numeric patterns.
///
/// Base confidence 0.5, boosted by digit-count exactness (+0.3 for exactly
/// 10 digits, or 11 with a leading 1), a parenthesized area code (+0.2), a
/// dashed/dotted 3-3-4 layout (+0.2) and a leading plus (+0.1), capped at
/// 1.0.
fn detect_nanp(text: &str) -> Vec<PhoneCandidate> {
    NANP_RE
        .find_iter(text)
        .map(|m| {
            let span = m.as_str();
            let digits: Vec<char> = span.chars().filter(char::is_ascii_digit).collect();

            let mut confidence: f64 = 0.5;
            let exact_ten = digits.len() == 10;
            let exact_eleven = digits.len() == 11 && digits.first() == Some(&'1');
            if exact_ten || exact_eleven {
                confidence += 0.3;
            }
            if span.contains('(') && span.contains(')') {
                confidence += 0.2;
            }
            if TRIAD_RE.is_match(span) {
                confidence += 0.2;
            }
            if span.trim_start().starts_with('+') {
                confidence += 0.1;
            }

            PhoneCandidate {
                span: span.to_string(),
                confidence: confidence.min(1.0),
            }
        })
        .collect()
}

/// International numeric patterns: a leading `+` or `00` and 4-14 digits.
fn detect_international(text: &str) -> Vec<PhoneCandidate> {
    INTERNATIONAL_RE
        .find_iter(text)
        .map(|m| {
            let span = m.as_str();
            let digit_count = span.chars().filter(char::is_ascii_digit).count();
            let confidence: f64 = if digit_count >= 10 { 0.8 } else { 0.6 };
            PhoneCandidate {
                span: span.to_string(),
                confidence,
            }
        })
        .collect()
}

/// Spelled-out digit words: a run of at least seven consecutive number
/// words within a fifteen-word lookahead, confidence `min(0.9, run / 10)`.
fn detect_spelled_out(text: &str) -> Vec<PhoneCandidate> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    let mut candidates = Vec::new();
    let mut i = 0;
    while i < words.len() {
        if is_number_word(words[i]) {
            let window_end = (i + SPELLED_LOOKAHEAD).min(words.len());
            let mut run_end = i;
            while run_end < window_end && is_number_word(words[run_end]) {
                run_end += 1;
            }
            let run = run_end - i;
            if run >= SPELLED_MIN_RUN {
                candidates.push(PhoneCandidate {
                    span: words[i..run_end].join(" "),
                    confidence: (run as f64 / 10.0).min(0.9),
                });
            }
            i = run_end;
        } else {
            i += 1;
        }
    }
    candidates
}

fn is_number_word(word: &str) -> bool {
    let lowered = word.to_lowercase();
    NUMBER_WORDS.contains(&lowered.as_str())
}

/// Disguised numbers: digits split by symbol runs or "dot"/"dash" words.
///
/// Base 0.3, +0.3 with at least 7 digit characters, a further +0.2 at 10,
/// +0.2 when separator symbols are present; only surfaced above 0.4.
fn detect_disguised(text: &str) -> Vec<PhoneCandidate> {
    DISGUISED_RE
        .find_iter(text)
        .filter_map(|m| {
            let span = m.as_str();
            let digit_count = span.chars().filter(char::is_ascii_digit).count();
            let has_separators = span
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
                || span.to_lowercase().contains("dot")
                || span.to_lowercase().contains("dash");

            let mut confidence: f64 = 0.3;
            if digit_count >= 7 {
                confidence += 0.3;
            }
            if digit_count >= 10 {
                confidence += 0.2;
            }
            if has_separators {
                confidence += 0.2;
            }

            (confidence > DISGUISED_SURFACE_FLOOR).then(|| PhoneCandidate {
                span: span.to_string(),
                confidence: confidence.min(1.0),
            })
        })
        .collect()
}

/// Cumulative spam score and the spans that contributed to it.
///
/// Every keyword occurrence is worth 0.2; an uppercase character ratio above
/// one half adds 0.3; any `!!`/`??` run adds 0.2; any word repeated more than
/// three times (case-insensitively) adds 0.2.
fn spam_score(text: &str, lowered: &str) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut spans = Vec::new();

    for word in SPAM_WORDS {
        // Every occurrence accrues, not just the first.
        let hits = lowered.matches(word).count();
        if hits > 0 {
            score += 0.2 * hits as f64;
            spans.push((*word).to_string());
        }
    }

    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if !letters.is_empty() {
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        if upper * 2 > letters.len() {
            score += 0.3;
        }
    }

    if PUNCT_RUN_RE.is_match(text) {
        score += 0.2;
    }

    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for word in lowered.split_whitespace() {
        let cleaned: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if !cleaned.is_empty() {
            *counts.entry(cleaned).or_insert(0) += 1;
        }
    }
    let mut repeated: Vec<&String> = counts
        .iter()
        .filter(|&(_, &n)| n > 3)
        .map(|(word, _)| word)
        .collect();
    repeated.sort();
    if let Some(word) = repeated.first() {
        score += 0.2;
        spans.push((*word).clone());
    }

    if score >= SPAM_TRIGGER_SCORE && spans.is_empty() {
        // Triggered on shape alone (caps + punctuation); flag the text.
        spans.push(text.trim().to_string());
    }

    (score, spans)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filter() -> ModerationFilter {
        ModerationFilter::new(false)
    }

    #[test]
    fn test_dashed_phone_number_is_flagged() {
        let verdict = filter().moderate("call me at 555-123-4567");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PhoneNumber));
        // 0.5 base + 0.3 exact digits + 0.2 dashed triads, capped.
        assert!(verdict.confidence >= 0.99);
    }

    #[test]
    fn test_parenthesized_phone_number_is_flagged() {
        let verdict = filter().moderate("reach me: (555) 123 4567");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PhoneNumber));
    }

    #[test]
    fn test_international_number_is_flagged() {
        let verdict = filter().moderate("whatsapp +4915123456789 anytime");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PhoneNumber));
    }

    #[test]
    fn test_spelled_out_number_is_flagged() {
        let verdict =
            filter().moderate("my number is five five five one two three four five six seven");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PhoneNumber));
        assert!(verdict.confidence >= 0.7);
    }

    #[test]
    fn test_spelled_out_run_of_seven_with_oh() {
        let verdict = filter().moderate("oh five five five one two three");
        assert!(verdict.is_violation);
        assert!(verdict.confidence >= 0.7);
    }

    #[test]
    fn test_short_spelled_run_is_clean() {
        let verdict = filter().moderate("one two three easy steps");
        assert!(!verdict.is_violation);
    }

    #[test]
    fn test_isolated_short_numeric_token_is_clean() {
        let verdict = filter().moderate("I'll see you at 7");
        assert!(!verdict.is_violation);
        assert!(verdict.violation_types.is_empty());
    }

    #[test]
    fn test_plain_chat_is_clean() {
        let verdict = filter().moderate("Fancy a coffee on Saturday afternoon?");
        assert!(!verdict.is_violation);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.flagged_spans.is_empty());
    }

    #[test]
    fn test_disguised_number_with_separators() {
        let verdict = filter().moderate("5*5*5*1*2*3*4*5*6*7 if you want to talk");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PhoneNumber));
    }

    #[test]
    fn test_strict_mode_lowers_threshold() {
        // Six digits with separators: 0.3 base + 0.2 separators = 0.5.
        // Below the normal 0.6 threshold, above the strict 0.3.
        let text = "code 5-5-5-1-2-3";
        assert!(!ModerationFilter::new(false).moderate(text).is_violation);
        assert!(ModerationFilter::new(true).moderate(text).is_violation);
    }

    #[test]
    fn test_spam_message_triggers() {
        let verdict = filter().moderate("BUY NOW!!! BUY NOW!!! BUY NOW!!! BUY NOW!!!");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::Spam));
    }

    #[test]
    fn test_repeated_spam_keyword_accrues_per_occurrence() {
        // One "buy now" is 0.2 and stays clean; three reach the 0.6 trigger
        // with no help from caps or punctuation.
        assert!(!filter().moderate("buy now").is_violation);

        let verdict = filter().moderate("buy now buy now buy now");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::Spam));
    }

    #[test]
    fn test_harassment_word_list() {
        let verdict = filter().moderate("you can't hide, I know where you live");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::Harassment));
        assert!((verdict.confidence - CATEGORY_HIT_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_personal_info_request() {
        let verdict = filter().moderate("hey whats your number?");
        assert!(verdict.is_violation);
        assert!(verdict.violation_types.contains(&ViolationType::PersonalInfo));
    }

    #[test]
    fn test_types_and_spans_are_deduplicated() {
        let verdict = filter().moderate("555-123-4567 or 555-123-4567 nude nudes");
        let phone_count = verdict
            .violation_types
            .iter()
            .filter(|t| **t == ViolationType::PhoneNumber)
            .count();
        assert_eq!(phone_count, 1);
        let span_count = verdict
            .flagged_spans
            .iter()
            .filter(|s| s.as_str() == "555-123-4567")
            .count();
        assert_eq!(span_count, 1);
    }

    #[test]
    fn test_moderation_is_pure() {
        let f = filter();
        let text = "call 555-123-4567 NOW!!! NOW!!! NOW!!! NOW!!! free money";
        let first = f.moderate(text);
        let second = f.moderate(text);
        assert_eq!(first, second);
    }
}
