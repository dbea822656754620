//! Display formatting helpers
//!
//! Pure functions, no network. Every helper degrades to a fixed sentinel
//! (`NOT_AVAILABLE` or a placeholder path) when its input is absent, so the
//! presentation layer never has to special-case missing data.

use chrono::{Datelike, NaiveDate};

/// Sentinel shown for any absent value
pub const NOT_AVAILABLE: &str = "Non disponible";

/// Sentinel for absent descriptive fields (genres, language, seasons)
pub const NOT_SPECIFIED: &str = "Non spécifié";

/// Image CDN root
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size bucket for posters
pub const POSTER_SIZE: &str = "w500";

/// Size bucket for backdrops
pub const BACKDROP_SIZE: &str = "w1280";

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";
pub const PLACEHOLDER_BACKDROP: &str = "/placeholder-backdrop.jpg";

const FR_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// U+202F, the fr-FR digit group separator
const GROUP_SEPARATOR: char = '\u{202f}';

/// U+00A0, between amount and currency symbol
const NBSP: char = '\u{a0}';

// =============================================================================
// Images
// =============================================================================

/// Poster URL: `{host}/{size}{path}`, or the placeholder when `path` is absent
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", IMAGE_BASE_URL, size, p),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Backdrop URL, with its own placeholder
pub fn backdrop_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", IMAGE_BASE_URL, size, p),
        _ => PLACEHOLDER_BACKDROP.to_string(),
    }
}

// =============================================================================
// Numbers & Dates
// =============================================================================

/// Format a USD amount the fr-FR way: `1 234 567,00 $US`.
///
/// Zero counts as absent.
pub fn format_currency(amount: Option<u64>) -> String {
    match amount {
        Some(n) if n > 0 => format!("{},00{}$US", group_digits(n), NBSP),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Minutes to `"{h}h {m}min"`; zero counts as absent
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {}min", m / 60, m % 60),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `"2022-03-01"` to `"1 mars 2022"`.
///
/// Empty or unparseable input yields the sentinel.
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = date.filter(|d| !d.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    match NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d") {
        Ok(d) => format!(
            "{} {} {}",
            d.day(),
            FR_MONTHS[d.month0() as usize],
            d.year()
        ),
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

/// `"⭐ 7.8/10"`, or `"⭐ N/A/10"` for an absent or zero rating
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r > 0.0 => format!("⭐ {:.1}/10", r),
        _ => "⭐ N/A/10".to_string(),
    }
}

// =============================================================================
// Detail Page Labels
// =============================================================================

/// Cut `text` to `max` characters and append `...` when it was longer
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Per-episode runtime label for series
pub fn format_episode_runtime(episode_run_time: &[u32]) -> Option<String> {
    episode_run_time
        .first()
        .map(|m| format!("~{}min/épisode", m))
}

/// `"1 saison"`, `"3 saisons"`
pub fn format_seasons(count: Option<u32>) -> String {
    match count {
        Some(1) => "1 saison".to_string(),
        Some(n) if n > 0 => format!("{} saisons", n),
        _ => NOT_SPECIFIED.to_string(),
    }
}

pub fn format_episodes(count: Option<u32>) -> String {
    match count {
        Some(n) if n > 0 => format!("{} épisodes", n),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// French name for an ISO 639-1 code, falling back to the upper-cased code
pub fn language_name(code: Option<&str>) -> String {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };

    let name = match code {
        "en" => "Anglais",
        "fr" => "Français",
        "es" => "Espagnol",
        "de" => "Allemand",
        "it" => "Italien",
        "ja" => "Japonais",
        "ko" => "Coréen",
        "zh" => "Chinois",
        other => return other.to_uppercase(),
    };
    name.to_string()
}

/// `"3 résultats trouvés"`, `"1 résultat trouvé"`, `"Aucun résultat trouvé"`
pub fn results_headline(count: usize) -> String {
    match count {
        0 => "Aucun résultat trouvé".to_string(),
        1 => "1 résultat trouvé".to_string(),
        n => format!("{} résultats trouvés", n),
    }
}
