//! Slug derivation and validation.
//!
//! # Responsibility
//! - Derive URL-safe slugs from free-form (Latin or Cyrillic) titles.
//! - Validate caller-supplied slugs.
//!
//! # Invariants
//! - `slugify` is deterministic and only emits `[a-z0-9_-]`.
//! - Cyrillic letters are transliterated, never dropped (except hard/soft signs).

use crate::model::note::SLUG_MAX_LENGTH;
use once_cell::sync::Lazy;
use regex::Regex;

static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Converts `value` into a slug.
///
/// Rules, applied in order:
/// 1. lowercase;
/// 2. `&amp;` and `&` become ` and `;
/// 3. runs of hyphens/whitespace collapse into one `-`;
/// 4. characters outside ASCII letters, digits, `-` and the transliteration
///    alphabet are dropped;
/// 5. Cyrillic letters are transliterated and typographic dashes become `-`.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let with_and = AMPERSAND_RE.replace_all(&lowered, " and ");
    let hyphenated = SEPARATOR_RE.replace_all(&with_and, "-");

    let mut slug = String::with_capacity(hyphenated.len());
    for ch in hyphenated.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        } else if let Some(latin) = transliterate(ch) {
            slug.push_str(latin);
        }
    }
    slug
}

/// Slugifies `title` and truncates it to the storage limit.
pub fn derive_slug(title: &str) -> String {
    slugify(title).chars().take(SLUG_MAX_LENGTH).collect()
}

/// Returns whether `value` consists only of letters, digits, `-` and `_`.
pub fn is_valid_slug(value: &str) -> bool {
    SLUG_RE.is_match(value)
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        '–' | '—' | '‒' | '−' => "-",
        _ => return None,
    };
    Some(latin)
}

#[cfg(test)]
mod tests {
    use super::{derive_slug, is_valid_slug, slugify};

    #[test]
    fn slugify_transliterates_cyrillic_titles() {
        assert_eq!(slugify("Тестовый заголовок"), "testovyij-zagolovok");
        assert_eq!(slugify("Заголовок"), "zagolovok");
        assert_eq!(slugify("Щука и ёжик"), "schuka-i-yozhik");
        assert_eq!(slugify("Ёлка"), "yolka");
    }

    #[test]
    fn slugify_collapses_separators_and_drops_punctuation() {
        assert_eq!(slugify("Hello,  World!"), "hello-world");
        assert_eq!(slugify("a - b -- c"), "a-b-c");
        assert_eq!(slugify("Tom & Jerry"), "tom-and-jerry");
    }

    #[test]
    fn slugify_turns_typographic_dashes_into_hyphens() {
        assert_eq!(slugify("a–b"), "a-b");
        assert_eq!(slugify("Мир—труд"), "mir-trud");
        assert_eq!(slugify("a – b"), "a---b");
    }

    #[test]
    fn slugify_drops_hard_and_soft_signs() {
        assert_eq!(slugify("Объявление"), "obyavlenie");
        assert_eq!(slugify("Соль"), "sol");
    }

    #[test]
    fn derive_slug_truncates_to_limit() {
        let title = "я".repeat(80);
        let slug = derive_slug(&title);
        assert_eq!(slug.chars().count(), 100);
        assert!(slug.starts_with("yaya"));
    }

    #[test]
    fn slug_validation_accepts_url_safe_values_only() {
        assert!(is_valid_slug("note-1"));
        assert!(is_valid_slug("Note_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug("a/b"));
    }
}
