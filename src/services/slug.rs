use std::future::Future;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppResult;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9_\s-]").expect("NON_SLUG_CHARS is a valid regex pattern")
});

static SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s_-]+").expect("SEPARATORS is a valid regex pattern")
});

/// Records whose URL slug is derived from their title.
pub trait Slugged {
    fn title(&self) -> &str;
    fn set_slug(&mut self, slug: String);
}

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
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
        'ы' => "y",
        'э' => "e",
        'ю' => "ju",
        'я' => "ja",
        'є' => "e",
        'і' => "i",
        'ї' => "i",
        _ => return None,
    };
    Some(latin)
}

/// URL-safe form of a title: Cyrillic transliterated, lowercase ASCII,
/// words joined by `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut latin = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match transliterate(c) {
            Some(replacement) => latin.push_str(replacement),
            None => latin.push(c),
        }
    }

    let cleaned = NON_SLUG_CHARS.replace_all(&latin, " ");
    let joined = SEPARATORS.replace_all(cleaned.trim(), "-");
    joined.trim_matches('-').to_string()
}

/// Slug used when the plain one is already taken: the title plus the
/// current time.
pub fn fallback_slug(title: &str) -> String {
    slugify(&format!("{} {}", title, Utc::now().format("%Y-%m-%d %H:%M:%S%.6f")))
}

/// Inserts `item` with the slug of its title; if the store reports a
/// duplicate key, retries once with a timestamped slug.
pub async fn save_with_unique_slug<T, F, Fut>(mut item: T, insert: F) -> AppResult<T>
where
    T: Slugged + Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let slug = slugify(item.title());
    item.set_slug(slug.clone());

    match insert(item.clone()).await {
        Err(err) if err.is_duplicate_key() => {
            let replacement = fallback_slug(item.title());
            log::info!("Non-unique slug {} replaced with {}", slug, replacement);
            item.set_slug(replacement);
            insert(item).await
        }
        other => other,
    }
}
