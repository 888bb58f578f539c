//! Label matching for typeahead filtering.
//!
//! The default filter is a case-insensitive substring match that folds
//! common Latin diacritics, so typing `estefania` finds `Estefanía`.

/// Returns `true` if `label` contains `term`, ignoring case and common
/// Latin diacritics. An empty term matches everything.
pub fn default_match(label: &str, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    fold(label).contains(&fold(term))
}

/// Lowercases and strips diacritics from `text`.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}
