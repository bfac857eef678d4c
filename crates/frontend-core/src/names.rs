//! Identifier normalization and display helpers

/// Letters folded to their closest ASCII equivalent before the
/// `[a-z0-9_]` filter runs. Both cases are listed so folding does not
/// depend on how `to_lowercase` treats dotted/dotless `i`.
const FOLDING_TABLE: &[(char, char)] = &[
    ('ç', 'c'),
    ('Ç', 'c'),
    ('ğ', 'g'),
    ('Ğ', 'g'),
    ('ı', 'i'),
    ('İ', 'i'),
    ('ö', 'o'),
    ('Ö', 'o'),
    ('ş', 's'),
    ('Ş', 's'),
    ('ü', 'u'),
    ('Ü', 'u'),
];

fn fold(c: char) -> Option<char> {
    FOLDING_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Normalize a user-supplied identifier into a lowercase, ASCII,
/// underscore-delimited token usable as a file and route name.
///
/// Total over any input; callers reject empty input beforehand.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if let Some(folded) = fold(c) {
            out.push(folded);
            continue;
        }
        for lower in c.to_lowercase() {
            match lower {
                'a'..='z' | '0'..='9' | '_' => out.push(lower),
                other => out.push(fold(other).unwrap_or('_')),
            }
        }
    }
    out
}

/// Uppercase the first character and lowercase the rest ("about_us" -> "About_us")
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split a CamelCase identifier into words ("MyApp" -> "My App", "HTMLPage" -> "HTML Page")
pub fn split_camel_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// Stimulus identifier for a controller file stem ("date_picker" -> "date-picker")
pub fn stimulus_identifier(name: &str) -> String {
    name.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_turkish_letters() {
        assert_eq!(normalize("Ürünler"), "urunler");
        assert_eq!(normalize("Çiçek Şığ"), "cicek_sig");
        assert_eq!(normalize("İletişim"), "iletisim");
    }

    #[test]
    fn test_normalize_replaces_other_characters() {
        assert_eq!(normalize("About Us!"), "about_us_");
        assert_eq!(normalize("my-page"), "my_page");
        assert_eq!(normalize("café"), "caf_");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Ürünler", "About Us", "x-Y_z 9", "", "İİ", "日本"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_output_alphabet() {
        let all: String = FOLDING_TABLE.iter().map(|(from, _)| *from).collect();
        let normalized = normalize(&all);
        assert!(normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        assert_eq!(normalized, "ccggiioossuu");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("about"), "About");
        assert_eq!(capitalize("about_US"), "About_us");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("MyApp"), "My App");
        assert_eq!(split_camel_case("Blog"), "Blog");
        assert_eq!(split_camel_case("HTMLPage"), "HTML Page");
        assert_eq!(split_camel_case("Shop2Go"), "Shop2 Go");
    }

    #[test]
    fn test_stimulus_identifier() {
        assert_eq!(stimulus_identifier("date_picker"), "date-picker");
    }
}
