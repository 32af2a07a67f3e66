//! Type-line parsing: splits a card's printed type line into supertypes,
//! types, and subtypes. Grounded in `the-muppet-mtgjson`'s
//! `set_builder::parse_card_types`, adapted to return owned `Vec<String>`s
//! instead of borrowing into a pyo3-backed card struct.

use std::sync::OnceLock;

fn super_types() -> &'static [&'static str] {
    &["Basic", "Legendary", "Ongoing", "Snow", "World"]
}

/// Sub-types whose name itself contains a space and must not be split on
/// whitespace like every other subtype; ground truth lives in the card
/// pool itself — "Aura Curse", "Equipment Vehicle".
fn multi_word_sub_types() -> &'static [&'static str] {
    &["Aura Curse", "Equipment Vehicle"]
}

fn placeholder() -> char {
    static C: OnceLock<char> = OnceLock::new();
    *C.get_or_init(|| '\u{0}')
}

/// Parse a full type line (`"Legendary Creature — Human Wizard"`) into
/// `(supertypes, types, subtypes)`.
///
/// Planes are a special case: the entire subtype clause is a single planar
/// type name and must not be split on whitespace (`"Plane — Shandalar"` has
/// exactly one subtype, `"Shandalar"`).
pub fn parse_card_types(type_line: &str) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut supertypes = Vec::new();
    let mut types = Vec::new();
    let mut subtypes = Vec::new();

    let (types_part, subtypes_part) = match type_line.split_once('—') {
        Some((a, b)) => (a, Some(b)),
        None => (type_line, None),
    };

    if let Some(raw_subtypes) = subtypes_part {
        if type_line.starts_with("Plane") {
            subtypes.push(raw_subtypes.trim().to_string());
        } else {
            let placeholder = placeholder();
            let mut working = raw_subtypes.to_string();
            for special in multi_word_sub_types() {
                if working.contains(special) {
                    let glued = special.replace(' ', &placeholder.to_string());
                    working = working.replace(special, &glued);
                }
            }
            subtypes = working
                .split_whitespace()
                .filter(|s| !s.is_empty())
                .map(|s| s.replace(placeholder, " "))
                .collect();
        }
    }

    for word in types_part.split_whitespace() {
        if super_types().contains(&word) {
            supertypes.push(word.to_string());
        } else if !word.is_empty() {
            types.push(word.to_string());
        }
    }

    (supertypes, types, subtypes)
}

/// ASCII-fold a card name (Æ→Ae and similar).
/// Applies the small set of accented/ligature Latin substitutions actually
/// seen in card names; anything outside that set passes through unchanged
/// rather than attempting a general Unicode transliteration.
pub fn ascii_fold(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'Æ' => "Ae".to_string(),
            'æ' => "ae".to_string(),
            'Á' | 'À' | 'Â' | 'Ä' | 'Ā' => "A".to_string(),
            'á' | 'à' | 'â' | 'ä' | 'ā' => "a".to_string(),
            'É' | 'È' | 'Ê' | 'Ë' => "E".to_string(),
            'é' | 'è' | 'ê' | 'ë' => "e".to_string(),
            'Í' | 'Ì' | 'Î' | 'Ï' => "I".to_string(),
            'í' | 'ì' | 'î' | 'ï' => "i".to_string(),
            'Ó' | 'Ò' | 'Ô' | 'Ö' => "O".to_string(),
            'ó' | 'ò' | 'ô' | 'ö' => "o".to_string(),
            'Ú' | 'Ù' | 'Û' | 'Ü' => "U".to_string(),
            'ú' | 'ù' | 'û' | 'ü' => "u".to_string(),
            'Ñ' => "N".to_string(),
            'ñ' => "n".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// Ordinal remap for finish sorting:
/// `nonfoil < foil < etched`, never alphabetic.
pub fn finish_ordinal(finish: &str) -> u8 {
    match finish {
        "nonfoil" => 0,
        "foil" => 1,
        "etched" => 2,
        _ => 3,
    }
}

pub fn sort_finishes(mut finishes: Vec<String>) -> Vec<String> {
    finishes.sort_by_key(|f| finish_ordinal(f));
    finishes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_creature() {
        let (s, t, sub) = parse_card_types("Creature — Human Wizard");
        assert!(s.is_empty());
        assert_eq!(t, vec!["Creature"]);
        assert_eq!(sub, vec!["Human", "Wizard"]);
    }

    #[test]
    fn legendary_creature() {
        let (s, t, sub) = parse_card_types("Legendary Creature — Human Wizard");
        assert_eq!(s, vec!["Legendary"]);
        assert_eq!(t, vec!["Creature"]);
        assert_eq!(sub, vec!["Human", "Wizard"]);
    }

    #[test]
    fn no_subtypes() {
        let (s, t, sub) = parse_card_types("Instant");
        assert!(s.is_empty());
        assert_eq!(t, vec!["Instant"]);
        assert!(sub.is_empty());
    }

    #[test]
    fn plane_subtype_is_not_split() {
        let (_, _, sub) = parse_card_types("Plane — Shandalar");
        assert_eq!(sub, vec!["Shandalar"]);
    }

    #[test]
    fn multi_word_subtype_survives() {
        let (_, _, sub) = parse_card_types("Artifact — Equipment Vehicle");
        assert_eq!(sub, vec!["Equipment Vehicle"]);
    }

    #[test]
    fn ascii_fold_aelig() {
        assert_eq!(ascii_fold("Æther Vial"), "Aether Vial");
    }

    #[test]
    fn finish_sort_is_ordinal_not_alphabetic() {
        let finishes = vec!["foil".to_string(), "etched".to_string(), "nonfoil".to_string()];
        assert_eq!(sort_finishes(finishes), vec!["nonfoil", "foil", "etched"]);
    }
}
