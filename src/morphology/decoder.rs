//! Positional morphology code decoding.
//!
//! Corpus morphology codes are 8 characters wide, one position per dimension:
//!
//! | Pos | Dimension | Values |
//! |-----|-----------|--------|
//! | 0 | person | `1 2 3` |
//! | 1 | tense | `P I F A X Y` |
//! | 2 | voice | `A M P` |
//! | 3 | mood | `I S O M N P D` |
//! | 4 | case | `N G D A V` |
//! | 5 | number | `S P` |
//! | 6 | gender | `M F N` |
//! | 7 | degree | ignored |
//!
//! `-` marks a position that does not apply. A verb looks like `3IAI-S--`
//! (3rd person imperfect active indicative singular), a noun like `----NSF-`.
//!
//! # Examples
//!
//! ```
//! use lexicon::morphology::{decode, Tense};
//!
//! let features = decode("V-", "3IAI-S--");
//! assert_eq!(features.pos, "Verb");
//! assert_eq!(features.tense, Some(Tense::Imperfect));
//! ```

use super::features::{Case, FeatureSet, Gender, Mood, Number, Person, Tense, Voice};

/// Minimum code width that carries every decoded dimension.
pub const MORPH_CODE_MIN_WIDTH: usize = 7;

/// Maps a corpus part-of-speech tag to a readable label.
///
/// Unknown tags pass through unchanged.
pub fn pos_label(pos_tag: &str) -> String {
    let label = match pos_tag {
        "N-" => "Noun",
        "A-" => "Adjective",
        "V-" => "Verb",
        "P-" => "Preposition",
        "C-" => "Conjunction",
        "D-" => "Adverb",
        "RA" => "Article (definite)",
        "RD" => "Demonstrative pronoun",
        "RI" => "Interrogative pronoun",
        "RP" => "Personal pronoun",
        "RR" => "Relative pronoun",
        "I-" => "Interjection",
        "X-" => "Particle",
        other => other,
    };
    label.to_string()
}

/// Decodes a part-of-speech tag and positional morphology code.
///
/// Total and deterministic: unknown characters and short codes simply
/// produce fewer features.
pub fn decode(pos_tag: &str, morph_code: &str) -> FeatureSet {
    let mut features = FeatureSet {
        pos_code: pos_tag.to_string(),
        pos: pos_label(pos_tag),
        ..FeatureSet::default()
    };

    let mut code = [' '; MORPH_CODE_MIN_WIDTH];
    let mut width = 0;
    for (slot, c) in code.iter_mut().zip(morph_code.chars()) {
        *slot = c;
        width += 1;
    }
    if width < MORPH_CODE_MIN_WIDTH {
        return features;
    }

    features.person = Person::from_code(code[0]);
    features.tense = Tense::from_code(code[1]);
    features.voice = Voice::from_code(code[2]);
    features.mood = Mood::from_code(code[3]);
    features.case = Case::from_code(code[4]);
    features.number = Number::from_code(code[5]);
    features.gender = Gender::from_code(code[6]);
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Dimension;

    #[test]
    fn test_decode_finite_verb() {
        let f = decode("V-", "3IAI-S--");
        assert_eq!(f.pos_code, "V-");
        assert_eq!(f.pos, "Verb");
        assert_eq!(f.person, Some(Person::Third));
        assert_eq!(f.tense, Some(Tense::Imperfect));
        assert_eq!(f.voice, Some(Voice::Active));
        assert_eq!(f.mood, Some(Mood::Indicative));
        assert_eq!(f.case, None);
        assert_eq!(f.number, Some(Number::Singular));
        assert_eq!(f.gender, None);
    }

    #[test]
    fn test_decode_participle() {
        let f = decode("V-", "-PAPNSM-");
        assert_eq!(f.person, None);
        assert_eq!(f.tense, Some(Tense::Present));
        assert_eq!(f.mood, Some(Mood::Participle));
        assert_eq!(f.case, Some(Case::Nominative));
        assert_eq!(f.gender, Some(Gender::Masculine));
    }

    #[test]
    fn test_decode_noun_has_no_verbal_features() {
        let f = decode("N-", "----NSF-");
        assert_eq!(f.pos, "Noun");
        let dims: Vec<Dimension> = f.features().map(|(d, _)| d).collect();
        assert_eq!(dims, vec![Dimension::Case, Dimension::Number, Dimension::Gender]);
    }

    #[test]
    fn test_alternate_imperative_marker() {
        assert_eq!(decode("V-", "2AAD-P--").mood, Some(Mood::Imperative));
        assert_eq!(decode("V-", "2AAM-P--").mood, Some(Mood::Imperative));
    }

    #[test]
    fn test_unknown_characters_and_tags_are_tolerated() {
        let f = decode("ZZ", "9QQQQQQQ");
        assert_eq!(f.pos, "ZZ");
        assert!(f.is_empty());
    }

    #[test]
    fn test_short_and_empty_codes() {
        assert!(decode("V-", "3IA").is_empty());
        assert!(decode("V-", "").is_empty());
        // The degree position is optional.
        assert_eq!(decode("A-", "----NSM").case, Some(Case::Nominative));
    }

    #[test]
    fn test_multibyte_code_does_not_panic() {
        let f = decode("V-", "ἀἀἀἀἀἀἀἀ");
        assert!(f.is_empty());
    }

    #[test]
    fn test_display() {
        let f = decode("V-", "3AAI-S--");
        assert_eq!(
            f.to_string(),
            "tense: Aorist, voice: Active, mood: Indicative, number: Singular, person: 3rd"
        );
    }
}
