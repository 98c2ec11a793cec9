//! Grammatical feature values and the dimensions they belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a feature enum together with its positional code letters and display names.
macro_rules! feature_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $($code:literal)|+ => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Decodes a single code character; unknown characters yield `None`.
            pub fn from_code(code: char) -> Option<Self> {
                match code {
                    $($($code)|+ => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable name used as the distribution key.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

feature_enum!(
    /// Grammatical person (verbs).
    Person {
        First = '1' => "1st",
        Second = '2' => "2nd",
        Third = '3' => "3rd",
    }
);

feature_enum!(
    /// Verbal tense.
    Tense {
        Present = 'P' => "Present",
        Imperfect = 'I' => "Imperfect",
        Future = 'F' => "Future",
        Aorist = 'A' => "Aorist",
        Perfect = 'X' => "Perfect",
        Pluperfect = 'Y' => "Pluperfect",
    }
);

feature_enum!(
    /// Verbal voice.
    Voice {
        Active = 'A' => "Active",
        Middle = 'M' => "Middle",
        Passive = 'P' => "Passive",
    }
);

feature_enum!(
    /// Verbal mood. `D` is an alternate imperative marker in the corpus.
    Mood {
        Indicative = 'I' => "Indicative",
        Subjunctive = 'S' => "Subjunctive",
        Optative = 'O' => "Optative",
        Imperative = 'M' | 'D' => "Imperative",
        Infinitive = 'N' => "Infinitive",
        Participle = 'P' => "Participle",
    }
);

feature_enum!(
    /// Nominal case.
    Case {
        Nominative = 'N' => "Nominative",
        Genitive = 'G' => "Genitive",
        Dative = 'D' => "Dative",
        Accusative = 'A' => "Accusative",
        Vocative = 'V' => "Vocative",
    }
);

feature_enum!(
    /// Grammatical number.
    Number {
        Singular = 'S' => "Singular",
        Plural = 'P' => "Plural",
    }
);

feature_enum!(
    /// Grammatical gender.
    Gender {
        Masculine = 'M' => "Masculine",
        Feminine = 'F' => "Feminine",
        Neuter = 'N' => "Neuter",
    }
);

/// One grammatical dimension tracked by the corpus statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Tense,
    Voice,
    Mood,
    Case,
    Number,
    Gender,
    Person,
}

impl Dimension {
    /// All dimensions in reporting order.
    pub const ALL: [Dimension; 7] = [
        Dimension::Tense,
        Dimension::Voice,
        Dimension::Mood,
        Dimension::Case,
        Dimension::Number,
        Dimension::Gender,
        Dimension::Person,
    ];

    /// Singular lowercase name ("tense", "case", ...).
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Tense => "tense",
            Dimension::Voice => "voice",
            Dimension::Mood => "mood",
            Dimension::Case => "case",
            Dimension::Number => "number",
            Dimension::Gender => "gender",
            Dimension::Person => "person",
        }
    }
}

/// Decoded features of a single word occurrence.
///
/// A `None` dimension means the code carried a placeholder or an unknown
/// character at that position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Raw part-of-speech tag as found in the corpus
    pub pos_code: String,
    /// Human-readable part-of-speech label
    pub pos: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<Tense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl FeatureSet {
    /// Returns the display name of the value decoded for `dimension`, if any.
    pub fn get(&self, dimension: Dimension) -> Option<&'static str> {
        match dimension {
            Dimension::Tense => self.tense.map(|v| v.name()),
            Dimension::Voice => self.voice.map(|v| v.name()),
            Dimension::Mood => self.mood.map(|v| v.name()),
            Dimension::Case => self.case.map(|v| v.name()),
            Dimension::Number => self.number.map(|v| v.name()),
            Dimension::Gender => self.gender.map(|v| v.name()),
            Dimension::Person => self.person.map(|v| v.name()),
        }
    }

    /// Iterates over every decoded `(dimension, value)` pair.
    pub fn features(&self) -> impl Iterator<Item = (Dimension, &'static str)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(move |dim| self.get(dim).map(|value| (dim, value)))
    }

    /// True if no grammatical dimension was decoded.
    pub fn is_empty(&self) -> bool {
        self.features().next().is_none()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .features()
            .map(|(dim, value)| format!("{}: {}", dim.name(), value))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
