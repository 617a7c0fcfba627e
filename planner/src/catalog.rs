//! Static catalog: subjects, study days and fallback topics
//!
//! Labels are Portuguese because they are user-facing and persisted as-is.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the five ENEM subject areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Linguagens")]
    Languages,
    #[serde(rename = "Ciências Humanas")]
    Humanities,
    #[serde(rename = "Ciências da Natureza")]
    NaturalSciences,
    #[serde(rename = "Matemática")]
    Mathematics,
    #[serde(rename = "Redação")]
    Essay,
}

impl Subject {
    /// All subjects, in display order
    pub const ALL: [Subject; 5] = [
        Subject::Languages,
        Subject::Humanities,
        Subject::NaturalSciences,
        Subject::Mathematics,
        Subject::Essay,
    ];

    /// Display and storage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Languages => "Linguagens",
            Self::Humanities => "Ciências Humanas",
            Self::NaturalSciences => "Ciências da Natureza",
            Self::Mathematics => "Matemática",
            Self::Essay => "Redação",
        }
    }

    /// Look up a subject by name, ignoring case and accents
    ///
    /// Also accepts the 1-based position in [`Subject::ALL`].
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = fold(name);
        if let Ok(index) = wanted.parse::<usize>() {
            return index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        Self::ALL.into_iter().find(|s| fold(s.name()) == wanted)
    }

    /// Topics used when the generative service is unavailable
    pub fn fallback_topics(&self) -> &'static [&'static str] {
        match self {
            Self::Languages => &["Interpretação de Textos", "Gêneros Textuais", "Literatura Brasileira"],
            Self::Humanities => &["História do Brasil", "Geografia do Brasil", "Sociologia"],
            Self::NaturalSciences => &[
                "Física: Eletrodinâmica",
                "Química: Ligações Químicas",
                "Biologia: Ecologia",
            ],
            Self::Mathematics => &["Análise Combinatória", "Funções", "Geometria Espacial"],
            Self::Essay => &["Estrutura Dissertativo-Argumentativa", "Repertório Sociocultural"],
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A canonical study day (Monday through Saturday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// The six study days, in week order
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Canonical label, used as the plan key
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Segunda",
            Self::Tuesday => "Terça",
            Self::Wednesday => "Quarta",
            Self::Thursday => "Quinta",
            Self::Friday => "Sexta",
            Self::Saturday => "Sábado",
        }
    }

    /// Resolve a day label or one of its synonyms
    ///
    /// Accepts the canonical label, the long form (`Segunda-feira`), and
    /// unaccented or differently-cased variants. Sunday and unknown labels
    /// yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded = fold(label);
        let short = folded.strip_suffix("-feira").unwrap_or(&folded).trim();
        Self::ALL.into_iter().find(|d| fold(d.label()) == short)
    }

    /// Map a calendar weekday to a study day
    pub fn from_weekday(weekday: chrono::Weekday) -> Option<Self> {
        match weekday {
            chrono::Weekday::Mon => Some(Self::Monday),
            chrono::Weekday::Tue => Some(Self::Tuesday),
            chrono::Weekday::Wed => Some(Self::Wednesday),
            chrono::Weekday::Thu => Some(Self::Thursday),
            chrono::Weekday::Fri => Some(Self::Friday),
            chrono::Weekday::Sat => Some(Self::Saturday),
            chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Day::from_label(&label).ok_or_else(|| serde::de::Error::custom(format!("unknown study day '{}'", label)))
    }
}

/// Normalize a day label to its canonical form
///
/// Total and idempotent: recognized labels map to the canonical label,
/// anything else is returned unchanged.
pub fn normalize_day_label(label: &str) -> String {
    match Day::from_label(label) {
        Some(day) => day.label().to_string(),
        None => label.to_string(),
    }
}

/// Lowercase and strip the Portuguese diacritics used in the catalog
fn fold(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_day_synonyms_map_to_same_key() {
        let cases = [
            ("Segunda-feira", Day::Monday),
            ("Segunda", Day::Monday),
            ("Terça-feira", Day::Tuesday),
            ("terca", Day::Tuesday),
            ("Quarta-feira", Day::Wednesday),
            ("Quinta", Day::Thursday),
            ("SEXTA-FEIRA", Day::Friday),
            ("Sábado", Day::Saturday),
            ("sabado", Day::Saturday),
        ];
        for (label, expected) in cases {
            assert_eq!(Day::from_label(label), Some(expected), "label {}", label);
        }
    }

    #[test]
    fn test_sunday_and_unknown_are_not_study_days() {
        assert_eq!(Day::from_label("Domingo"), None);
        assert_eq!(Day::from_label("Monday"), None);
        assert_eq!(Day::from_label(""), None);
    }

    #[test]
    fn test_normalize_day_label() {
        assert_eq!(normalize_day_label("Segunda-feira"), "Segunda");
        assert_eq!(normalize_day_label("Segunda"), "Segunda");
        assert_eq!(normalize_day_label("Domingo"), "Domingo");
    }

    #[test]
    fn test_day_serde_uses_canonical_label() {
        let json = serde_json::to_string(&Day::Tuesday).unwrap();
        assert_eq!(json, "\"Terça\"");
        let day: Day = serde_json::from_str("\"Terça-feira\"").unwrap();
        assert_eq!(day, Day::Tuesday);
        assert!(serde_json::from_str::<Day>("\"Domingo\"").is_err());
    }

    #[test]
    fn test_from_weekday() {
        assert_eq!(Day::from_weekday(chrono::Weekday::Sat), Some(Day::Saturday));
        assert_eq!(Day::from_weekday(chrono::Weekday::Sun), None);
    }

    #[test]
    fn test_subject_from_name() {
        assert_eq!(Subject::from_name("Matemática"), Some(Subject::Mathematics));
        assert_eq!(Subject::from_name("matematica"), Some(Subject::Mathematics));
        assert_eq!(Subject::from_name("ciencias da natureza"), Some(Subject::NaturalSciences));
        assert_eq!(Subject::from_name("5"), Some(Subject::Essay));
        assert_eq!(Subject::from_name("0"), None);
        assert_eq!(Subject::from_name("Química"), None);
    }

    #[test]
    fn test_subject_serde_name() {
        assert_eq!(serde_json::to_string(&Subject::Humanities).unwrap(), "\"Ciências Humanas\"");
    }

    #[test]
    fn test_every_subject_has_fallback_topics() {
        for subject in Subject::ALL {
            assert!(!subject.fallback_topics().is_empty(), "{} has no topics", subject);
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(label in "\\PC{0,20}") {
            let once = normalize_day_label(&label);
            prop_assert_eq!(normalize_day_label(&once), once);
        }

        #[test]
        fn prop_canonical_labels_are_fixed_points(index in 0usize..6) {
            let label = Day::ALL[index].label();
            prop_assert_eq!(normalize_day_label(label), label);
        }
    }
}
