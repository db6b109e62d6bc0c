use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("age must be a whole number between 1 and 120, got {0:?}")]
    InvalidAge(String),
    #[error("unknown gender {0:?}")]
    UnknownGender(String),
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

/// The three choices the wizard collects, one per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    Theme,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::Theme => "theme",
        })
    }
}

/// Reader age, always within `MIN_AGE..=MAX_AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    pub fn new(years: u32) -> Option<Self> {
        u8::try_from(years)
            .ok()
            .filter(|y| (MIN_AGE..=MAX_AGE).contains(y))
            .map(Age)
    }

    pub fn years(self) -> u8 {
        self.0
    }

    pub fn category(self) -> AgeCategory {
        age_category(self.0)
    }
}

impl FromStr for Age {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Age::new)
            .ok_or_else(|| ValidationError::InvalidAge(s.to_string()))
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeCategory {
    Child,
    Teenager,
    Adult,
}

impl AgeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AgeCategory::Child => "child",
            AgeCategory::Teenager => "teenager",
            AgeCategory::Adult => "adult",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn age_category(years: u8) -> AgeCategory {
    match years {
        0..=12 => AgeCategory::Child,
        13..=17 => AgeCategory::Teenager,
        _ => AgeCategory::Adult,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
    NonBinary,
}

impl Gender {
    pub const ALL: &'static [Gender] = &[Gender::Female, Gender::Male, Gender::NonBinary];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::NonBinary => "non-binary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Girl / Woman",
            Gender::Male => "Boy / Man",
            Gender::NonBinary => "Non-binary",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownGender(s.to_string()))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryTheme {
    Adventure,
    Fantasy,
    Mystery,
    ScienceFiction,
    Friendship,
    Comedy,
}

impl StoryTheme {
    pub const ALL: &'static [StoryTheme] = &[
        StoryTheme::Adventure,
        StoryTheme::Fantasy,
        StoryTheme::Mystery,
        StoryTheme::ScienceFiction,
        StoryTheme::Friendship,
        StoryTheme::Comedy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoryTheme::Adventure => "adventure",
            StoryTheme::Fantasy => "fantasy",
            StoryTheme::Mystery => "mystery",
            StoryTheme::ScienceFiction => "science-fiction",
            StoryTheme::Friendship => "friendship",
            StoryTheme::Comedy => "comedy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StoryTheme::Adventure => "Adventure",
            StoryTheme::Fantasy => "Fantasy",
            StoryTheme::Mystery => "Mystery",
            StoryTheme::ScienceFiction => "Science Fiction",
            StoryTheme::Friendship => "Friendship",
            StoryTheme::Comedy => "Comedy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StoryTheme::Adventure => "Quests, maps and daring escapes",
            StoryTheme::Fantasy => "Dragons, wizards and enchanted forests",
            StoryTheme::Mystery => "Clues, secrets and a puzzle to solve",
            StoryTheme::ScienceFiction => "Rockets, robots and distant planets",
            StoryTheme::Friendship => "Loyal companions and kind hearts",
            StoryTheme::Comedy => "Silly mix-ups and happy endings",
        }
    }
}

impl FromStr for StoryTheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryTheme::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTheme(s.to_string()))
    }
}

impl fmt::Display for StoryTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selections {
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub theme: Option<StoryTheme>,
}

impl Selections {
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Age => self.age.is_some(),
            Field::Gender => self.gender.is_some(),
            Field::Theme => self.theme.is_some(),
        }
    }

    /// Returns the choices only once every field is populated.
    pub fn complete(&self) -> Option<StoryChoices> {
        Some(StoryChoices {
            age: self.age?,
            gender: self.gender?,
            theme: self.theme?,
        })
    }
}

/// A fully populated selection, the only thing a generator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryChoices {
    pub age: Age,
    pub gender: Gender,
    pub theme: StoryTheme,
}

/// Owns the user's choices. Every mutation goes through a validator.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selections: Selections,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Rejected values leave the store untouched.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), ValidationError> {
        match field {
            Field::Age => self.selections.age = Some(value.parse()?),
            Field::Gender => self.selections.gender = Some(value.parse()?),
            Field::Theme => self.selections.theme = Some(value.parse()?),
        }
        Ok(())
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Age => self.selections.age = None,
            Field::Gender => self.selections.gender = None,
            Field::Theme => self.selections.theme = None,
        }
    }

    pub fn reset(&mut self) {
        self.selections = Selections::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_category_buckets() {
        for years in 1..=12 {
            assert_eq!(age_category(years), AgeCategory::Child, "age {years}");
        }
        for years in 13..=17 {
            assert_eq!(age_category(years), AgeCategory::Teenager, "age {years}");
        }
        for years in 18..=120 {
            assert_eq!(age_category(years), AgeCategory::Adult, "age {years}");
        }
    }

    #[test]
    fn out_of_range_and_non_integer_ages_are_rejected() {
        let mut store = SelectionStore::new();
        for bad in ["0", "121", "-4", "12.5", "abc", "", "300", "99999999999"] {
            assert!(store.set_field(Field::Age, bad).is_err(), "{bad:?} accepted");
            assert_eq!(store.selections().age, None);
        }
    }

    #[test]
    fn boundary_ages_are_accepted() {
        let mut store = SelectionStore::new();
        store.set_field(Field::Age, "1").unwrap();
        assert_eq!(store.selections().age.map(Age::years), Some(1));
        store.set_field(Field::Age, "120").unwrap();
        assert_eq!(store.selections().age.map(Age::years), Some(120));
    }

    #[test]
    fn rejected_value_keeps_previous_choice() {
        let mut store = SelectionStore::new();
        store.set_field(Field::Gender, "female").unwrap();
        assert_eq!(
            store.set_field(Field::Gender, "dragon"),
            Err(ValidationError::UnknownGender("dragon".into()))
        );
        assert_eq!(store.selections().gender, Some(Gender::Female));

        assert!(store.set_field(Field::Theme, "horror").is_err());
        assert_eq!(store.selections().theme, None);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = SelectionStore::new();
        store.set_field(Field::Age, "30").unwrap();
        store.set_field(Field::Gender, "male").unwrap();
        store.set_field(Field::Theme, "mystery").unwrap();

        store.reset();
        let once = *store.selections();
        store.reset();
        assert_eq!(*store.selections(), once);
        assert_eq!(once, Selections::default());
    }

    #[test]
    fn complete_requires_every_field() {
        let mut store = SelectionStore::new();
        store.set_field(Field::Age, "8").unwrap();
        store.set_field(Field::Gender, "female").unwrap();
        assert!(store.selections().complete().is_none());

        store.set_field(Field::Theme, "adventure").unwrap();
        let choices = store.selections().complete().unwrap();
        assert_eq!(choices.age.category(), AgeCategory::Child);
        assert_eq!(choices.gender, Gender::Female);
        assert_eq!(choices.theme, StoryTheme::Adventure);
    }
}
