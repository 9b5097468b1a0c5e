//! Manual-plan meal rows and their nested foods

use coachform_core_types::PersistedId;
use serde::{Deserialize, Serialize};

use super::weekday::Weekday;

/// One meal inside the manual plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Day this meal applies to; unset on a fresh placeholder row
    #[serde(default)]
    pub weekday: Option<Weekday>,

    /// Meal-type label, e.g. "breakfast" or "post-workout"
    #[serde(default)]
    pub meal_type: String,

    /// Foods in insertion order
    #[serde(default)]
    pub foods: Vec<Food>,

    #[serde(skip)]
    destroyed: bool,
}

impl Meal {
    /// Create a fresh placeholder row with one empty food
    pub fn placeholder() -> Self {
        Self {
            id: None,
            weekday: None,
            meal_type: String::new(),
            foods: vec![Food::placeholder()],
            destroyed: false,
        }
    }

    /// Whether this row has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this row is scheduled for destruction on the next save
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }

    /// Visible foods paired with their raw collection index
    pub fn visible_foods(&self) -> impl Iterator<Item = (usize, &Food)> {
        self.foods
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_destroyed())
    }
}

/// One food entry inside a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Food name, e.g. "Oats"
    #[serde(default)]
    pub name: String,

    /// Amount description, e.g. "80g"
    #[serde(default)]
    pub amount: String,

    #[serde(skip)]
    destroyed: bool,
}

impl Food {
    /// Create a fresh placeholder row
    pub fn placeholder() -> Self {
        Self {
            id: None,
            name: String::new(),
            amount: String::new(),
            destroyed: false,
        }
    }

    /// Whether this row has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this row is scheduled for destruction on the next save
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }
}
