//! The plan: a tagged choice between two arms whose data coexists in memory
//!
//! Both arms are always held so that toggling the variant before submission
//! is lossless; only the active arm's content ever reaches the encoder. The
//! deactivated arm contributes destroy markers for its persisted rows.

use serde::{Deserialize, Serialize};

use super::document::WeeklyDocument;
use super::meal::Meal;
use super::training::Training;

/// Which plan arm is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanVariant {
    /// Coach-authored trainings and meals
    Manual,
    /// Weekly document uploads
    Document,
}

impl PlanVariant {
    /// Lowercase wire representation
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            PlanVariant::Manual => "manual",
            PlanVariant::Document => "document",
        }
    }
}

/// The trainee's plan, holding both arms simultaneously
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// The active arm
    pub variant: PlanVariant,

    /// Manual arm: training days in insertion order
    #[serde(default)]
    pub trainings: Vec<Training>,

    /// Manual arm: meals in insertion order
    #[serde(default)]
    pub meals: Vec<Meal>,

    /// Document arm: weekly uploads in insertion order
    #[serde(default)]
    pub documents: Vec<WeeklyDocument>,
}

impl Plan {
    /// An empty manual plan with one placeholder row per collection
    pub fn empty_manual() -> Self {
        Self {
            variant: PlanVariant::Manual,
            trainings: vec![Training::placeholder()],
            meals: vec![Meal::placeholder()],
            documents: Vec::new(),
        }
    }

    /// Visible trainings paired with their raw collection index
    pub fn visible_trainings(&self) -> impl Iterator<Item = (usize, &Training)> {
        self.trainings
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_destroyed())
    }

    /// Visible meals paired with their raw collection index
    pub fn visible_meals(&self) -> impl Iterator<Item = (usize, &Meal)> {
        self.meals
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_destroyed())
    }

    /// Visible documents paired with their raw collection index
    pub fn visible_documents(&self) -> impl Iterator<Item = (usize, &WeeklyDocument)> {
        self.documents
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_destroyed())
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::empty_manual()
    }
}
