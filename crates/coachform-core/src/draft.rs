//! The editing session: one live tree, its baseline, and the mutation API
//!
//! All operations are synchronous and atomic relative to each other. Every
//! mutating operation is rejected while a submission is in flight. Rows are
//! addressed by their raw collection index (the index reported by the
//! `visible_*` iterators), so soft-deleted rows keep later rows' addresses
//! stable.
//!
//! Delete semantics: removing a persisted row marks it destroyed and keeps
//! it in its collection, hidden from presentation; removing a row that was
//! never saved removes it outright. Scalar setters never touch the
//! destroyed flag.

use std::collections::HashSet;

use coachform_core_types::PersistedId;
use tracing::debug;

use crate::diff::{self, ChangeSet, DiffOptions};
use crate::errors::{CoachFormError, Result};
use crate::model::{
    Attachment, Exercise, ExerciseSet, Food, Meal, PlanVariant, Trainee, Training, Weekday,
    WeeklyDocument,
};
use crate::preview::{PreviewProvider, PreviewRegistry};
use crate::snapshot::Baseline;

/// One trainee editing session
pub struct TraineeDraft {
    tree: Trainee,
    baseline: Baseline,
    previews: PreviewRegistry,
    photo_preview: Option<crate::preview::PreviewId>,
    locked: bool,
    /// Ids whose destroy markers were set by a variant switch, per arm.
    /// Switching back clears exactly these, leaving user-initiated soft
    /// deletes in place.
    switch_marked_manual: Vec<PersistedId>,
    switch_marked_document: Vec<PersistedId>,
}

impl TraineeDraft {
    /// Create mode: an empty record, no baseline, one placeholder row per
    /// active-arm collection
    pub fn new() -> Self {
        Self::with_previews(PreviewRegistry::noop())
    }

    /// Create mode with a presentation-supplied preview provider
    pub fn with_provider(provider: Box<dyn PreviewProvider>) -> Self {
        Self::with_previews(PreviewRegistry::new(provider))
    }

    fn with_previews(previews: PreviewRegistry) -> Self {
        Self {
            tree: Trainee::empty(),
            baseline: Baseline::absent(),
            previews,
            photo_preview: None,
            locked: false,
            switch_marked_manual: Vec::new(),
            switch_marked_document: Vec::new(),
        }
    }

    /// Edit mode: the baseline is captured from the loaded record, exactly
    /// once, before any mutation can happen
    pub fn from_record(record: Trainee) -> Self {
        let mut draft = Self::with_previews(PreviewRegistry::noop());
        draft.baseline = Baseline::capture(&record);
        draft.tree = record;
        draft
    }

    /// Edit mode with a presentation-supplied preview provider
    pub fn from_record_with_provider(record: Trainee, provider: Box<dyn PreviewProvider>) -> Self {
        let mut draft = Self::with_previews(PreviewRegistry::new(provider));
        draft.baseline = Baseline::capture(&record);
        draft.tree = record;
        draft
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The live tree, for the presentation layer
    pub fn tree(&self) -> &Trainee {
        &self.tree
    }

    /// The baseline snapshot
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// The record's server id, if it was ever saved
    pub fn id(&self) -> Option<PersistedId> {
        self.tree.id
    }

    /// Whether a submission is currently in flight
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Open preview handles, for the presentation layer and tests
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Compute the current minimal change-set against the baseline
    pub fn changes(&self, opts: &DiffOptions) -> ChangeSet {
        diff::compute(&self.tree, self.baseline.record(), opts)
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(CoachFormError::SubmissionInFlight);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Root scalar fields
    // -----------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.tree.name = name.into();
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.tree.email = email.into();
        Ok(())
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.tree.password = coachform_core_types::Sensitive::new(password.into());
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.tree.phone = phone.into();
        Ok(())
    }

    /// Replace the profile photo, releasing the superseded preview handle
    pub fn set_photo(&mut self, photo: Attachment) -> Result<()> {
        self.ensure_unlocked()?;
        if let Some(old) = self.photo_preview.take() {
            self.previews.release(old);
        }
        self.photo_preview = Some(self.previews.acquire(photo.blob()));
        self.tree.photo = Some(photo);
        Ok(())
    }

    /// The open preview handle for the photo, if one was picked
    pub fn photo_preview(&self) -> Option<crate::preview::PreviewId> {
        self.photo_preview
    }

    // -----------------------------------------------------------------------
    // Manual arm: trainings, exercises, sets
    // -----------------------------------------------------------------------

    /// Append a fresh training row; returns its index
    pub fn push_training(&mut self) -> Result<usize> {
        self.ensure_unlocked()?;
        self.tree.plan.trainings.push(Training::placeholder());
        debug!(collection = "trainings", "appended row");
        Ok(self.tree.plan.trainings.len() - 1)
    }

    pub fn set_training_weekday(&mut self, t: usize, weekday: Weekday) -> Result<()> {
        self.ensure_unlocked()?;
        self.training_mut(t)?.weekday = Some(weekday);
        Ok(())
    }

    pub fn set_training_description(&mut self, t: usize, description: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.training_mut(t)?.description = description.into();
        Ok(())
    }

    /// Remove a training row: soft delete when persisted, hard otherwise
    pub fn remove_training(&mut self, t: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.training_mut(t)?;
        if row.is_persisted() {
            row.set_destroyed(true);
            debug!(collection = "trainings", index = t, "soft-deleted row");
        } else {
            self.tree.plan.trainings.remove(t);
            debug!(collection = "trainings", index = t, "hard-deleted row");
        }
        Ok(())
    }

    /// Append a fresh exercise under a training; returns its index
    pub fn push_exercise(&mut self, t: usize) -> Result<usize> {
        self.ensure_unlocked()?;
        let row = self.training_mut(t)?;
        row.exercises.push(Exercise::placeholder());
        Ok(row.exercises.len() - 1)
    }

    pub fn set_exercise_name(&mut self, t: usize, e: usize, name: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.exercise_mut(t, e)?.name = name.into();
        Ok(())
    }

    pub fn set_exercise_video_url(
        &mut self,
        t: usize,
        e: usize,
        video_url: impl Into<String>,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.exercise_mut(t, e)?.video_url = video_url.into();
        Ok(())
    }

    pub fn remove_exercise(&mut self, t: usize, e: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.exercise_mut(t, e)?;
        if row.is_persisted() {
            row.set_destroyed(true);
        } else {
            self.training_mut(t)?.exercises.remove(e);
        }
        Ok(())
    }

    /// Append a fresh set under an exercise; returns its index
    pub fn push_set(&mut self, t: usize, e: usize) -> Result<usize> {
        self.ensure_unlocked()?;
        let row = self.exercise_mut(t, e)?;
        row.sets.push(ExerciseSet::placeholder());
        Ok(row.sets.len() - 1)
    }

    pub fn set_set_series(&mut self, t: usize, e: usize, s: usize, series: u32) -> Result<()> {
        self.ensure_unlocked()?;
        self.set_mut(t, e, s)?.series = Some(series);
        Ok(())
    }

    pub fn set_set_repeats(&mut self, t: usize, e: usize, s: usize, repeats: u32) -> Result<()> {
        self.ensure_unlocked()?;
        self.set_mut(t, e, s)?.repeats = Some(repeats);
        Ok(())
    }

    pub fn remove_set(&mut self, t: usize, e: usize, s: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.set_mut(t, e, s)?;
        if row.is_persisted() {
            row.set_destroyed(true);
        } else {
            self.exercise_mut(t, e)?.sets.remove(s);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Manual arm: meals, foods
    // -----------------------------------------------------------------------

    /// Append a fresh meal row; returns its index
    pub fn push_meal(&mut self) -> Result<usize> {
        self.ensure_unlocked()?;
        self.tree.plan.meals.push(Meal::placeholder());
        debug!(collection = "meals", "appended row");
        Ok(self.tree.plan.meals.len() - 1)
    }

    pub fn set_meal_weekday(&mut self, m: usize, weekday: Weekday) -> Result<()> {
        self.ensure_unlocked()?;
        self.meal_mut(m)?.weekday = Some(weekday);
        Ok(())
    }

    pub fn set_meal_type(&mut self, m: usize, meal_type: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.meal_mut(m)?.meal_type = meal_type.into();
        Ok(())
    }

    pub fn remove_meal(&mut self, m: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.meal_mut(m)?;
        if row.is_persisted() {
            row.set_destroyed(true);
            debug!(collection = "meals", index = m, "soft-deleted row");
        } else {
            self.tree.plan.meals.remove(m);
            debug!(collection = "meals", index = m, "hard-deleted row");
        }
        Ok(())
    }

    /// Append a fresh food under a meal; returns its index
    pub fn push_food(&mut self, m: usize) -> Result<usize> {
        self.ensure_unlocked()?;
        let row = self.meal_mut(m)?;
        row.foods.push(Food::placeholder());
        Ok(row.foods.len() - 1)
    }

    pub fn set_food_name(&mut self, m: usize, f: usize, name: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.food_mut(m, f)?.name = name.into();
        Ok(())
    }

    pub fn set_food_amount(&mut self, m: usize, f: usize, amount: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.food_mut(m, f)?.amount = amount.into();
        Ok(())
    }

    pub fn remove_food(&mut self, m: usize, f: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.food_mut(m, f)?;
        if row.is_persisted() {
            row.set_destroyed(true);
        } else {
            self.meal_mut(m)?.foods.remove(f);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Document arm
    // -----------------------------------------------------------------------

    /// Append a fresh weekly document row; returns its index
    pub fn push_document(&mut self) -> Result<usize> {
        self.ensure_unlocked()?;
        self.tree.plan.documents.push(WeeklyDocument::placeholder());
        debug!(collection = "documents", "appended row");
        Ok(self.tree.plan.documents.len() - 1)
    }

    pub fn set_document_weekday(&mut self, d: usize, weekday: Weekday) -> Result<()> {
        self.ensure_unlocked()?;
        self.document_mut(d)?.weekday = Some(weekday);
        Ok(())
    }

    pub fn set_document_notes(&mut self, d: usize, notes: impl Into<String>) -> Result<()> {
        self.ensure_unlocked()?;
        self.document_mut(d)?.notes = notes.into();
        Ok(())
    }

    /// Replace a document's file, releasing the superseded preview handle
    pub fn set_document_file(&mut self, d: usize, file: Attachment) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self
            .tree
            .plan
            .documents
            .get_mut(d)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "documents",
                index: d,
            })?;
        let preview = self.previews.acquire(file.blob());
        if let Some(old) = row.preview.replace(preview) {
            self.previews.release(old);
        }
        row.file = Some(file);
        Ok(())
    }

    /// Remove a document row, releasing its preview handle either way
    pub fn remove_document(&mut self, d: usize) -> Result<()> {
        self.ensure_unlocked()?;
        let row = self.document_mut(d)?;
        let preview = row.preview.take();
        if row.is_persisted() {
            row.set_destroyed(true);
            debug!(collection = "documents", index = d, "soft-deleted row");
        } else {
            self.tree.plan.documents.remove(d);
            debug!(collection = "documents", index = d, "hard-deleted row");
        }
        if let Some(preview) = preview {
            self.previews.release(preview);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Variant switching
    // -----------------------------------------------------------------------

    /// Switch the active plan arm
    ///
    /// No-op when unchanged. Every persisted row of the arm being
    /// deactivated is marked destroyed; rows never saved are simply left
    /// out of future payloads. Switching back to an arm clears exactly the
    /// destroy markers a previous switch set on it.
    pub fn switch_variant(&mut self, variant: PlanVariant) -> Result<()> {
        self.ensure_unlocked()?;
        if self.tree.plan.variant == variant {
            return Ok(());
        }
        match variant {
            PlanVariant::Document => {
                self.mark_manual_arm();
                self.unmark_document_arm();
            }
            PlanVariant::Manual => {
                self.mark_document_arm();
                self.unmark_manual_arm();
            }
        }
        self.tree.plan.variant = variant;
        debug!(variant = variant.as_wire_str(), "switched plan variant");
        Ok(())
    }

    fn mark_manual_arm(&mut self) {
        let marked = &mut self.switch_marked_manual;
        for training in &mut self.tree.plan.trainings {
            if training.is_persisted() && !training.is_destroyed() {
                if let Some(id) = training.id {
                    training.set_destroyed(true);
                    marked.push(id);
                }
            }
            for exercise in &mut training.exercises {
                if exercise.is_persisted() && !exercise.is_destroyed() {
                    if let Some(id) = exercise.id {
                        exercise.set_destroyed(true);
                        marked.push(id);
                    }
                }
                for set in &mut exercise.sets {
                    if set.is_persisted() && !set.is_destroyed() {
                        if let Some(id) = set.id {
                            set.set_destroyed(true);
                            marked.push(id);
                        }
                    }
                }
            }
        }
        for meal in &mut self.tree.plan.meals {
            if meal.is_persisted() && !meal.is_destroyed() {
                if let Some(id) = meal.id {
                    meal.set_destroyed(true);
                    marked.push(id);
                }
            }
            for food in &mut meal.foods {
                if food.is_persisted() && !food.is_destroyed() {
                    if let Some(id) = food.id {
                        food.set_destroyed(true);
                        marked.push(id);
                    }
                }
            }
        }
    }

    fn mark_document_arm(&mut self) {
        let marked = &mut self.switch_marked_document;
        for document in &mut self.tree.plan.documents {
            if document.is_persisted() && !document.is_destroyed() {
                if let Some(id) = document.id {
                    document.set_destroyed(true);
                    marked.push(id);
                }
            }
        }
    }

    fn unmark_manual_arm(&mut self) {
        let ids: HashSet<PersistedId> =
            std::mem::take(&mut self.switch_marked_manual).into_iter().collect();
        if ids.is_empty() {
            return;
        }
        for training in &mut self.tree.plan.trainings {
            if training.id.is_some_and(|id| ids.contains(&id)) {
                training.set_destroyed(false);
            }
            for exercise in &mut training.exercises {
                if exercise.id.is_some_and(|id| ids.contains(&id)) {
                    exercise.set_destroyed(false);
                }
                for set in &mut exercise.sets {
                    if set.id.is_some_and(|id| ids.contains(&id)) {
                        set.set_destroyed(false);
                    }
                }
            }
        }
        for meal in &mut self.tree.plan.meals {
            if meal.id.is_some_and(|id| ids.contains(&id)) {
                meal.set_destroyed(false);
            }
            for food in &mut meal.foods {
                if food.id.is_some_and(|id| ids.contains(&id)) {
                    food.set_destroyed(false);
                }
            }
        }
    }

    fn unmark_document_arm(&mut self) {
        let ids: HashSet<PersistedId> =
            std::mem::take(&mut self.switch_marked_document).into_iter().collect();
        if ids.is_empty() {
            return;
        }
        for document in &mut self.tree.plan.documents {
            if document.id.is_some_and(|id| ids.contains(&id)) {
                document.set_destroyed(false);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Submission hooks (driven by the gateway crate)
    // -----------------------------------------------------------------------

    /// Gate all further mutation for the duration of one submission
    pub fn lock_for_submission(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        self.locked = true;
        Ok(())
    }

    /// Re-enable mutation after a failed submission; the tree is untouched
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Install the server-returned record as the new tree and baseline
    ///
    /// Local attachments were consumed by the save, so every open preview
    /// handle is released before the tree is replaced.
    pub fn accept_server_record(&mut self, record: Trainee) {
        if let Some(preview) = self.photo_preview.take() {
            self.previews.release(preview);
        }
        let open: Vec<_> = self
            .tree
            .plan
            .documents
            .iter_mut()
            .filter_map(|d| d.preview.take())
            .collect();
        for preview in open {
            self.previews.release(preview);
        }
        self.baseline = Baseline::capture(&record);
        self.tree = record;
        self.switch_marked_manual.clear();
        self.switch_marked_document.clear();
        self.locked = false;
    }

    // -----------------------------------------------------------------------
    // Index helpers
    // -----------------------------------------------------------------------

    fn training_mut(&mut self, t: usize) -> Result<&mut Training> {
        self.tree
            .plan
            .trainings
            .get_mut(t)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "trainings",
                index: t,
            })
    }

    fn exercise_mut(&mut self, t: usize, e: usize) -> Result<&mut Exercise> {
        self.training_mut(t)?
            .exercises
            .get_mut(e)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "exercises",
                index: e,
            })
    }

    fn set_mut(&mut self, t: usize, e: usize, s: usize) -> Result<&mut ExerciseSet> {
        self.exercise_mut(t, e)?
            .sets
            .get_mut(s)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "sets",
                index: s,
            })
    }

    fn meal_mut(&mut self, m: usize) -> Result<&mut Meal> {
        self.tree
            .plan
            .meals
            .get_mut(m)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "meals",
                index: m,
            })
    }

    fn food_mut(&mut self, m: usize, f: usize) -> Result<&mut Food> {
        self.meal_mut(m)?
            .foods
            .get_mut(f)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "foods",
                index: f,
            })
    }

    fn document_mut(&mut self, d: usize) -> Result<&mut WeeklyDocument> {
        self.tree
            .plan
            .documents
            .get_mut(d)
            .ok_or(CoachFormError::NodeNotFound {
                collection: "documents",
                index: d,
            })
    }
}

impl Default for TraineeDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraineeDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraineeDraft")
            .field("id", &self.tree.id)
            .field("locked", &self.locked)
            .field("baseline", &self.baseline.is_present())
            .finish()
    }
}
