//! The diff walk itself
//!
//! Baseline rows are matched by persistent id (an id-keyed map per
//! collection), never by array position: rows can be soft-deleted in the
//! middle of a collection without misattributing later rows' changes.
//! Output paths still use each row's live position, which is all the
//! receiver needs to group fields of one row together.

use std::collections::HashMap;

use coachform_core_types::PersistedId;

use super::model::{CascadeMode, ChangeSet, ChangeValue, DiffOptions};
use crate::encode::path::Seg;
use crate::model::{
    Attachment, Exercise, ExerciseSet, Food, Meal, PlanVariant, Trainee, Training, Weekday,
    WeeklyDocument,
};

/// Compute the minimal change-set between the live tree and its baseline
///
/// With no baseline (create mode) every active, non-destroyed row is new
/// and serializes fully. The inactive plan arm contributes only destroy
/// markers for its persisted rows; its field data never reaches the output.
pub fn compute(live: &Trainee, baseline: Option<&Trainee>, opts: &DiffOptions) -> ChangeSet {
    let mut out = ChangeSet::new();
    let mut path = vec![Seg::Key("root")];

    diff_root_scalars(live, baseline, &mut path, &mut out);

    path.push(Seg::Key("plan"));
    let base_plan = baseline.map(|b| &b.plan);

    let variant_changed = match base_plan {
        None => true,
        Some(bp) => bp.variant != live.plan.variant,
    };
    if variant_changed {
        path.push(Seg::Key("variant"));
        out.push(
            &path,
            ChangeValue::Text(live.plan.variant.as_wire_str().to_string()),
        );
        path.pop();
    }

    // Collections always walk in declared order; the variant only decides
    // whether a collection contributes content or destroy markers.
    match live.plan.variant {
        PlanVariant::Manual => {
            active_collection(
                &live.plan.trainings,
                base_plan.map(|p| p.trainings.as_slice()),
                &mut path,
                &mut out,
                opts,
            );
            active_collection(
                &live.plan.meals,
                base_plan.map(|p| p.meals.as_slice()),
                &mut path,
                &mut out,
                opts,
            );
            inactive_collection(&live.plan.documents, &mut path, &mut out, opts);
        }
        PlanVariant::Document => {
            inactive_collection(&live.plan.trainings, &mut path, &mut out, opts);
            inactive_collection(&live.plan.meals, &mut path, &mut out, opts);
            active_collection(
                &live.plan.documents,
                base_plan.map(|p| p.documents.as_slice()),
                &mut path,
                &mut out,
                opts,
            );
        }
    }
    path.pop();

    out
}

fn diff_root_scalars(
    live: &Trainee,
    baseline: Option<&Trainee>,
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
) {
    text_field(path, out, "name", &live.name, baseline.map(|b| b.name.as_str()));
    text_field(
        path,
        out,
        "email",
        &live.email,
        baseline.map(|b| b.email.as_str()),
    );
    text_field(
        path,
        out,
        "password",
        live.password.expose(),
        baseline.map(|b| b.password.expose().as_str()),
    );
    text_field(
        path,
        out,
        "phone",
        &live.phone,
        baseline.map(|b| b.phone.as_str()),
    );
    attachment_field(
        path,
        out,
        "photo",
        live.photo.as_ref(),
        baseline.map(|b| b.photo.as_ref()),
    );
}

// ---------------------------------------------------------------------------
// Per-row walk
// ---------------------------------------------------------------------------

/// One diffable row kind of a nested collection
trait DiffNode {
    /// Wire key of the collection holding this row kind
    const KEY: &'static str;

    fn id(&self) -> Option<PersistedId>;
    fn is_destroyed(&self) -> bool;

    /// Emit changed (or, without a base row, non-empty) scalar fields
    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet);

    /// Recurse into child collections with the same per-row rules
    fn diff_children(
        &self,
        base: Option<&Self>,
        path: &mut Vec<Seg>,
        out: &mut ChangeSet,
        opts: &DiffOptions,
    ) {
        let _ = (base, path, out, opts);
    }

    /// Emit explicit destroy markers for persisted descendants
    fn destroy_child_markers(&self, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        let _ = (path, out);
    }
}

/// Walk one collection of the active arm
fn active_collection<T: DiffNode>(
    live: &[T],
    base: Option<&[T]>,
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    opts: &DiffOptions,
) {
    path.push(Seg::Key(T::KEY));

    let by_id: HashMap<PersistedId, &T> = base
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r.id().map(|id| (id, r)))
                .collect()
        })
        .unwrap_or_default();

    for (i, row) in live.iter().enumerate() {
        path.push(Seg::Index(i));
        match (row.id(), row.is_destroyed()) {
            (Some(id), true) => {
                push_id(path, out, id);
                push_destroy(path, out);
                if opts.cascade == CascadeMode::ExplicitChildMarkers {
                    row.destroy_child_markers(path, out);
                }
            }
            // Unpersisted destroyed rows are hard-deleted by the mutation
            // API and normally never present; either way they emit nothing.
            (None, true) => {}
            (None, false) => {
                row.diff_fields(None, path, out);
                row.diff_children(None, path, out, opts);
            }
            (Some(id), false) => match by_id.get(&id).copied() {
                Some(base_row) => {
                    let before = out.len();
                    push_id(path, out, id);
                    row.diff_fields(Some(base_row), path, out);
                    row.diff_children(Some(base_row), path, out, opts);
                    if out.len() == before + 1 {
                        // Nothing beyond the bare id: full skip.
                        out.entries.truncate(before);
                    }
                }
                None => {
                    // Persisted row unknown to the baseline: send it whole.
                    push_id(path, out, id);
                    row.diff_fields(None, path, out);
                    row.diff_children(None, path, out, opts);
                }
            },
        }
        path.pop();
    }

    path.pop();
}

/// Walk one collection of the inactive arm: destroy markers only
fn inactive_collection<T: DiffNode>(
    live: &[T],
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    opts: &DiffOptions,
) {
    path.push(Seg::Key(T::KEY));
    for (i, row) in live.iter().enumerate() {
        if row.is_destroyed() {
            if let Some(id) = row.id() {
                path.push(Seg::Index(i));
                push_id(path, out, id);
                push_destroy(path, out);
                if opts.cascade == CascadeMode::ExplicitChildMarkers {
                    row.destroy_child_markers(path, out);
                }
                path.pop();
            }
        }
    }
    path.pop();
}

fn push_id(path: &mut Vec<Seg>, out: &mut ChangeSet, id: PersistedId) {
    path.push(Seg::Key("id"));
    out.push(path, ChangeValue::Id(id));
    path.pop();
}

fn push_destroy(path: &mut Vec<Seg>, out: &mut ChangeSet) {
    path.push(Seg::Key("destroy"));
    out.push(path, ChangeValue::Destroy);
    path.pop();
}

// ---------------------------------------------------------------------------
// Field helpers
//
// `base` is None when the row is new: emit only non-empty values. With a
// base value, emit on shallow inequality; the encoder later drops values
// that became empty, matching the receiver's treatment of absent keys.
// ---------------------------------------------------------------------------

fn text_field(
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    key: &'static str,
    live: &str,
    base: Option<&str>,
) {
    let changed = match base {
        None => !live.is_empty(),
        Some(b) => live != b,
    };
    if changed {
        path.push(Seg::Key(key));
        out.push(path, ChangeValue::Text(live.to_string()));
        path.pop();
    }
}

fn weekday_field(
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    live: Option<Weekday>,
    base: Option<Option<Weekday>>,
) {
    let changed = match base {
        None => live.is_some(),
        Some(b) => live != b,
    };
    if changed {
        if let Some(day) = live {
            path.push(Seg::Key("weekday"));
            out.push(path, ChangeValue::Text(day.as_wire_str().to_string()));
            path.pop();
        }
    }
}

fn number_field(
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    key: &'static str,
    live: Option<u32>,
    base: Option<Option<u32>>,
) {
    let changed = match base {
        None => live.is_some(),
        Some(b) => live != b,
    };
    if changed {
        if let Some(n) = live {
            path.push(Seg::Key(key));
            out.push(path, ChangeValue::Text(n.to_string()));
            path.pop();
        }
    }
}

fn attachment_field(
    path: &mut Vec<Seg>,
    out: &mut ChangeSet,
    key: &'static str,
    live: Option<&Attachment>,
    base: Option<Option<&Attachment>>,
) {
    // Attachments compare by reference identity, never by content bytes.
    let changed = match base {
        None => live.is_some(),
        Some(b) => match (live, b) {
            (None, None) => false,
            (Some(l), Some(r)) => !l.same_ref(r),
            _ => true,
        },
    };
    if changed {
        if let Some(att) = live {
            path.push(Seg::Key(key));
            out.push(path, ChangeValue::Binary(att.clone()));
            path.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Row impls
// ---------------------------------------------------------------------------

impl DiffNode for Training {
    const KEY: &'static str = "trainings";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        Training::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        weekday_field(path, out, self.weekday, base.map(|b| b.weekday));
        text_field(
            path,
            out,
            "description",
            &self.description,
            base.map(|b| b.description.as_str()),
        );
    }

    fn diff_children(
        &self,
        base: Option<&Self>,
        path: &mut Vec<Seg>,
        out: &mut ChangeSet,
        opts: &DiffOptions,
    ) {
        active_collection(
            &self.exercises,
            base.map(|b| b.exercises.as_slice()),
            path,
            out,
            opts,
        );
    }

    fn destroy_child_markers(&self, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        path.push(Seg::Key(Exercise::KEY));
        for (i, exercise) in self.exercises.iter().enumerate() {
            if let Some(id) = exercise.id {
                path.push(Seg::Index(i));
                push_id(path, out, id);
                push_destroy(path, out);
                exercise.destroy_child_markers(path, out);
                path.pop();
            }
        }
        path.pop();
    }
}

impl DiffNode for Exercise {
    const KEY: &'static str = "exercises";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        Exercise::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        text_field(path, out, "name", &self.name, base.map(|b| b.name.as_str()));
        text_field(
            path,
            out,
            "video_url",
            &self.video_url,
            base.map(|b| b.video_url.as_str()),
        );
    }

    fn diff_children(
        &self,
        base: Option<&Self>,
        path: &mut Vec<Seg>,
        out: &mut ChangeSet,
        opts: &DiffOptions,
    ) {
        active_collection(&self.sets, base.map(|b| b.sets.as_slice()), path, out, opts);
    }

    fn destroy_child_markers(&self, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        path.push(Seg::Key(ExerciseSet::KEY));
        for (i, set) in self.sets.iter().enumerate() {
            if let Some(id) = set.id {
                path.push(Seg::Index(i));
                push_id(path, out, id);
                push_destroy(path, out);
                path.pop();
            }
        }
        path.pop();
    }
}

impl DiffNode for ExerciseSet {
    const KEY: &'static str = "sets";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        ExerciseSet::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        number_field(path, out, "series", self.series, base.map(|b| b.series));
        number_field(path, out, "repeats", self.repeats, base.map(|b| b.repeats));
    }
}

impl DiffNode for Meal {
    const KEY: &'static str = "meals";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        Meal::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        weekday_field(path, out, self.weekday, base.map(|b| b.weekday));
        text_field(
            path,
            out,
            "meal_type",
            &self.meal_type,
            base.map(|b| b.meal_type.as_str()),
        );
    }

    fn diff_children(
        &self,
        base: Option<&Self>,
        path: &mut Vec<Seg>,
        out: &mut ChangeSet,
        opts: &DiffOptions,
    ) {
        active_collection(&self.foods, base.map(|b| b.foods.as_slice()), path, out, opts);
    }

    fn destroy_child_markers(&self, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        path.push(Seg::Key(Food::KEY));
        for (i, food) in self.foods.iter().enumerate() {
            if let Some(id) = food.id {
                path.push(Seg::Index(i));
                push_id(path, out, id);
                push_destroy(path, out);
                path.pop();
            }
        }
        path.pop();
    }
}

impl DiffNode for Food {
    const KEY: &'static str = "foods";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        Food::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        text_field(path, out, "name", &self.name, base.map(|b| b.name.as_str()));
        text_field(
            path,
            out,
            "amount",
            &self.amount,
            base.map(|b| b.amount.as_str()),
        );
    }
}

impl DiffNode for WeeklyDocument {
    const KEY: &'static str = "documents";

    fn id(&self) -> Option<PersistedId> {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        WeeklyDocument::is_destroyed(self)
    }

    fn diff_fields(&self, base: Option<&Self>, path: &mut Vec<Seg>, out: &mut ChangeSet) {
        weekday_field(path, out, self.weekday, base.map(|b| b.weekday));
        attachment_field(
            path,
            out,
            "file",
            self.file.as_ref(),
            base.map(|b| b.file.as_ref()),
        );
        text_field(
            path,
            out,
            "notes",
            &self.notes,
            base.map(|b| b.notes.as_str()),
        );
    }
}
