//! Light client-side format checks, run before submission
//!
//! These are format checks only; business rules (weekday clashes, plan
//! completeness) belong to the backend. A failure blocks submission of the
//! record and is fully recoverable by correcting the field.
//!
//! Row rule: an unpersisted row that is entirely empty is a leftover
//! placeholder — it never reaches the wire, so it is not validated. A row
//! with any content must carry its required weekday selection.

use crate::errors::{CoachFormError, Result};
use crate::model::{PlanVariant, Trainee};

/// Validate the live tree for submission
pub fn validate(tree: &Trainee) -> Result<()> {
    if tree.name.trim().is_empty() {
        return Err(field_error("name", "name must not be blank"));
    }
    validate_email(&tree.email)?;

    match tree.plan.variant {
        PlanVariant::Manual => {
            for (i, training) in tree.plan.visible_trainings() {
                let has_content = !training.description.is_empty()
                    || training.exercises.iter().any(|e| !e.name.is_empty());
                if has_content && training.weekday.is_none() {
                    return Err(field_error(
                        "weekday",
                        format!("training row {} needs a weekday", i),
                    ));
                }
            }
            for (i, meal) in tree.plan.visible_meals() {
                let has_content =
                    !meal.meal_type.is_empty() || meal.foods.iter().any(|f| !f.name.is_empty());
                if has_content && meal.weekday.is_none() {
                    return Err(field_error(
                        "weekday",
                        format!("meal row {} needs a weekday", i),
                    ));
                }
            }
        }
        PlanVariant::Document => {
            for (i, document) in tree.plan.visible_documents() {
                let has_content = document.file.is_some() || !document.notes.is_empty();
                if has_content && document.weekday.is_none() {
                    return Err(field_error(
                        "weekday",
                        format!("document row {} needs a weekday", i),
                    ));
                }
                // A row with content must carry a file unless one was
                // already uploaded in a prior save.
                if has_content && document.file.is_none() && document.file_url.is_none() {
                    return Err(field_error(
                        "file",
                        format!("document row {} needs a file", i),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(field_error("email", "email must not be blank"));
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next();
    match domain {
        Some(d) if !local.is_empty() && !d.is_empty() && !d.contains('@') => Ok(()),
        _ => Err(field_error("email", "email must look like name@domain")),
    }
}

fn field_error(field: &str, reason: impl Into<String>) -> CoachFormError {
    CoachFormError::Validation {
        field: field.to_string(),
        reason: reason.into(),
    }
}
