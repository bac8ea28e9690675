//! Ordered field collection and step numbering for one form.
//!
//! Field order is global: a field's step is only a tag, and the order of the
//! fields sharing a step is their render order on that page. Every field's step
//! stays within `1..=max_steps` after each operation; operations given unknown
//! ids or out-of-range steps return an error and leave the layout untouched.

use std::collections::BTreeMap;

use formwright_domain::{highest_step, Field, FieldType, FIRST_STEP};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Fields plus the number of available steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormLayout {
    fields: Vec<Field>,
    max_steps: u32,
}

/// What removing a step destroys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRemovalPlan {
    pub step: u32,
    /// Fields deleted with the step, in form order.
    pub doomed_fields: Vec<Field>,
    /// Number of fields whose step moves down by one.
    pub renumbered: usize,
}

impl StepRemovalPlan {
    /// User-facing confirmation prompt.
    pub fn describe(&self) -> String {
        match self.doomed_fields.len() {
            0 => format!("Remove step {}? It has no fields.", self.step),
            1 => format!(
                "Remove step {} and its field \"{}\"? This cannot be undone.",
                self.step, self.doomed_fields[0].label
            ),
            n => format!(
                "Remove step {} and its {} fields? This cannot be undone.",
                self.step, n
            ),
        }
    }
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl FormLayout {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            max_steps: FIRST_STEP,
        }
    }

    /// Builds a layout from loaded data, repairing steps that fall outside the range.
    pub fn from_fields(fields: Vec<Field>, max_steps: u32) -> Self {
        let mut fields = fields;
        for field in &mut fields {
            field.step = field.step.max(FIRST_STEP);
        }
        let max_steps = max_steps.max(highest_step(&fields)).max(FIRST_STEP);
        Self { fields, max_steps }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn fields_in_step(&self, step: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |field| field.step == step)
    }

    pub fn highest_used_step(&self) -> u32 {
        highest_step(&self.fields)
    }

    /// Field count for every step, including empty ones.
    pub fn step_field_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts: BTreeMap<u32, usize> =
            (FIRST_STEP..=self.max_steps).map(|step| (step, 0)).collect();
        for field in &self.fields {
            *counts.entry(field.step).or_default() += 1;
        }
        counts
    }

    /// Appends a new field with type defaults to the end of the form.
    pub fn add_field(
        &mut self,
        kind: FieldType,
        step: u32,
        id: impl Into<String>,
    ) -> Result<&Field, CoreError> {
        self.ensure_step(step)?;
        let field = Field::with_defaults(id, kind, step);
        tracing::debug!(field = %field.id, %kind, step, "field added");
        self.fields.push(field);
        Ok(&self.fields[self.fields.len() - 1])
    }

    /// Inserts a new field at `target_id`'s position, on the target's step.
    pub fn insert_field_before(
        &mut self,
        kind: FieldType,
        target_id: &str,
        id: impl Into<String>,
    ) -> Result<&Field, CoreError> {
        let index = self.index_of(target_id)?;
        let step = self.fields[index].step;
        let field = Field::with_defaults(id, kind, step);
        tracing::debug!(field = %field.id, %kind, step, before = target_id, "field inserted");
        self.fields.insert(index, field);
        Ok(&self.fields[index])
    }

    pub fn remove_field(&mut self, id: &str) -> Result<Field, CoreError> {
        let index = self.index_of(id)?;
        tracing::debug!(field = id, "field removed");
        Ok(self.fields.remove(index))
    }

    /// Applies `update` to the field. The field's step must stay in range.
    pub fn update_field<F>(&mut self, id: &str, update: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Field),
    {
        let index = self.index_of(id)?;
        let mut candidate = self.fields[index].clone();
        update(&mut candidate);
        candidate.id = self.fields[index].id.clone();
        self.ensure_step(candidate.step)?;
        self.fields[index] = candidate;
        Ok(())
    }

    /// Moves `dragged_id` to the index `target_id` occupies. When the two sit
    /// on different steps the dragged field adopts the target's step.
    pub fn reorder_within_step(
        &mut self,
        dragged_id: &str,
        target_id: &str,
    ) -> Result<(), CoreError> {
        let from = self.index_of(dragged_id)?;
        let to = self.index_of(target_id)?;
        if from == to {
            return Ok(());
        }
        let target_step = self.fields[to].step;
        let mut field = self.fields.remove(from);
        field.step = target_step;
        self.fields.insert(to, field);
        tracing::debug!(
            field = dragged_id,
            target = target_id,
            step = target_step,
            "field reordered"
        );
        Ok(())
    }

    /// Reassigns a field to `step`. With `before` the field is positioned at
    /// that field's index; otherwise it lands after the last field already on
    /// `step`, or at the end of the form when the step is empty.
    pub fn move_field_to_step(
        &mut self,
        id: &str,
        step: u32,
        before: Option<&str>,
    ) -> Result<(), CoreError> {
        self.ensure_step(step)?;
        let from = self.index_of(id)?;
        if let Some(target) = before {
            let to = self.index_of(target)?;
            if to == from {
                self.fields[from].step = step;
            } else {
                let mut field = self.fields.remove(from);
                field.step = step;
                self.fields.insert(to, field);
            }
        } else {
            let mut field = self.fields.remove(from);
            field.step = step;
            let to = self
                .fields
                .iter()
                .rposition(|candidate| candidate.step == step)
                .map(|idx| idx + 1)
                .unwrap_or(self.fields.len());
            self.fields.insert(to, field);
        }
        tracing::debug!(field = id, step, "field moved to step");
        Ok(())
    }

    pub fn add_step(&mut self) -> u32 {
        self.max_steps += 1;
        tracing::debug!(max_steps = self.max_steps, "step added");
        self.max_steps
    }

    /// Describes the effect of removing `step` without changing anything.
    pub fn request_remove_step(&self, step: u32) -> Result<StepRemovalPlan, CoreError> {
        if self.max_steps <= FIRST_STEP {
            return Err(CoreError::CannotRemoveLastStep);
        }
        self.ensure_step(step)?;
        Ok(StepRemovalPlan {
            step,
            doomed_fields: self.fields_in_step(step).cloned().collect(),
            renumbered: self.fields.iter().filter(|field| field.step > step).count(),
        })
    }

    /// Deletes every field on `step`, closes the gap and shrinks `max_steps`.
    /// The removed fields are not recoverable.
    pub fn confirm_remove_step(&mut self, step: u32) -> Result<StepRemovalPlan, CoreError> {
        let plan = self.request_remove_step(step)?;
        self.fields.retain(|field| field.step != step);
        for field in &mut self.fields {
            if field.step > step {
                field.step -= 1;
            }
        }
        self.max_steps -= 1;
        tracing::debug!(
            step,
            removed = plan.doomed_fields.len(),
            max_steps = self.max_steps,
            "step removed"
        );
        Ok(plan)
    }

    /// Moves the block of fields on `dragged` to `target`, shifting the steps
    /// in between by one towards the vacated slot. Computed from the original
    /// step of each field in one pass.
    pub fn reorder_steps(&mut self, dragged: u32, target: u32) -> Result<(), CoreError> {
        self.ensure_step(dragged)?;
        self.ensure_step(target)?;
        if dragged == target {
            return Ok(());
        }
        for field in &mut self.fields {
            field.step = renumber_step(field.step, dragged, target);
        }
        tracing::debug!(dragged, target, "steps reordered");
        Ok(())
    }

    /// Verifies every field's step lies within `1..=max_steps`.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if self.max_steps < FIRST_STEP {
            return Err(CoreError::StepOutOfRange {
                step: self.max_steps,
                max_steps: self.max_steps,
            });
        }
        for field in &self.fields {
            self.ensure_step(field.step)?;
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, CoreError> {
        self.fields
            .iter()
            .position(|field| field.id == id)
            .ok_or_else(|| CoreError::FieldNotFound(id.to_string()))
    }

    fn ensure_step(&self, step: u32) -> Result<(), CoreError> {
        if (FIRST_STEP..=self.max_steps).contains(&step) {
            Ok(())
        } else {
            Err(CoreError::StepOutOfRange {
                step,
                max_steps: self.max_steps,
            })
        }
    }
}

fn renumber_step(step: u32, dragged: u32, target: u32) -> u32 {
    if step == dragged {
        target
    } else if dragged < target && step > dragged && step <= target {
        step - 1
    } else if dragged > target && step >= target && step < dragged {
        step + 1
    } else {
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str, step: u32) -> Field {
        let mut field = Field::with_defaults(id, FieldType::Text, step);
        field.label = id.to_uppercase();
        field
    }

    fn three_step_layout() -> FormLayout {
        FormLayout::from_fields(
            vec![field("a", 1), field("b", 2), field("c", 3), field("d", 1)],
            3,
        )
    }

    fn steps(layout: &FormLayout) -> Vec<(&str, u32)> {
        layout
            .fields()
            .iter()
            .map(|f| (f.id.as_str(), f.step))
            .collect()
    }

    #[test]
    fn add_field_on_empty_form() {
        let mut layout = FormLayout::new();
        let added = layout.add_field(FieldType::Text, 1, "field-1").unwrap().clone();
        assert_eq!(layout.len(), 1);
        assert_eq!(added.step, 1);
        assert!(!added.required);
    }

    #[test]
    fn add_field_beyond_max_steps_is_rejected() {
        let mut layout = FormLayout::new();
        let err = layout.add_field(FieldType::Text, 2, "field-1").unwrap_err();
        assert!(matches!(err, CoreError::StepOutOfRange { step: 2, max_steps: 1 }));
        assert!(layout.is_empty());
    }

    #[test]
    fn add_step_keeps_field_steps() {
        let mut layout = three_step_layout();
        let before = steps(&layout)
            .into_iter()
            .map(|(id, s)| (id.to_string(), s))
            .collect::<Vec<_>>();
        assert_eq!(layout.add_step(), 4);
        let after = steps(&layout)
            .into_iter()
            .map(|(id, s)| (id.to_string(), s))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_middle_step_renumbers_later_fields() {
        let mut layout = three_step_layout();
        let plan = layout.confirm_remove_step(2).unwrap();
        assert_eq!(plan.doomed_fields.len(), 1);
        assert_eq!(plan.doomed_fields[0].id, "b");
        assert_eq!(layout.max_steps(), 2);
        assert_eq!(steps(&layout), vec![("a", 1), ("c", 2), ("d", 1)]);
        layout.check_invariants().unwrap();
    }

    #[test]
    fn request_remove_step_does_not_mutate() {
        let layout = three_step_layout();
        let snapshot = layout.clone();
        let plan = layout.request_remove_step(1).unwrap();
        assert_eq!(plan.doomed_fields.len(), 2);
        assert_eq!(plan.renumbered, 2);
        assert!(plan.describe().contains("2 fields"));
        assert_eq!(layout, snapshot);
    }

    #[test]
    fn removing_last_step_is_refused() {
        let mut layout = FormLayout::from_fields(vec![field("a", 1)], 1);
        let snapshot = layout.clone();
        let err = layout.confirm_remove_step(1).unwrap_err();
        assert!(matches!(err, CoreError::CannotRemoveLastStep));
        assert_eq!(layout, snapshot);
    }

    #[test]
    fn reorder_steps_backwards_in_one_pass() {
        let mut layout = three_step_layout();
        layout.reorder_steps(3, 1).unwrap();
        assert_eq!(steps(&layout), vec![("a", 2), ("b", 3), ("c", 1), ("d", 2)]);
    }

    #[test]
    fn reorder_steps_forwards_in_one_pass() {
        let mut layout = three_step_layout();
        layout.reorder_steps(1, 3).unwrap();
        assert_eq!(steps(&layout), vec![("a", 3), ("b", 1), ("c", 2), ("d", 3)]);
    }

    #[test]
    fn reorder_steps_leaves_outside_range_untouched() {
        let mut layout = FormLayout::from_fields(
            vec![field("a", 1), field("b", 2), field("c", 3), field("d", 4)],
            4,
        );
        layout.reorder_steps(2, 3).unwrap();
        assert_eq!(steps(&layout), vec![("a", 1), ("b", 3), ("c", 2), ("d", 4)]);
    }

    #[test]
    fn reorder_within_step_takes_target_index() {
        let mut layout = FormLayout::from_fields(
            vec![field("a", 1), field("b", 1), field("c", 1)],
            1,
        );
        layout.reorder_within_step("c", "a").unwrap();
        assert_eq!(steps(&layout), vec![("c", 1), ("a", 1), ("b", 1)]);
        layout.reorder_within_step("c", "b").unwrap();
        assert_eq!(steps(&layout), vec![("a", 1), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn reorder_lands_after_target_when_moving_down() {
        let mut layout = FormLayout::from_fields(
            vec![field("a", 1), field("b", 1), field("c", 1), field("d", 1)],
            1,
        );
        layout.reorder_within_step("a", "c").unwrap();
        assert_eq!(
            steps(&layout),
            vec![("b", 1), ("c", 1), ("a", 1), ("d", 1)]
        );
        layout.reorder_within_step("d", "c").unwrap();
        assert_eq!(
            steps(&layout),
            vec![("b", 1), ("d", 1), ("c", 1), ("a", 1)]
        );
    }

    #[test]
    fn reorder_across_steps_adopts_target_step() {
        let mut layout = three_step_layout();
        layout.reorder_within_step("c", "a").unwrap();
        assert_eq!(steps(&layout), vec![("c", 1), ("a", 1), ("b", 2), ("d", 1)]);
    }

    #[test]
    fn move_to_step_without_target_appends_after_step_block() {
        let mut layout = three_step_layout();
        layout.move_field_to_step("c", 1, None).unwrap();
        assert_eq!(steps(&layout), vec![("a", 1), ("b", 2), ("d", 1), ("c", 1)]);

        layout.add_step();
        layout.move_field_to_step("a", 4, None).unwrap();
        assert_eq!(steps(&layout).last(), Some(&("a", 4)));
    }

    #[test]
    fn move_to_unknown_step_is_rejected() {
        let mut layout = three_step_layout();
        let snapshot = layout.clone();
        assert!(layout.move_field_to_step("a", 9, None).is_err());
        assert!(layout.move_field_to_step("zz", 1, None).is_err());
        assert_eq!(layout, snapshot);
    }

    #[test]
    fn insert_before_uses_target_step() {
        let mut layout = three_step_layout();
        let inserted = layout
            .insert_field_before(FieldType::Radio, "c", "new")
            .unwrap()
            .clone();
        assert_eq!(inserted.step, 3);
        assert_eq!(layout.fields()[2].id, "new");
    }

    #[test]
    fn update_field_cannot_escape_step_range() {
        let mut layout = three_step_layout();
        assert!(layout.update_field("a", |f| f.step = 7).is_err());
        layout.update_field("a", |f| f.label = "Renamed".into()).unwrap();
        assert_eq!(layout.field("a").unwrap().label, "Renamed");
    }

    #[test]
    fn from_fields_grows_max_steps_to_cover_fields() {
        let layout = FormLayout::from_fields(vec![field("a", 3), field("b", 0)], 1);
        assert_eq!(layout.max_steps(), 3);
        assert_eq!(layout.field("b").unwrap().step, 1);
        assert_eq!(layout.step_field_counts().get(&2), Some(&0));
    }
}
