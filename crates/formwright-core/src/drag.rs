//! Drag-and-drop as a short-lived transaction over a [`FormLayout`].
//!
//! Starting a drag records the dragged entity, hovering only moves the
//! highlight, and dropping is the single point where the layout changes.
//! A cancelled drag leaves no trace.

use formwright_domain::FieldType;

use crate::{arrangement::FormLayout, CoreError};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEntity {
    /// A new control pulled from the palette.
    Palette(FieldType),
    /// An existing field, by id.
    Field(String),
    /// A whole step, by number.
    Step(u32),
}

/// Where the pointer currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Field(String),
    /// A step tab, or the empty area of a step.
    Step(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragEntity),
    Hovering {
        entity: DragEntity,
        target: DropTarget,
    },
}

/// Result of a committed drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was in progress, or the drop had no effect.
    Ignored,
    FieldAdded { id: String, step: u32 },
    FieldMoved { id: String, step: u32 },
    StepsReordered { from: u32, to: u32 },
}

impl DropOutcome {
    pub fn changed_layout(&self) -> bool {
        !matches!(self, DropOutcome::Ignored)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Begins a drag, discarding any drag left over from before.
    pub fn start(&mut self, entity: DragEntity) {
        self.state = DragState::Dragging(entity);
    }

    /// Moves the hover highlight. Ignored when nothing is being dragged.
    pub fn hover(&mut self, target: DropTarget) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            DragState::Idle => DragState::Idle,
            DragState::Dragging(entity) | DragState::Hovering { entity, .. } => {
                DragState::Hovering { entity, target }
            }
        };
    }

    /// The pointer left every target.
    pub fn leave(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            DragState::Hovering { entity, .. } => DragState::Dragging(entity),
            other => other,
        };
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Target that should be highlighted, if any.
    pub fn highlighted(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Hovering { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Commits the drag onto `target`. The session is idle afterwards whether
    /// or not the drop succeeds; on error the layout is unchanged.
    ///
    /// Resolution:
    /// * palette on a field inserts before it on its step, palette on a step appends to it;
    /// * field on a field takes that field's index and step (so it lands after
    ///   a target further down the list), field on a step
    ///   moves it after the step's last field;
    /// * step on a step (or on a field of that step) reorders steps.
    pub fn drop<F>(
        &mut self,
        target: DropTarget,
        layout: &mut FormLayout,
        new_id: F,
    ) -> Result<DropOutcome, CoreError>
    where
        F: FnOnce() -> String,
    {
        let entity = match std::mem::take(&mut self.state) {
            DragState::Idle => return Ok(DropOutcome::Ignored),
            DragState::Dragging(entity) | DragState::Hovering { entity, .. } => entity,
        };

        match (entity, target) {
            (DragEntity::Palette(kind), DropTarget::Field(target_id)) => {
                let field = layout.insert_field_before(kind, &target_id, new_id())?;
                Ok(DropOutcome::FieldAdded {
                    id: field.id.clone(),
                    step: field.step,
                })
            }
            (DragEntity::Palette(kind), DropTarget::Step(step)) => {
                let field = layout.add_field(kind, step, new_id())?;
                Ok(DropOutcome::FieldAdded {
                    id: field.id.clone(),
                    step: field.step,
                })
            }
            (DragEntity::Field(id), DropTarget::Field(target_id)) => {
                if id == target_id {
                    return Ok(DropOutcome::Ignored);
                }
                layout.reorder_within_step(&id, &target_id)?;
                let step = step_of(layout, &id)?;
                Ok(DropOutcome::FieldMoved { id, step })
            }
            (DragEntity::Field(id), DropTarget::Step(step)) => {
                layout.move_field_to_step(&id, step, None)?;
                Ok(DropOutcome::FieldMoved { id, step })
            }
            (DragEntity::Step(from), DropTarget::Step(to)) => reorder(layout, from, to),
            (DragEntity::Step(from), DropTarget::Field(target_id)) => {
                let to = step_of(layout, &target_id)?;
                reorder(layout, from, to)
            }
        }
    }
}

fn reorder(layout: &mut FormLayout, from: u32, to: u32) -> Result<DropOutcome, CoreError> {
    if from == to {
        return Ok(DropOutcome::Ignored);
    }
    layout.reorder_steps(from, to)?;
    Ok(DropOutcome::StepsReordered { from, to })
}

fn step_of(layout: &FormLayout, id: &str) -> Result<u32, CoreError> {
    layout
        .field(id)
        .map(|field| field.step)
        .ok_or_else(|| CoreError::FieldNotFound(id.to_string()))
}
