// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Gesture sensors for manual row reordering. A sensor only tracks intent;
//! the single reorder commit happens when it yields a [`DragEnd`].

use accord_app::{DragEnd, RecordId};

/// Turns device input into a drag gesture over the rows currently on screen.
/// `rows` is the page's record ids in display order.
pub trait DragSensor {
    type Input;

    fn feed(&mut self, input: Self::Input, rows: &[RecordId]) -> Option<DragEnd>;

    /// Record being dragged, if a gesture is in progress.
    fn active(&self) -> Option<RecordId>;

    /// Row the dragged record would land on.
    fn over(&self) -> Option<RecordId>;

    fn is_dragging(&self) -> bool {
        self.active().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardDragInput {
    /// Pick up the row at this display index.
    Grab(usize),
    Move(isize),
    Drop,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyboardGesture {
    active: RecordId,
    over_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardSensor {
    gesture: Option<KeyboardGesture>,
    over: Option<RecordId>,
}

impl DragSensor for KeyboardSensor {
    type Input = KeyboardDragInput;

    fn feed(&mut self, input: KeyboardDragInput, rows: &[RecordId]) -> Option<DragEnd> {
        match input {
            KeyboardDragInput::Grab(index) => {
                let active = rows.get(index).copied()?;
                self.gesture = Some(KeyboardGesture {
                    active,
                    over_index: index,
                });
                self.over = Some(active);
                None
            }
            KeyboardDragInput::Move(delta) => {
                let gesture = self.gesture.as_mut()?;
                if rows.is_empty() {
                    return None;
                }
                let last = rows.len() as isize - 1;
                let next = (gesture.over_index as isize + delta).clamp(0, last) as usize;
                gesture.over_index = next;
                self.over = rows.get(next).copied();
                None
            }
            KeyboardDragInput::Drop => {
                let gesture = self.gesture.take()?;
                let over = self.over.take();
                Some(DragEnd {
                    active: gesture.active,
                    over,
                })
            }
            KeyboardDragInput::Cancel => {
                self.gesture = None;
                self.over = None;
                None
            }
        }
    }

    fn active(&self) -> Option<RecordId> {
        self.gesture.map(|gesture| gesture.active)
    }

    fn over(&self) -> Option<RecordId> {
        self.over
    }
}

impl KeyboardSensor {
    /// Display index the dragged row currently hovers.
    pub fn over_index(&self) -> Option<usize> {
        self.gesture.map(|gesture| gesture.over_index)
    }
}

/// Mouse input already mapped to a display row; `None` means the pointer is
/// outside the table body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseDragInput {
    Down(Option<usize>),
    Drag(Option<usize>),
    Up(Option<usize>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MouseSensor {
    pressed: Option<RecordId>,
    moved: bool,
    over: Option<RecordId>,
}

impl DragSensor for MouseSensor {
    type Input = MouseDragInput;

    fn feed(&mut self, input: MouseDragInput, rows: &[RecordId]) -> Option<DragEnd> {
        let row_at = |index: Option<usize>| index.and_then(|index| rows.get(index).copied());
        match input {
            MouseDragInput::Down(index) => {
                self.pressed = row_at(index);
                self.over = self.pressed;
                self.moved = false;
                None
            }
            MouseDragInput::Drag(index) => {
                self.pressed?;
                self.moved = true;
                self.over = row_at(index);
                None
            }
            MouseDragInput::Up(index) => {
                let active = self.pressed.take()?;
                let moved = std::mem::take(&mut self.moved);
                self.over = None;
                // A click without movement is not a drag.
                if !moved {
                    return None;
                }
                Some(DragEnd {
                    active,
                    over: row_at(index),
                })
            }
        }
    }

    fn active(&self) -> Option<RecordId> {
        if self.moved { self.pressed } else { None }
    }

    fn over(&self) -> Option<RecordId> {
        self.over
    }
}
