//! Numeric inputs backing the calibration form.
//!
//! Each input holds a committed value plus an optional text buffer while
//! the operator is typing. Only committed values reach the chart and the
//! calibration file.

use crate::calibration::{CalibrationRecord, VALUE_ROWS};
use crate::error::FormError;

/// Step applied by the +/- controls
pub const DEFAULT_STEP: f64 = 100.0;

/// The three form fields, in calibration file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dry,
    Wet,
    Volume,
}

impl Field {
    pub const ALL: [Field; VALUE_ROWS] = [Field::Dry, Field::Wet, Field::Volume];

    pub fn label(self) -> &'static str {
        match self {
            Field::Dry => "Upper sensor value for 'soil dry'",
            Field::Wet => "Lower sensor value for 'soil wet'",
            Field::Volume => "Water to give when dry (ml)",
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Dry => 0,
            Field::Wet => 1,
            Field::Volume => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % VALUE_ROWS]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + VALUE_ROWS - 1) % VALUE_ROWS]
    }
}

/// A labelled number input with a fixed step
#[derive(Debug, Clone, PartialEq)]
pub struct NumberInput {
    label: &'static str,
    value: f64,
    step: f64,
    buffer: Option<String>,
}

impl NumberInput {
    pub fn new(label: &'static str, value: f64, step: f64) -> Self {
        Self {
            label,
            value,
            step,
            buffer: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Text typed so far, if the operator is editing
    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }

    /// Replace the value and drop any pending text
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.buffer = None;
    }

    pub fn increment(&mut self) {
        self.set_value(self.value + self.step);
    }

    pub fn decrement(&mut self) {
        self.set_value(self.value - self.step);
    }

    /// Add a typed character. Returns false if the character was rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        let buffer = self.buffer.get_or_insert_with(String::new);
        let accepted = match c {
            '0'..='9' => true,
            '-' => buffer.is_empty(),
            '.' => !buffer.contains('.'),
            _ => false,
        };
        if accepted {
            buffer.push(c);
        } else if buffer.is_empty() {
            self.buffer = None;
        }
        accepted
    }

    pub fn backspace(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.pop();
        }
    }

    /// Parse the pending text into the value.
    ///
    /// Returns `Ok(true)` if a new value was stored, `Ok(false)` if there
    /// was nothing to commit.
    pub fn commit(&mut self) -> Result<bool, FormError> {
        let Some(text) = self.buffer.take() else {
            return Ok(false);
        };
        if text.is_empty() {
            return Ok(false);
        }
        match text.parse::<f64>() {
            Ok(value) => {
                self.value = value;
                Ok(true)
            }
            Err(_) => {
                self.buffer = Some(text.clone());
                Err(FormError::NotANumber(text))
            }
        }
    }

    pub fn cancel(&mut self) {
        self.buffer = None;
    }

    /// Text shown in the input box
    pub fn display(&self) -> String {
        match &self.buffer {
            Some(text) => text.clone(),
            None => self.value.to_string(),
        }
    }
}

/// The calibration form: three inputs and a selection cursor
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationForm {
    inputs: [NumberInput; VALUE_ROWS],
    selected: Field,
}

impl CalibrationForm {
    pub fn new(record: &CalibrationRecord, step: f64) -> Self {
        let values = record.values();
        Self {
            inputs: Field::ALL.map(|field| NumberInput::new(field.label(), values[field.index()], step)),
            selected: Field::Dry,
        }
    }

    /// Committed values as a calibration record
    pub fn record(&self) -> CalibrationRecord {
        CalibrationRecord::from_values(self.inputs.each_ref().map(NumberInput::value))
    }

    /// Replace every value, dropping pending text
    pub fn load(&mut self, record: &CalibrationRecord) {
        for (input, value) in self.inputs.iter_mut().zip(record.values()) {
            input.set_value(value);
        }
    }

    pub fn input(&self, field: Field) -> &NumberInput {
        &self.inputs[field.index()]
    }

    pub fn input_mut(&mut self, field: Field) -> &mut NumberInput {
        &mut self.inputs[field.index()]
    }

    pub fn inputs(&self) -> impl Iterator<Item = (Field, &NumberInput)> {
        Field::ALL.into_iter().zip(self.inputs.iter())
    }

    pub fn selected(&self) -> Field {
        self.selected
    }

    pub fn selected_input_mut(&mut self) -> &mut NumberInput {
        &mut self.inputs[self.selected.index()]
    }

    /// Move the cursor; pending text on the old field is dropped
    pub fn select(&mut self, field: Field) {
        if field != self.selected {
            self.selected_input_mut().cancel();
            self.selected = field;
        }
    }

    pub fn select_next(&mut self) {
        self.select(self.selected.next());
    }

    pub fn select_prev(&mut self) {
        self.select(self.selected.prev());
    }

    /// Whether the selected field has pending text
    pub fn is_editing(&self) -> bool {
        self.input(self.selected).is_editing()
    }
}
