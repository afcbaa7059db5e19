//! Terminal form state: labelled fields, focus and key editing.

/// One selectable value of a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Value submitted with the form
    pub value: String,
    /// Label shown to the user
    pub label: String,
}

impl Choice {
    /// Build a choice
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How a field is edited and drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Free text drawn as asterisks
    Secret,
    /// On/off switch; value is `"true"` or empty
    Toggle,
    /// One of a fixed list, cycled with left/right
    Select(Vec<Choice>),
}

/// A labelled form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Label drawn before the value
    pub label: &'static str,
    /// Current value
    pub value: String,
    /// Editing behaviour
    pub kind: FieldKind,
}

impl Field {
    /// Text field
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    /// Masked text field
    pub fn secret(label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(label)
        }
    }

    /// On/off field
    pub fn toggle(label: &'static str) -> Self {
        Self {
            kind: FieldKind::Toggle,
            ..Self::text(label)
        }
    }

    /// Selection field; starts on the first choice
    pub fn select(label: &'static str, choices: Vec<Choice>) -> Self {
        let value = choices.first().map(|c| c.value.clone()).unwrap_or_default();
        Self {
            label,
            value,
            kind: FieldKind::Select(choices),
        }
    }

    /// Text drawn for the current value
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.value.clone(),
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Toggle => {
                if self.is_on() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::Select(choices) => choices
                .iter()
                .find(|c| c.value == self.value)
                .map(|c| format!("< {} >", c.label))
                .unwrap_or_else(|| "< >".to_string()),
        }
    }

    /// Toggle state
    pub fn is_on(&self) -> bool {
        self.value == "true"
    }

    fn cycle(&mut self, forward: bool) {
        match &self.kind {
            FieldKind::Toggle => {
                self.value = if self.is_on() { String::new() } else { "true".to_string() };
            }
            FieldKind::Select(choices) if !choices.is_empty() => {
                let current = choices.iter().position(|c| c.value == self.value);
                let next = match (current, forward) {
                    (None, _) => 0,
                    (Some(i), true) => (i + 1) % choices.len(),
                    (Some(i), false) => (i + choices.len() - 1) % choices.len(),
                };
                self.value = choices[next].value.clone();
            }
            _ => {}
        }
    }
}

/// Ordered fields with one focused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    fields: Vec<Field>,
    focus: usize,
}

impl FormState {
    /// Form over `fields`, focus on the first
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    /// All fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Index of the focused field
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Value of field `index`
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    /// Toggle state of field `index`
    pub fn is_on(&self, index: usize) -> bool {
        self.fields.get(index).map_or(false, Field::is_on)
    }

    /// Overwrite field `index`
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    /// Replace the choices of a select field, keeping the value if still offered
    pub fn set_choices(&mut self, index: usize, choices: Vec<Choice>) {
        if let Some(field) = self.fields.get_mut(index) {
            if !choices.iter().any(|c| c.value == field.value) {
                field.value = choices.first().map(|c| c.value.clone()).unwrap_or_default();
            }
            field.kind = FieldKind::Select(choices);
        }
    }

    /// Move focus down, wrapping
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Move focus up, wrapping
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused field; space flips a toggle
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            match field.kind {
                FieldKind::Text | FieldKind::Secret => field.value.push(c),
                FieldKind::Toggle if c == ' ' => field.cycle(true),
                _ => {}
            }
        }
    }

    /// Delete the last character of the focused text field
    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if matches!(field.kind, FieldKind::Text | FieldKind::Secret) {
                field.value.pop();
            }
        }
    }

    /// Step the focused select or toggle
    pub fn cycle(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.cycle(forward);
        }
    }

    /// Empty every text field, reset selects to their first choice, focus the top
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = match &field.kind {
                FieldKind::Select(choices) => {
                    choices.first().map(|c| c.value.clone()).unwrap_or_default()
                }
                _ => String::new(),
            };
        }
        self.focus = 0;
    }
}

/// Move a list cursor by one row, clamped to the list
pub fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}
