//! Form state - the serialized form bound inside revealed content

/// Hidden field conventionally carrying an overridden HTTP method
/// (distinguishes update from create semantics for messaging)
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// One named form control and its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A form serialized out of rendered content: its own action/method plus
/// every named control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot {
    /// Submission target (the form's own action attribute)
    pub action: String,
    /// Declared method; submission always goes to the form's own method
    pub method: String,
    pub fields: Vec<FormField>,
}

impl FormSnapshot {
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::new(name, value));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Update a field's current value; returns false for unknown names
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// The overridden HTTP method hint, when the hidden field is present and
    /// non-empty. `Some` indicates update semantics, `None` create semantics.
    pub fn method_override(&self) -> Option<&str> {
        self.field(METHOD_OVERRIDE_FIELD).filter(|v| !v.is_empty())
    }
}

/// Live state of the form bound in the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Current serialized values, kept up to date by field edits
    pub snapshot: FormSnapshot,
    /// True once the dirty tracker reports unsaved edits
    pub dirty: bool,
    /// Submit trigger enabled only while dirty
    pub submit_enabled: bool,
    /// All controls disabled while a submission is in flight
    pub controls_disabled: bool,
    /// A submission is in flight
    pub submitting: bool,
}

impl FormState {
    pub fn bound(snapshot: FormSnapshot) -> Self {
        Self {
            snapshot,
            dirty: false,
            submit_enabled: false,
            controls_disabled: false,
            submitting: false,
        }
    }
}
