//! Change events raised by quantity inputs.

/// Selector the delegated listener matches event targets against.
pub const QUANTITY_INPUT_SELECTOR: &str = "input[type=number]";

/// Snapshot of a form control at the moment it raised a change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputElement {
    /// The control's `type` attribute.
    pub input_type: String,

    /// The control's `name`: the cart line identifier for quantity inputs.
    pub name: String,

    /// The control's current `value`, exactly as typed.
    pub value: String,
}

impl InputElement {
    /// A `type=number` input.
    pub fn number(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            input_type: "number".to_string(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// An input of any type.
    pub fn new(
        input_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            input_type: input_type.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether the control matches [`QUANTITY_INPUT_SELECTOR`].
    #[must_use]
    pub fn is_quantity_input(&self) -> bool {
        self.input_type.eq_ignore_ascii_case("number")
    }
}

/// A `change` event that bubbled up to the cart container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub target: InputElement,
}

impl From<InputElement> for ChangeEvent {
    fn from(target: InputElement) -> Self {
        Self { target }
    }
}
