//! Editable field value objects

use crate::wizard::{FieldDescriptor, FieldKind, FieldValue};

/// What the user is editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Free text; also used for dates, which are parsed when the stage is submitted
    Text(String),
    /// Index into the descriptor's options, `None` when nothing is selected
    Choice(Option<usize>),
    Flag(bool),
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldInput,
}

impl FormField {
    /// Create a field from its descriptor, loading a previously entered value
    pub fn from_descriptor(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let input = match descriptor.kind {
            FieldKind::Choice(options) => {
                let text = value.to_input();
                FieldInput::Choice(options.iter().position(|o| *o == text))
            }
            FieldKind::Consent => FieldInput::Flag(matches!(value, FieldValue::Flag(true))),
            FieldKind::Text | FieldKind::Date => FieldInput::Text(value.to_input()),
        };
        Self {
            name: descriptor.name,
            label: descriptor.label,
            kind: descriptor.kind,
            value: input,
        }
    }

    fn options(&self) -> &'static [&'static str] {
        match self.kind {
            FieldKind::Choice(options) => options,
            _ => &[],
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.value, FieldInput::Choice(_))
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.value, FieldInput::Flag(_))
    }

    /// Current value as text (empty for unselected choices and unticked flags)
    pub fn as_text(&self) -> String {
        match &self.value {
            FieldInput::Text(s) => s.clone(),
            FieldInput::Choice(Some(i)) => self.options().get(*i).copied().unwrap_or("").to_string(),
            FieldInput::Choice(None) => String::new(),
            FieldInput::Flag(b) => if *b { "yes" } else { "" }.to_string(),
        }
    }

    /// Replace the value with text, selecting the matching option for choices
    pub fn set_text(&mut self, text: &str) {
        let options = self.options();
        match &mut self.value {
            FieldInput::Text(s) => *s = text.to_string(),
            FieldInput::Choice(selected) => *selected = options.iter().position(|o| *o == text),
            FieldInput::Flag(b) => *b = !text.is_empty(),
        }
    }

    /// Type a character.
    ///
    /// For choice fields this jumps to the next option starting with the
    /// character, so `N` cycles through `NE`, `NV`, `NH`, ...
    pub fn push_char(&mut self, c: char) {
        if self.is_flag() {
            if matches!(c, ' ' | 'x' | 'X' | 'y' | 'Y') {
                self.toggle();
            }
            return;
        }
        let options = self.options();
        match &mut self.value {
            FieldInput::Text(s) => s.push(c),
            FieldInput::Choice(selected) => {
                let start = selected.map_or(0, |i| i + 1);
                let matches = |o: &&str| {
                    o.chars()
                        .next()
                        .is_some_and(|first| first.eq_ignore_ascii_case(&c))
                };
                let next = (start..options.len())
                    .chain(0..start)
                    .find(|i| matches(&options[*i]));
                if next.is_some() {
                    *selected = next;
                }
            }
            FieldInput::Flag(_) => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldInput::Text(s) => {
                s.pop();
            }
            FieldInput::Choice(selected) => *selected = None,
            FieldInput::Flag(b) => *b = false,
        }
    }

    /// Select the next option, passing through "not selected" after the last one
    pub fn next_option(&mut self) {
        let count = self.options().len();
        if let FieldInput::Choice(selected) = &mut self.value {
            *selected = match *selected {
                None if count > 0 => Some(0),
                Some(i) if i + 1 < count => Some(i + 1),
                _ => None,
            };
        }
    }

    /// Select the previous option, passing through "not selected" before the first one
    pub fn prev_option(&mut self) {
        let count = self.options().len();
        if let FieldInput::Choice(selected) = &mut self.value {
            *selected = match *selected {
                None if count > 0 => Some(count - 1),
                Some(0) | None => None,
                Some(i) => Some(i - 1),
            };
        }
    }

    pub fn toggle(&mut self) {
        if let FieldInput::Flag(b) = &mut self.value {
            *b = !*b;
        }
    }

    /// Value handed to the wizard when the stage is submitted
    pub fn to_value(&self) -> FieldValue {
        match (&self.value, self.kind) {
            (FieldInput::Flag(b), _) => FieldValue::Flag(*b),
            (FieldInput::Text(raw), FieldKind::Date) => FieldValue::date_from_input(raw),
            _ => FieldValue::text(self.as_text()),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldInput::Text(s) => s.clone(),
            FieldInput::Choice(None) => "< select >".to_string(),
            FieldInput::Choice(Some(_)) => format!("< {} >", self.as_text()),
            FieldInput::Flag(true) => "[x]".to_string(),
            FieldInput::Flag(false) => "[ ]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StageId;

    fn field(stage: StageId, name: &str) -> FormField {
        let descriptor = stage.definition().field(name).unwrap();
        FormField::from_descriptor(descriptor, &descriptor.initial_value())
    }

    #[test]
    fn test_text_editing() {
        let mut f = field(StageId::ContactPerson, "contact_first_name");
        for c in "Jane".chars() {
            f.push_char(c);
        }
        f.pop_char();
        assert_eq!(f.as_text(), "Jan");
        assert_eq!(f.to_value(), FieldValue::text("Jan"));
    }

    #[test]
    fn test_choice_cycles_through_blank() {
        let mut f = field(StageId::BasicInformation, "entity_type");
        assert_eq!(f.as_text(), "");
        f.next_option();
        assert_eq!(f.as_text(), "Individual");
        f.next_option();
        assert_eq!(f.as_text(), "Organization");
        f.next_option();
        assert_eq!(f.as_text(), "");
        f.prev_option();
        assert_eq!(f.as_text(), "Organization");
    }

    #[test]
    fn test_choice_jumps_by_first_letter() {
        let mut f = field(StageId::BusinessAddress, "mailing_state");
        f.push_char('n');
        assert_eq!(f.as_text(), "NE");
        f.push_char('n');
        assert_eq!(f.as_text(), "NV");
        f.push_char('q');
        assert_eq!(f.as_text(), "NV");
        f.pop_char();
        assert_eq!(f.as_text(), "");
    }

    #[test]
    fn test_set_text_selects_option() {
        let mut f = field(StageId::BusinessAddress, "practice_state");
        f.set_text("NY");
        assert_eq!(f.as_text(), "NY");
        f.set_text("Narnia");
        assert_eq!(f.as_text(), "");
    }

    #[test]
    fn test_date_field_parses_on_submit() {
        let mut f = field(StageId::IdentifyingInformation, "date_of_birth");
        assert_eq!(f.to_value(), FieldValue::Date(None));
        f.set_text("01/01/1980");
        assert_eq!(
            f.to_value().as_date(),
            chrono::NaiveDate::from_ymd_opt(1980, 1, 1)
        );
    }

    #[test]
    fn test_consent_toggles() {
        let mut f = field(StageId::Certification, "agreement");
        assert_eq!(f.display_value(), "[ ]");
        f.push_char(' ');
        assert_eq!(f.to_value(), FieldValue::Flag(true));
        f.toggle();
        assert_eq!(f.to_value(), FieldValue::Flag(false));
    }

    #[test]
    fn test_loads_existing_choice() {
        let descriptor = StageId::BasicInformation.definition().field("submission_reason").unwrap();
        let f = FormField::from_descriptor(descriptor, &FieldValue::text("Deactivate"));
        assert_eq!(f.display_value(), "< Deactivate >");
    }
}
