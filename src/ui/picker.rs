/// Autocomplete candidates shown under the field being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    /// The editor text the candidates were computed for.
    pub prefix: String,
    pub items: Vec<String>,
    /// `None` until the user moves into the list.
    pub selected: Option<usize>,
}

impl PickerState {
    pub fn new(prefix: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            items,
            selected: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.items.get(index))
            .map(String::as_str)
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None | Some(0) => self.items.len() - 1,
            Some(index) => index - 1,
        });
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(index) => (index + 1) % self.items.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> PickerState {
        PickerState::new(
            "sh",
            vec!["Shield".to_string(), "Shortbow".to_string(), "Shortsword".to_string()],
        )
    }

    #[test]
    fn starts_without_selection() {
        let picker = picker();
        assert_eq!(picker.selected_item(), None);
    }

    #[test]
    fn movement_wraps_both_ways() {
        let mut picker = picker();
        picker.move_down();
        assert_eq!(picker.selected_item(), Some("Shield"));
        picker.move_up();
        assert_eq!(picker.selected_item(), Some("Shortsword"));
        picker.move_down();
        assert_eq!(picker.selected_item(), Some("Shield"));
    }

    #[test]
    fn empty_picker_ignores_movement() {
        let mut picker = PickerState::new("zz", Vec::new());
        picker.move_down();
        picker.move_up();
        assert!(picker.is_empty());
        assert_eq!(picker.selected, None);
    }
}
