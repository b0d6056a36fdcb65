use crossterm::event::Event;
use thiserror::Error;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("A required UI element is missing: {0}")]
    MissingUiElement(&'static str),
}

/// The entry collection a filter operates on. The page owns the rendered
/// rows; the filter only reads labels and writes visibility flags.
#[cfg_attr(test, mockall::automock)]
pub trait EntryView {
    fn entry_count(&self) -> usize;
    fn label(&self, entry: usize) -> String;
    fn set_visible(&mut self, entry: usize, visible: bool);
}

/// Keeps the visible subset of a fixed entry collection in sync with the
/// text typed into a search input. Visibility is recomputed from scratch on
/// every value change: an entry stays visible iff its lower-cased label
/// contains the lower-cased query. The empty query matches everything.
pub struct IncrementalFilter<V> {
    input: Input,
    entries: V,
}

impl<V: EntryView> IncrementalFilter<V> {
    /// Attaches to an already-existing input control and entry collection.
    /// Neither is created here; a missing input or an empty collection is a
    /// `MissingUiElement` error and the filter never activates.
    pub fn attach(input: Option<Input>, entries: V) -> Result<Self, FilterError> {
        let input = input.ok_or(FilterError::MissingUiElement("search input"))?;
        if entries.entry_count() == 0 {
            return Err(FilterError::MissingUiElement("entry collection"));
        }
        Ok(IncrementalFilter { input, entries })
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn entries(&self) -> &V {
        &self.entries
    }

    /// Forwards a terminal event to the input control and runs one filtering
    /// pass when the event changed the input's value. Cursor movement alone
    /// does not trigger a pass.
    pub fn handle_event(&mut self, event: &Event) {
        if let Some(change) = self.input.handle_event(event) {
            if change.value {
                self.refresh();
            }
        }
    }

    pub fn clear(&mut self) {
        self.input.reset();
        self.refresh();
    }

    fn refresh(&mut self) {
        // No trimming: whitespace in the query is matched literally.
        let query = self.input.value().to_lowercase();
        for entry in 0..self.entries.entry_count() {
            let visible = self.entries.label(entry).to_lowercase().contains(&query);
            self.entries.set_visible(entry, visible);
        }
    }
}
