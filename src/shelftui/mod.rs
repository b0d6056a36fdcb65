use crate::library::Catalog;
use crate::shelftui::components::{ReaderPage, ShelfPage};
use crate::shelftui::reading_positions::ReadingPositions;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use log::error;
use ratatui::Frame;
use std::mem;
use std::rc::Rc;
use tokio::sync::mpsc;

pub mod components;
mod event_pump;
pub mod reading_positions;

pub enum Message {
    ShowArticle { id: String },
    GoBack,
}

pub enum Page {
    Shelf(ShelfPage),
    Reader(ReaderPage),
}

fn is_stop(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key_event)
            if key_event.code == KeyCode::Char('c')
                && key_event.modifiers == KeyModifiers::CONTROL
    )
}

pub struct ShelftuiApp<S> {
    catalog: Catalog,
    page: Page,
    history: Vec<Page>,
    reading_positions: S,
    message_tx: mpsc::Sender<Message>,
    message_rx: mpsc::Receiver<Message>,
    is_finished: bool,
}

impl<S: ReadingPositions> ShelftuiApp<S> {
    pub fn new(catalog: Catalog, reading_positions: S) -> Self {
        let (message_tx, message_rx) = mpsc::channel(10);
        let page = Page::Shelf(ShelfPage::new(
            catalog.articles().to_vec(),
            message_tx.clone(),
        ));
        ShelftuiApp {
            catalog,
            page,
            history: vec![],
            reading_positions,
            message_tx,
            message_rx,
            is_finished: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;
        let mut events = event_pump::crossterm_events();
        while !self.is_finished {
            terminal.draw(|frame| self.view(frame))?;
            // The select must release its borrows before a handler runs.
            enum Inbound {
                Terminal(Option<Event>),
                App(Option<Message>),
            }
            let inbound = tokio::select! {
                event = events.recv() => Inbound::Terminal(event),
                message = self.message_rx.recv() => Inbound::App(message),
            };
            match inbound {
                Inbound::Terminal(Some(event)) => self.handle_event(&event).await,
                Inbound::App(Some(message)) => self.handle_message(message),
                // The terminal closed underneath us; there is nothing left to read.
                Inbound::Terminal(None) | Inbound::App(None) => break,
            }
        }
        ratatui::restore();
        Ok(())
    }

    fn navigate_to(&mut self, page: Page) {
        self.history.push(mem::replace(&mut self.page, page));
    }

    fn go_back(&mut self) {
        if let Page::Reader(reader) = &self.page {
            let article_id = reader.article_id().to_string();
            if let Err(e) = self
                .reading_positions
                .store_position(article_id, reader.scroll())
            {
                error!("Failed to store the reading position: {e:#}");
            }
        }
        if let Some(page) = self.history.pop() {
            self.page = page;
        }
    }

    fn show_article(&mut self, id: &str) {
        let Some(article) = self.catalog.get(id).cloned() else {
            error!("Unknown article id '{id}'");
            return;
        };
        let scroll = match self.reading_positions.get_position(id) {
            Ok(offset) => offset.unwrap_or(0),
            Err(e) => {
                error!("Failed to read the stored reading position: {e:#}");
                0
            }
        };
        let reader = ReaderPage::new(Rc::new(article), scroll, self.message_tx.clone());
        self.navigate_to(Page::Reader(reader));
    }

    pub fn view(&self, frame: &mut Frame) {
        match &self.page {
            Page::Shelf(shelf) => shelf.view(frame, frame.area()),
            Page::Reader(reader) => reader.view(frame, frame.area()),
        }
    }

    pub async fn handle_event(&mut self, event: &Event) {
        if is_stop(event) {
            self.is_finished = true;
            return;
        }
        match &mut self.page {
            Page::Shelf(shelf) => shelf.handle_event(event).await,
            Page::Reader(reader) => reader.handle_event(event).await,
        }
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::ShowArticle { id } => self.show_article(&id),
            Message::GoBack => self.go_back(),
        }
    }
}
