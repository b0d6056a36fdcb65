use crate::library::Article;
use crate::shelftui::Message;
use crossterm::event::{Event, KeyCode};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;
use std::rc::Rc;

const SCROLL_PAGE: u16 = 10;

pub struct ReaderPage {
    article: Rc<Article>,
    scroll: u16,
    message_tx: tokio::sync::mpsc::Sender<Message>,
}

impl ReaderPage {
    pub fn new(
        article: Rc<Article>,
        scroll: u16,
        message_tx: tokio::sync::mpsc::Sender<Message>,
    ) -> Self {
        ReaderPage {
            article,
            scroll,
            message_tx,
        }
    }

    pub fn article_id(&self) -> &str {
        &self.article.meta.id
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn scroll_down(&mut self, lines: u16) {
        // The paragraph clamps overshoot to blank space; cap at the body's
        // own line count so the offset stays meaningful when persisted.
        let max = self.article.body.lines().count() as u16;
        self.scroll = (self.scroll + lines).min(max);
    }

    fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub async fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key_event) = event {
            match key_event.code {
                KeyCode::Up => self.scroll_up(1),
                KeyCode::Down => self.scroll_down(1),
                KeyCode::PageUp => self.scroll_up(SCROLL_PAGE),
                KeyCode::PageDown => self.scroll_down(SCROLL_PAGE),
                KeyCode::Esc => {
                    self.message_tx.send(Message::GoBack).await.unwrap();
                }
                _ => {}
            }
        }
    }

    pub fn view(&self, frame: &mut Frame, area: Rect) {
        let title = Title::from(
            format!(
                " {} — {} ",
                self.article.meta.title, self.article.meta.topic
            )
            .bold(),
        );
        let footer = Title::from(Line::from(vec![
            Span::from("  Back <ESC>  "),
            Span::from("  Scroll <↑/↓/PgUp/PgDn>  "),
        ]));
        let block = Block::bordered()
            .title(title.alignment(Alignment::Center))
            .title(footer.position(Position::Bottom).alignment(Alignment::Center))
            .light_blue()
            .on_black();

        let lines: Vec<Line> = self.article.body.lines().map(Line::raw).collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap::default())
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Catalog;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn reader(scroll: u16) -> (ReaderPage, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(10);
        let article = Catalog::builtin().unwrap().get("java-basics").unwrap().clone();
        (ReaderPage::new(Rc::new(article), scroll, tx), rx)
    }

    #[tokio::test]
    async fn scrolling_up_stops_at_the_top() {
        let (mut page, _rx) = reader(1);
        page.handle_event(&key(KeyCode::Up)).await;
        page.handle_event(&key(KeyCode::Up)).await;
        assert_eq!(0, page.scroll());
    }

    #[tokio::test]
    async fn scrolling_down_stops_at_the_end_of_the_body() {
        let (mut page, _rx) = reader(0);
        let max = page.article.body.lines().count() as u16;
        for _ in 0..max + 20 {
            page.handle_event(&key(KeyCode::PageDown)).await;
        }
        assert_eq!(max, page.scroll());
    }

    #[tokio::test]
    async fn escape_requests_navigation_back_to_the_shelf() {
        let (mut page, mut rx) = reader(0);
        page.handle_event(&key(KeyCode::Esc)).await;
        assert!(matches!(rx.recv().await, Some(Message::GoBack)));
    }

    #[tokio::test]
    async fn the_reader_opens_at_the_given_position() {
        let (page, _rx) = reader(7);
        assert_eq!(7, page.scroll());
        assert_eq!("java-basics", page.article_id());
    }
}
