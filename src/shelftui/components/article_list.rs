use crate::library::Article;
use crate::shelftui::components::filter::{EntryView, IncrementalFilter};
use crate::shelftui::Message;
use crossterm::event::{Event, KeyCode};
use log::error;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Paragraph, Row, Table, TableState};
use ratatui::Frame;
use std::rc::Rc;
use tui_input::Input;

/// In-memory entry collection backing the shelf table. Labels are article
/// titles; a hidden flag hides the corresponding row.
pub struct ArticleEntries {
    labels: Vec<String>,
    visible: Vec<bool>,
}

impl ArticleEntries {
    fn new(labels: Vec<String>) -> Self {
        let visible = vec![true; labels.len()];
        ArticleEntries { labels, visible }
    }

    fn is_visible(&self, entry: usize) -> bool {
        self.visible[entry]
    }
}

impl EntryView for ArticleEntries {
    fn entry_count(&self) -> usize {
        self.labels.len()
    }

    fn label(&self, entry: usize) -> String {
        self.labels[entry].clone()
    }

    fn set_visible(&mut self, entry: usize, visible: bool) {
        self.visible[entry] = visible;
    }
}

enum SearchMode {
    Hidden,
    Editing,
    Applied,
}

struct TableColumn {
    header: String,
    width: Constraint,
    get_value: Box<dyn Fn(&Article) -> String>,
}

impl TableColumn {
    fn new(header: &str, width: Constraint, get_value: Box<dyn Fn(&Article) -> String>) -> Self {
        TableColumn {
            header: header.to_string(),
            width,
            get_value,
        }
    }
}

pub struct ShelfPage {
    columns: Vec<TableColumn>,
    articles: Vec<Rc<Article>>,
    filter: Option<IncrementalFilter<ArticleEntries>>,
    search_mode: SearchMode,
    selected: Option<usize>,
    message_tx: tokio::sync::mpsc::Sender<Message>,
}

impl ShelfPage {
    pub fn new(articles: Vec<Article>, message_tx: tokio::sync::mpsc::Sender<Message>) -> Self {
        let articles: Vec<Rc<Article>> = articles.into_iter().map(Rc::new).collect();
        let columns = vec![
            TableColumn::new(
                "Title",
                Constraint::Ratio(2, 8),
                Box::new(|a: &Article| a.meta.title.clone()),
            ),
            TableColumn::new(
                "Topic",
                Constraint::Ratio(2, 8),
                Box::new(|a| a.meta.topic.clone()),
            ),
            TableColumn::new(
                "Published",
                Constraint::Ratio(1, 8),
                Box::new(|a| a.meta.published.format("%Y-%m-%d").to_string()),
            ),
            TableColumn::new(
                "Summary",
                Constraint::Ratio(3, 8),
                Box::new(|a| a.meta.summary.clone()),
            ),
        ];

        let labels: Vec<String> = articles.iter().map(|a| a.meta.title.clone()).collect();
        let filter = match IncrementalFilter::attach(Some(Input::default()), ArticleEntries::new(labels)) {
            Ok(filter) => Some(filter),
            Err(e) => {
                error!("Search is unavailable: {e}");
                None
            }
        };

        let selected = if articles.is_empty() { None } else { Some(0) };
        ShelfPage {
            columns,
            articles,
            filter,
            search_mode: SearchMode::Hidden,
            selected,
            message_tx,
        }
    }

    fn visible_rows(&self) -> Vec<usize> {
        match &self.filter {
            Some(filter) => (0..self.articles.len())
                .filter(|i| filter.entries().is_visible(*i))
                .collect(),
            None => (0..self.articles.len()).collect(),
        }
    }

    fn selected_article(&self) -> Option<Rc<Article>> {
        let rows = self.visible_rows();
        self.selected
            .and_then(|i| rows.get(i))
            .and_then(|row| self.articles.get(*row))
            .cloned()
    }

    fn reset_selection(&mut self) {
        self.selected = if self.visible_rows().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn select_next(&mut self) {
        if let Some(selected) = self.selected {
            if selected + 1 < self.visible_rows().len() {
                self.selected = Some(selected + 1);
            }
        }
    }

    fn select_previous(&mut self) {
        if let Some(selected) = self.selected {
            if selected > 0 {
                self.selected = Some(selected - 1);
            }
        }
    }

    fn show_search(&mut self) {
        if self.filter.is_some() {
            self.search_mode = SearchMode::Editing;
        }
    }

    fn clear_search(&mut self) {
        if let Some(filter) = &mut self.filter {
            filter.clear();
        }
        self.search_mode = SearchMode::Hidden;
        self.reset_selection();
    }

    pub async fn handle_event(&mut self, event: &Event) {
        if let SearchMode::Editing = self.search_mode {
            if let Event::Key(key_event) = event {
                match key_event.code {
                    KeyCode::Enter => {
                        self.search_mode = SearchMode::Applied;
                        return;
                    }
                    KeyCode::Esc => {
                        self.clear_search();
                        return;
                    }
                    _ => {}
                }
            }
            if let Some(filter) = &mut self.filter {
                filter.handle_event(event);
            }
            self.reset_selection();
            return;
        }

        if let Event::Key(key_event) = event {
            match key_event.code {
                KeyCode::Char('/') => self.show_search(),
                KeyCode::Esc => {
                    if let SearchMode::Applied = self.search_mode {
                        self.clear_search();
                    }
                }
                KeyCode::Up => self.select_previous(),
                KeyCode::Down => self.select_next(),
                KeyCode::Enter => {
                    if let Some(article) = self.selected_article() {
                        self.message_tx
                            .send(Message::ShowArticle {
                                id: article.meta.id.clone(),
                            })
                            .await
                            .unwrap();
                    }
                }
                _ => {}
            }
        }
    }

    fn instructions(&self) -> Title {
        let mut spans = vec![
            Span::from("  Quit <Ctrl + C>  "),
            Span::from("  Search </>  "),
            Span::from("  Read <⏎>  "),
        ];
        if !matches!(self.search_mode, SearchMode::Hidden) {
            spans.push(Span::from("  Clear <ESC>  "));
        }
        Title::from(Line::from(spans))
    }

    fn table(&self) -> Table {
        let title = Title::from("Articles".bold());

        let rows: Vec<Row> = self
            .visible_rows()
            .into_iter()
            .map(|row| {
                let article = self.articles[row].as_ref();
                self.columns
                    .iter()
                    .map(|c| (c.get_value)(article))
                    .collect()
            })
            .collect();

        let block = Block::bordered()
            .title(title.alignment(Alignment::Center))
            .title(
                self.instructions()
                    .position(Position::Bottom)
                    .alignment(Alignment::Center),
            )
            .light_blue()
            .bg(Color::Black);
        let header_items: Vec<Span> = self
            .columns
            .iter()
            .map(|c| c.header.clone().bold().fg(Color::White))
            .collect();
        let header = Row::new(header_items);

        let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();
        Table::new(rows, widths)
            .header(header)
            .highlight_style(Style::new().reversed())
            .block(block)
    }

    pub fn view(&self, frame: &mut Frame, area: Rect) {
        let search_height = if matches!(self.search_mode, SearchMode::Hidden) {
            Constraint::Length(0)
        } else {
            Constraint::Length(3)
        };
        let [search_area, table_area] =
            Layout::vertical([search_height, Constraint::Fill(1)]).areas(area);

        if let (Some(filter), false) = (
            &self.filter,
            matches!(self.search_mode, SearchMode::Hidden),
        ) {
            let block = Block::bordered().light_blue().on_black();
            let paragraph = Paragraph::new(format!("🔍 {}", filter.query()))
                .block(block)
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, search_area);
        }

        let mut table_state = TableState::new();
        table_state.select(self.selected);
        frame.render_stateful_widget(self.table(), table_area, &mut table_state);
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

    async fn type_text(page: &mut ShelfPage, text: &str) {
        for c in text.chars() {
            page.handle_event(&key(KeyCode::Char(c))).await;
        }
    }

    fn shelf() -> (ShelfPage, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(10);
        let articles = Catalog::builtin().unwrap().articles().to_vec();
        (ShelfPage::new(articles, tx), rx)
    }

    fn visible_titles(page: &ShelfPage) -> Vec<String> {
        page.visible_rows()
            .into_iter()
            .map(|row| page.articles[row].meta.title.clone())
            .collect()
    }

    #[tokio::test]
    async fn every_article_is_visible_before_any_search() {
        let (page, _rx) = shelf();
        assert_eq!(4, visible_titles(&page).len());
        assert_eq!(Some(0), page.selected);
    }

    #[tokio::test]
    async fn searching_narrows_the_table_to_matching_titles() {
        let (mut page, _rx) = shelf();
        page.handle_event(&key(KeyCode::Char('/'))).await;
        type_text(&mut page, "data").await;
        assert_eq!(vec!["Data Modeling 101"], visible_titles(&page));
        assert_eq!(Some(0), page.selected);
    }

    #[tokio::test]
    async fn a_search_matching_nothing_empties_the_table_and_selection() {
        let (mut page, _rx) = shelf();
        page.handle_event(&key(KeyCode::Char('/'))).await;
        type_text(&mut page, "ZZZ").await;
        assert!(visible_titles(&page).is_empty());
        assert_eq!(None, page.selected);
    }

    #[tokio::test]
    async fn escape_clears_an_applied_search() {
        let (mut page, _rx) = shelf();
        page.handle_event(&key(KeyCode::Char('/'))).await;
        type_text(&mut page, "java").await;
        page.handle_event(&key(KeyCode::Enter)).await;
        assert_eq!(vec!["Java Basics"], visible_titles(&page));

        page.handle_event(&key(KeyCode::Esc)).await;
        assert_eq!(4, visible_titles(&page).len());
    }

    #[tokio::test]
    async fn enter_on_a_row_requests_that_article() {
        let (mut page, mut rx) = shelf();
        page.handle_event(&key(KeyCode::Char('/'))).await;
        type_text(&mut page, "refactoring").await;
        page.handle_event(&key(KeyCode::Enter)).await;
        page.handle_event(&key(KeyCode::Enter)).await;

        match rx.recv().await {
            Some(Message::ShowArticle { id }) => assert_eq!("refactoring-code-smells", id),
            _ => panic!("Expected a ShowArticle message"),
        }
    }

    #[tokio::test]
    async fn selection_moves_only_across_visible_rows() {
        let (mut page, _rx) = shelf();
        page.handle_event(&key(KeyCode::Char('/'))).await;
        // "ing" matches Data Modeling 101 and Refactoring Code Smells.
        type_text(&mut page, "ing").await;
        page.handle_event(&key(KeyCode::Enter)).await;

        page.handle_event(&key(KeyCode::Down)).await;
        assert_eq!(Some(1), page.selected);
        page.handle_event(&key(KeyCode::Down)).await;
        assert_eq!(Some(1), page.selected);
        page.handle_event(&key(KeyCode::Up)).await;
        assert_eq!(Some(0), page.selected);
    }

    #[tokio::test]
    async fn an_empty_shelf_reports_the_missing_entries_and_stays_usable() {
        let (tx, _rx) = mpsc::channel(10);
        let mut page = ShelfPage::new(Vec::new(), tx);
        assert!(page.filter.is_none());
        assert_eq!(None, page.selected);

        // '/' must not activate a search that could not attach.
        page.handle_event(&key(KeyCode::Char('/'))).await;
        type_text(&mut page, "data").await;
        assert!(visible_titles(&page).is_empty());
    }
}
