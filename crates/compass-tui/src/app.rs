use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;
use compass_core::controller::{self, OutputPanel};
use compass_core::{AnalysisClient, AnalyzeError, EndpointSource, Insight, PanelContent, Query, QueryAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,  // Query editor
    Button, // [ Analyze ]
}

/// The results panel: what it shows and how far it is scrolled.
#[derive(Debug)]
pub struct ResultsPanel {
    pub content: PanelContent,
    pub scroll: u16,
    pub height: u16,      // Inner height, updated during render
    pub total_lines: u16, // Wrapped rows, updated during render
}

impl ResultsPanel {
    fn new() -> Self {
        Self {
            content: PanelContent::Placeholder,
            scroll: 0,
            height: 0,
            total_lines: 0,
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.total_lines.saturating_sub(self.height)
    }
}

impl OutputPanel for ResultsPanel {
    fn show(&mut self, content: PanelContent) {
        self.content = content;
        self.scroll = 0;
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,

    // Query editor
    pub query_input: String,
    pub query_cursor: usize, // cursor position in query_input, in chars

    // Output
    pub results: ResultsPanel,
    pub in_flight: usize, // requests spawned and not yet finished

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub input_area: Option<Rect>,
    pub button_area: Option<Rect>,
    pub results_area: Option<Rect>,

    // Analysis service
    pub analyzer: QueryAnalyzer<AnalysisClient>,
    pub endpoint_source: EndpointSource,
}

impl App {
    pub fn new(client: AnalysisClient, endpoint_source: EndpointSource) -> Self {
        let analyzer = QueryAnalyzer::new(client);
        let mut results = ResultsPanel::new();
        analyzer.initialize(&mut results);

        Self {
            should_quit: false,
            focus: FocusPane::Input,

            query_input: String::new(),
            query_cursor: 0,

            results,
            in_flight: 0,

            animation_frame: 0,

            input_area: None,
            button_area: None,
            results_area: None,

            analyzer,
            endpoint_source,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.analyzer.analyzer().endpoint()
    }

    /// Validate the editor text and switch the panel to loading.
    ///
    /// The editor keeps its text. Returns the query to send, if any.
    pub fn submit(&mut self) -> Option<Query> {
        let query = controller::begin(&self.query_input, &mut self.results)?;
        self.in_flight += 1;
        Some(query)
    }

    /// Render a finished request. Requests are not serialized, so whichever
    /// finishes last owns the panel.
    pub fn finish_analysis(&mut self, outcome: Result<Insight, AnalyzeError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        controller::finish(outcome, &mut self.results);
    }

    pub fn is_loading(&self) -> bool {
        self.results.content == PanelContent::Loading
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input => FocusPane::Button,
            FocusPane::Button => FocusPane::Input,
        };
    }

    // Editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
        self.query_input.insert(byte_pos, c);
        self.query_cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
            self.query_input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.query_input.chars().count();
        if self.query_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.query_input, self.query_cursor);
            self.query_input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.query_cursor = self.query_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.query_input.chars().count();
        self.query_cursor = (self.query_cursor + 1).min(char_count);
    }

    /// Move to the start of the current line.
    pub fn cursor_home(&mut self) {
        let (_, col) = self.cursor_row_col();
        self.query_cursor -= col;
    }

    /// Move to the end of the current line.
    pub fn cursor_end(&mut self) {
        let rest = self
            .query_input
            .chars()
            .skip(self.query_cursor)
            .take_while(|&c| c != '\n')
            .count();
        self.query_cursor += rest;
    }

    /// Zero-based (line, column) of the cursor, in chars.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.query_input.chars().take(self.query_cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    /// Terminal column of the cursor within its line; wide chars take two cells.
    pub fn cursor_display_col(&self) -> usize {
        let (_, col) = self.cursor_row_col();
        let line_start = self.query_cursor - col;
        self.query_input
            .chars()
            .skip(line_start)
            .take(col)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    // Results scrolling
    pub fn scroll_down(&mut self) {
        self.results.scroll = self.results.scroll.saturating_add(1).min(self.results.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.results.scroll = self.results.scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.results.height.max(1);
        self.results.scroll = self.results.scroll.saturating_add(page).min(self.results.max_scroll());
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.results.height.max(1);
        self.results.scroll = self.results.scroll.saturating_sub(page);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
