use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use compass_core::panel::{FAILURE_HEADLINE, LOADING_GLYPH, LOADING_TEXT, PLACEHOLDER_TEXT, VALIDATION_TEXT};
use compass_core::render::insight_lines;
use compass_core::PanelContent;
use unicode_width::UnicodeWidthChar;
use crate::app::{App, FocusPane};

const MAX_INPUT_LINES: u16 = 6;
const BUTTON_WIDTH: u16 = 13;

/// Convert an insight report to styled lines: `**bold**` spans get the bold
/// modifier and every `\n` starts a new line.
fn insight_text(report: &str) -> Text<'static> {
    let lines: Vec<Line<'static>> = insight_lines(report)
        .into_iter()
        .map(|segments| {
            let spans: Vec<Span<'static>> = segments
                .into_iter()
                .map(|segment| {
                    if segment.bold {
                        Span::styled(segment.text, Style::default().add_modifier(Modifier::BOLD))
                    } else {
                        Span::raw(segment.text)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}

fn panel_text(app: &App) -> Text<'static> {
    match &app.results.content {
        PanelContent::Placeholder => Text::from(Span::styled(
            PLACEHOLDER_TEXT,
            Style::default().fg(Color::DarkGray),
        )),
        PanelContent::ValidationWarning => Text::from(Span::styled(
            VALIDATION_TEXT,
            Style::default().fg(Color::Red),
        )),
        PanelContent::Loading => {
            // Animated ellipsis: cycles through ".", "..", "..."
            let base = LOADING_TEXT.trim_end_matches('.');
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            Text::from(Line::from(vec![
                Span::styled(
                    format!("{}{:<3} ", base, dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ),
                Span::raw(LOADING_GLYPH),
            ]))
        }
        PanelContent::Insight(insight) => insight_text(insight.report()),
        PanelContent::Failure { detail } => {
            let mut lines = vec![Line::from(Span::styled(
                FAILURE_HEADLINE,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))];
            for line in detail.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
                )));
            }
            Text::from(lines)
        }
    }
}

/// Chars of `line` visible in a window `width` columns wide that starts
/// `offset` display columns in.
fn visible_columns(line: &str, offset: usize, width: usize) -> String {
    let mut skipped = 0;
    let mut used = 0;
    let mut visible = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if skipped < offset {
            skipped += w;
            continue;
        }
        if used + w > width {
            break;
        }
        used += w;
        visible.push(c);
    }
    visible
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let input_lines = (app.query_input.split('\n').count() as u16).clamp(1, MAX_INPUT_LINES);

    // Main layout: header, results, input row, footer
    let [header_area, results_area, input_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(input_lines + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    let [input_area, button_area] = Layout::horizontal([
        Constraint::Min(10),
        Constraint::Length(BUTTON_WIDTH),
    ])
    .areas(input_row);

    // Store areas for mouse hit-testing
    app.results_area = Some(results_area);
    app.input_area = Some(input_area);
    app.button_area = Some(button_area);

    render_header(app, frame, header_area);
    render_results(app, frame, results_area);
    render_input(app, frame, input_area);
    render_button(app, frame, button_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let pending = if app.in_flight > 1 {
        format!(" [{} pending]", app.in_flight)
    } else {
        String::new()
    };

    let title = Line::from(vec![
        Span::styled(" Conceptual Compass ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.endpoint().to_string(), Style::default().fg(Color::Gray)),
        Span::styled(
            format!(" ({})", app.endpoint_source.as_str()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
        Span::styled(pending, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_color = if app.results.content.is_error() {
        Color::Red
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Insight ");

    let paragraph = Paragraph::new(panel_text(app)).wrap(Wrap { trim: false });

    // Store dimensions for scroll clamping (inner size minus borders).
    // Rows are counted before the block is attached so only the text is measured.
    app.results.height = area.height.saturating_sub(2);
    let rows = paragraph.line_count(area.width.saturating_sub(2));
    app.results.total_lines = u16::try_from(rows).unwrap_or(u16::MAX);
    app.results.scroll = app.results.scroll.min(app.results.max_scroll());

    let paragraph = paragraph.block(block).scroll((app.results.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Input;
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Query (Enter to analyze, Shift+Enter for new line) ");

    // Scroll both ways to keep the cursor visible; columns are display cells
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, _) = app.cursor_row_col();
    let cursor_col = app.cursor_display_col();

    let col_offset = if inner_width == 0 || cursor_col < inner_width {
        0
    } else {
        cursor_col - inner_width + 1
    };
    let row_offset = if inner_height == 0 || row < inner_height {
        0
    } else {
        row - inner_height + 1
    };

    let visible: Vec<Line> = app
        .query_input
        .split('\n')
        .skip(row_offset)
        .take(inner_height)
        .map(|line| Line::from(visible_columns(line, col_offset, inner_width)))
        .collect();

    let input = Paragraph::new(visible)
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(input, area);

    if focused {
        frame.set_cursor_position((
            area.x + (cursor_col - col_offset) as u16 + 1,
            area.y + (row - row_offset) as u16 + 1,
        ));
    }
}

fn render_button(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Button;
    let style = if focused {
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

    let button = Paragraph::new(Line::from(Span::styled(" Analyze ", style)).centered()).block(block);
    frame.render_widget(button, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode = match app.focus {
        FocusPane::Input => Span::styled(" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black).bold()),
        FocusPane::Button => Span::styled(" BUTTON ", Style::default().bg(Color::Cyan).fg(Color::Black).bold()),
    };

    let hints = Span::styled(
        " Enter: analyze | Shift+Enter: newline | Tab: focus | Up/Down PgUp/PgDn: scroll | Esc: quit",
        Style::default().fg(Color::DarkGray),
    );

    frame.render_widget(Paragraph::new(Line::from(vec![mode, hints])), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::{AnalysisClient, EndpointSource, Insight};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_insight_text_styles_bold_spans() {
        let text = insight_text("**Bold** and\nline2");
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans[0].content, "Bold");
        assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(text.lines[0].spans[1].content, " and");
        assert_eq!(text.lines[1].spans[0].content, "line2");
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_visible_columns_counts_display_width() {
        assert_eq!(visible_columns("abcdef", 2, 3), "cde");
        assert_eq!(visible_columns("你好世界", 2, 4), "好世");
        // A wide char never straddles the right edge
        assert_eq!(visible_columns("a你好", 0, 2), "a");
    }

    #[test]
    fn test_input_cursor_sits_after_wide_chars() {
        let mut app = App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        );
        app.insert_char('你');
        app.insert_char('好');
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let input = app.input_area.unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor.x, input.x + 1 + 4);
        assert_eq!(cursor.y, input.y + 1);
    }

    #[test]
    fn test_long_report_scrolls_to_last_word() {
        let mut app = App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        );
        let mut report: Vec<String> = (0..40).map(|i| format!("word{:02}xxxxxx", i)).collect();
        report.push("ENDMARK".to_string());
        app.finish_analysis(Ok(Insight::new(report.join(" "))));

        let mut terminal = Terminal::new(TestBackend::new(30, 14)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(!screen(&terminal).contains("ENDMARK"));

        for _ in 0..200 {
            app.scroll_page_down();
        }
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(screen(&terminal).contains("ENDMARK"));
        assert_eq!(app.results.scroll, app.results.max_scroll());
    }

    #[test]
    fn test_header_source_label_is_readable() {
        let mut app = App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let header: String = buffer.content[..100].iter().map(|cell| cell.symbol()).collect();
        let x = header.find("(default)").unwrap();
        assert_eq!(buffer.content[x].fg, Color::Gray);
        assert_eq!(buffer.content[x].bg, Color::DarkGray);
    }

    #[test]
    fn test_render_draws_placeholder_and_records_areas() {
        let mut app = App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains(PLACEHOLDER_TEXT));
        assert!(screen.contains("Analyze"));
        assert!(app.button_area.is_some());
        assert_eq!(app.button_area.unwrap().width, BUTTON_WIDTH);
    }

    #[test]
    fn test_render_failure_panel() {
        let mut app = App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        );
        app.finish_analysis(Err(compass_core::AnalyzeError::Application(
            "quota exceeded".into(),
        )));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains(FAILURE_HEADLINE));
        assert!(screen.contains("quota exceeded"));

        app.finish_analysis(Ok(Insight::new("done")));
        assert!(!app.results.content.is_error());
    }
}
