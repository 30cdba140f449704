use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use compass_core::Query;
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

/// What the event loop has to do after an event was applied to the app.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// Send this query to the analysis endpoint.
    Submit(Query),
}

impl From<Option<Query>> for Action {
    fn from(query: Option<Query>) -> Self {
        query.map_or(Action::None, Action::Submit)
    }
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Action {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => Action::None,
        AppEvent::Tick => {
            app.tick_animation();
            Action::None
        }
        AppEvent::AnalysisFinished(outcome) => {
            app.finish_analysis(outcome);
            Action::None
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    // Global keys that work in any pane
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return Action::None;
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return Action::None;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return Action::None;
        }
        KeyCode::Up => {
            app.scroll_up();
            return Action::None;
        }
        KeyCode::Down => {
            app.scroll_down();
            return Action::None;
        }
        KeyCode::PageUp => {
            app.scroll_page_up();
            return Action::None;
        }
        KeyCode::PageDown => {
            app.scroll_page_down();
            return Action::None;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::Input => handle_input_key(app, key),
        FocusPane::Button => handle_button_key(app, key),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        // Shift+Enter is a literal newline; plain Enter submits instead of inserting one
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.insert_newline();
            Action::None
        }
        KeyCode::Enter => app.submit().into(),
        KeyCode::Backspace => {
            app.backspace();
            Action::None
        }
        KeyCode::Delete => {
            app.delete();
            Action::None
        }
        KeyCode::Left => {
            app.cursor_left();
            Action::None
        }
        KeyCode::Right => {
            app.cursor_right();
            Action::None
        }
        KeyCode::Home => {
            app.cursor_home();
            Action::None
        }
        KeyCode::End => {
            app.cursor_end();
            Action::None
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.insert_char(c);
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_button_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.submit().into(),
        _ => Action::None,
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Action {
    let x = mouse.column;
    let y = mouse.row;

    let in_results = app.results_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_input = app.input_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_button = app.button_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if in_button {
                app.focus = FocusPane::Button;
                return app.submit().into();
            }
            if in_input {
                app.focus = FocusPane::Input;
            }
        }
        MouseEventKind::ScrollDown if in_results => {
            app.scroll_down();
            app.scroll_down();
            app.scroll_down();
        }
        MouseEventKind::ScrollUp if in_results => {
            app.scroll_up();
            app.scroll_up();
            app.scroll_up();
        }
        _ => {}
    }
    Action::None
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::{AnalysisClient, AnalyzeError, EndpointSource, Insight, PanelContent};

    fn app() -> App {
        App::new(
            AnalysisClient::new("http://127.0.0.1:5000/analyze"),
            EndpointSource::Default,
        )
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let action = handle_event(app, key(KeyCode::Char(c), KeyModifiers::NONE));
            assert_eq!(action, Action::None);
        }
    }

    fn click(app: &mut App, column: u16, row: u16) -> Action {
        handle_event(
            app,
            AppEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }),
        )
    }

    #[test]
    fn test_enter_submits_once_without_newline() {
        let mut app = app();
        type_text(&mut app, "  why am I stuck? ");

        let action = handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(action, Action::Submit(Query::parse("why am I stuck?").unwrap()));
        assert_eq!(app.query_input, "  why am I stuck? ");
        assert!(!app.query_input.contains('\n'));
        assert_eq!(app.in_flight, 1);
        assert_eq!(app.results.content, PanelContent::Loading);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = app();
        type_text(&mut app, "line one");

        let action = handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut app, "line two");

        assert_eq!(action, Action::None);
        assert_eq!(app.query_input, "line one\nline two");
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.results.content, PanelContent::Placeholder);

        let action = handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, Action::Submit(Query::parse("line one\nline two").unwrap()));
    }

    #[test]
    fn test_blank_input_shows_warning_without_request() {
        let mut app = app();
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT));

        let action = handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(action, Action::None);
        assert_eq!(app.in_flight, 0);
        assert_eq!(app.results.content, PanelContent::ValidationWarning);
    }

    #[test]
    fn test_button_activation_matches_enter() {
        let mut app = app();
        type_text(&mut app, "focus");

        handle_event(&mut app, key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus, FocusPane::Button);

        // Typing while the button is focused does nothing
        let action = handle_event(&mut app, key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(action, Action::None);
        assert_eq!(app.query_input, "focus");

        let action = handle_event(&mut app, key(KeyCode::Char(' '), KeyModifiers::NONE));
        assert_eq!(action, Action::Submit(Query::parse("focus").unwrap()));
    }

    #[test]
    fn test_click_on_button_submits() {
        let mut app = app();
        app.button_area = Some(Rect::new(60, 20, 13, 3));
        app.input_area = Some(Rect::new(0, 20, 60, 3));
        type_text(&mut app, "clicked");

        assert_eq!(click(&mut app, 5, 21), Action::None);
        assert_eq!(click(&mut app, 65, 21), Action::Submit(Query::parse("clicked").unwrap()));
        assert_eq!(app.focus, FocusPane::Button);

        click(&mut app, 5, 21);
        assert_eq!(app.focus, FocusPane::Input);
    }

    #[test]
    fn test_finished_analysis_renders_outcome() {
        let mut app = app();
        type_text(&mut app, "q");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        handle_event(
            &mut app,
            AppEvent::AnalysisFinished(Err(AnalyzeError::Application("quota exceeded".into()))),
        );
        assert_eq!(
            app.results.content,
            PanelContent::Failure { detail: "quota exceeded".to_string() }
        );

        handle_event(&mut app, AppEvent::AnalysisFinished(Ok(Insight::new("**ok**"))));
        assert_eq!(app.results.content, PanelContent::Insight(Insight::new("**ok**")));
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.query_input.is_empty());

        let mut app = self::app();
        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }
}
