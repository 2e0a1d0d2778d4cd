use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::model::Screen;
use crate::app::{App, Message, Model};
use crate::editor::{Direction, EditorInput, Field, ViewMode};

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model, now_ms: u64) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Self::handle_key(*key, model, now_ms)
            }
            Event::Paste(text) if model.screen == Screen::Editor && !model.help_visible => {
                Some(Message::Edit(EditorInput::Paste(text.clone()), now_ms))
            }
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model, now_ms: u64) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::ShowScreen(Screen::Editor)),
            KeyCode::F(3) => return Some(Message::ShowScreen(Screen::Posts)),
            KeyCode::F(4) => return Some(Message::ShowScreen(Screen::Login)),
            KeyCode::PageUp => return Some(Message::PageUp),
            KeyCode::PageDown => return Some(Message::PageDown),
            _ => {}
        }

        match model.screen {
            Screen::Editor => Self::handle_editor_key(key, model, now_ms),
            Screen::Posts => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
                KeyCode::Char('?') => Some(Message::ToggleHelp),
                KeyCode::Char('q') => Some(Message::Quit),
                _ => None,
            },
            Screen::Login => match key.code {
                KeyCode::Char('?') => Some(Message::ToggleHelp),
                KeyCode::Char('q') => Some(Message::Quit),
                _ => None,
            },
        }
    }

    fn handle_editor_key(key: KeyEvent, model: &Model, now_ms: u64) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        if ctrl {
            return match key.code {
                KeyCode::Char('p') => Some(Message::ToggleMode),
                KeyCode::Char('s') => Some(Message::Publish),
                KeyCode::Char('d') => Some(Message::Delete),
                _ => None,
            };
        }

        let previewing_body =
            model.editor.mode() == ViewMode::Preview && model.editor.focus() == Field::Content;
        let edit = |input| Some(Message::Edit(input, now_ms));
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => Some(Message::FocusNext),
            KeyCode::Up if previewing_body => Some(Message::ScrollUp(1)),
            KeyCode::Down if previewing_body => Some(Message::ScrollDown(1)),
            KeyCode::Char(c) if !alt => edit(EditorInput::Char(c)),
            KeyCode::Enter => edit(EditorInput::Newline),
            KeyCode::Backspace => edit(EditorInput::DeleteBack),
            KeyCode::Delete => edit(EditorInput::DeleteForward),
            KeyCode::Left => edit(EditorInput::Move(Direction::Left)),
            KeyCode::Right => edit(EditorInput::Move(Direction::Right)),
            KeyCode::Up => edit(EditorInput::Move(Direction::Up)),
            KeyCode::Down => edit(EditorInput::Move(Direction::Down)),
            KeyCode::Home => edit(EditorInput::Home),
            KeyCode::End => edit(EditorInput::End),
            _ => None,
        }
    }
}
