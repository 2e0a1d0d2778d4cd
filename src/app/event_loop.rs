use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, SessionOutcome, update};
use crate::editor::PostEditor;
use crate::posts::post_cards;

use super::effects::host_callbacks;

/// Longest wait for terminal input when nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// How long to wait for input so the next debounce deadline is not missed.
pub(super) fn poll_timeout_ms(needs_render: bool, deadline: Option<u64>, now_ms: u64) -> u64 {
    if needs_render {
        return 0;
    }
    deadline.map_or(IDLE_POLL_MS, |deadline| {
        deadline.saturating_sub(now_ms).min(IDLE_POLL_MS)
    })
}

impl App {
    /// Run the main event loop.
    ///
    /// Returns the last publish or delete request made during the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or the event
    /// loop hits an I/O failure.
    pub fn run(&mut self) -> Result<Option<SessionOutcome>> {
        let (callbacks, host_events) = host_callbacks();
        let editor = PostEditor::mount(self.editor_options.clone(), callbacks);
        let cards = post_cards(&self.posts, &chrono::Local);

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; postdesk requires an interactive terminal")?;
        let size = terminal.size()?;
        let _ = execute!(stdout(), EnableBracketedPaste);

        let mut model = Model::new(editor, cards, (size.width, size.height))
            .with_host_events(host_events)
            .with_screen(self.screen);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        tracing::info!(screen = model.screen.label(), "session started");

        let result = Self::event_loop(&mut terminal, &mut model);

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result.map(|()| model.outcome.take())
    }

    fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = elapsed_ms(start);
            if model
                .editor
                .next_deadline()
                .is_some_and(|deadline| deadline <= now_ms)
            {
                Self::dispatch(model, Message::Tick(now_ms));
                needs_render = true;
            }

            let poll_ms = poll_timeout_ms(needs_render, model.editor.next_deadline(), now_ms);
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = elapsed_ms(start);
                if let Some(msg) = Self::handle_event(&event::read()?, model, event_ms) {
                    tracing::trace!(?msg, "message");
                    Self::dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = elapsed_ms(start);
                    if let Some(msg) = Self::handle_event(&event::read()?, model, drain_ms) {
                        Self::dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        tracing::info!(outcome = ?model.outcome, "session ended");
        Ok(())
    }
}
