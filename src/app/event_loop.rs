use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::menu::MenuBar;
use crate::preview::PreviewSync;
use crate::session::EditorSession;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu definition is invalid, the terminal
    /// cannot be initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let menu_bar = MenuBar::default_menu().context("Failed to load the menu definition")?;
        let session = EditorSession::with_history_limit(&self.initial_text, self.history_limit);

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - htmlpad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);
        crate::perf::log_event(
            "init.layout",
            format!("terminal={}x{}", size.width, size.height),
        );

        let mut model = Model::new(
            session,
            menu_bar,
            self.file_path.clone(),
            (size.width, size.height),
        );
        if let Some(notice) = &self.startup_notice {
            model.show_toast(ToastLevel::Warning, notice.clone());
        }

        let mut preview = self
            .preview
            .as_ref()
            .map(|(path, delay_ms)| PreviewSync::new(path.clone(), *delay_ms));

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse and paste reporting")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model, preview.as_mut()));

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Apply one message and everything it queued.
    fn step(model: &mut Model, msg: Message, now_ms: u64, preview: Option<&mut PreviewSync>) {
        *model = update(std::mem::take(model), msg);
        Self::handle_pending_io(model);
        if model.take_preview_stale()
            && let Some(preview) = preview
        {
            preview.notify(now_ms);
        }
    }

    fn flush_preview(model: &mut Model, preview: &mut PreviewSync, now_ms: u64) -> bool {
        match preview.poll(now_ms, || model.session.text()) {
            Ok(written) => written,
            Err(err) => {
                tracing::warn!(path = %preview.path().display(), %err, "preview write failed");
                model.show_toast(ToastLevel::Warning, format!("Preview write failed: {err}"));
                true
            }
        }
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        mut preview: Option<&mut PreviewSync>,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        // The preview starts out showing the loaded document.
        if let Some(preview) = preview.as_deref_mut() {
            preview.notify(0);
            Self::flush_preview(model, preview, u64::MAX);
        }

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if let Some(preview) = preview.as_deref_mut()
                && preview.is_pending()
                && Self::flush_preview(model, preview, elapsed_ms())
            {
                needs_render = true;
            }

            // Handle events
            let preview_pending = preview.as_deref().is_some_and(PreviewSync::is_pending);
            let poll_ms = if needs_render {
                0
            } else if preview_pending {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = elapsed_ms();
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    Self::step(model, msg, event_ms, preview.as_deref_mut());
                    needs_render = true;
                }

                // Coalesce key repeat bursts and pastes into a single render.
                let mut drained = 0_u32;
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    let drain_ms = elapsed_ms();
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        drained += 1;
                        Self::step(model, msg, drain_ms, preview.as_deref_mut());
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} viewport={}..{}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.viewport.offset(),
                        model.viewport.offset() + model.viewport.height() as usize,
                    ),
                );
                needs_render = false;
            }
        }

        // Do not lose the last edits if the app exits inside the quiet period.
        if let Some(preview) = preview
            && preview.is_pending()
        {
            Self::flush_preview(model, preview, u64::MAX);
        }
        Ok(())
    }
}
