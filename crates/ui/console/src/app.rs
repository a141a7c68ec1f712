use color_eyre::Result;
use crossterm::event::KeyCode;
use tokio::sync::mpsc;
use tracing::{error, info};

use submit::{build_payload, Client, SubmitConfig};

use crate::{
    action::{Action, SubmitOutcome},
    catalog::Screen,
    components::Component,
    form_view::FormView,
    records_view::RecordsView,
    tui::{Event, EventResponse, Tui},
};

/// Main loop: one form screen bound to one endpoint, with a toggleable
/// read-only record list. All state mutation happens on this task in
/// response to events; the only asynchronous suspension points are the
/// network calls, whose continuations arrive back as actions.
pub struct App {
    client: Client,
    form: FormView,
    records: RecordsView,
    show_records: bool,
    should_quit: bool,
}

impl App {
    pub fn new(screen: Screen, submit_config: SubmitConfig) -> Self {
        let title = screen.schema.name.clone();
        Self {
            client: Client::new(submit_config),
            form: FormView::new(screen.schema, screen.endpoint),
            records: RecordsView::new(title),
            show_records: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = Tui::new()?;
        tui.enter()?;

        loop {
            if let Some(e) = tui.next().await {
                let active: &mut dyn Component = if self.show_records {
                    &mut self.records
                } else {
                    &mut self.form
                };
                let consumed = match active.handle_events(e.clone())? {
                    Some(EventResponse::Continue(action)) => {
                        action_tx.send(action).ok();
                        false
                    }
                    Some(EventResponse::Stop(action)) => {
                        action_tx.send(action).ok();
                        true
                    }
                    None => false,
                };

                if !consumed {
                    match e {
                        Event::Quit => {
                            action_tx.send(Action::Quit).ok();
                        }
                        Event::Tick => {
                            action_tx.send(Action::Tick).ok();
                        }
                        Event::Render => {
                            action_tx.send(Action::Render).ok();
                        }
                        Event::Resize(x, y) => {
                            action_tx.send(Action::Resize(x, y)).ok();
                        }
                        Event::Key(key) => match key.code {
                            KeyCode::Char('q') => {
                                action_tx.send(Action::Quit).ok();
                            }
                            KeyCode::F(2) => {
                                action_tx.send(Action::ToggleRecords).ok();
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                match action {
                    Action::Quit => {
                        self.should_quit = true;
                    }
                    Action::Render | Action::Resize(..) => {
                        self.draw(&mut tui)?;
                    }
                    Action::SnapshotReady(snapshot) => {
                        // Serialize on this thread; only the request itself
                        // is offloaded. A user who quits before the response
                        // simply never sees the discarded result.
                        let payload = build_payload(self.form.schema(), &snapshot);
                        let client = self.client.clone();
                        let endpoint = self.form.endpoint().to_string();
                        let tx = action_tx.clone();
                        tokio::spawn(async move {
                            let outcome = match client.submit(&endpoint, payload).await {
                                Ok(body) => {
                                    info!(%endpoint, "submission accepted");
                                    SubmitOutcome::Accepted(body)
                                }
                                Err(e) => {
                                    error!(%endpoint, "submission failed: {e}");
                                    SubmitOutcome::Rejected(e.user_message())
                                }
                            };
                            tx.send(Action::SubmissionFinished(outcome)).ok();
                        });
                    }
                    Action::ToggleRecords => {
                        self.show_records = !self.show_records;
                        if self.show_records {
                            self.records = RecordsView::new(self.form.schema().name.clone());
                            let client = self.client.clone();
                            let endpoint = self.form.endpoint().to_string();
                            let tx = action_tx.clone();
                            tokio::spawn(async move {
                                match client.fetch_records(&endpoint).await {
                                    Ok(records) => {
                                        tx.send(Action::RecordsLoaded(records)).ok();
                                    }
                                    Err(e) => {
                                        error!(%endpoint, "list fetch failed: {e}");
                                        tx.send(Action::RecordsFailed(e.user_message())).ok();
                                    }
                                }
                            });
                        }
                        self.draw(&mut tui)?;
                    }
                    Action::RecordsFailed(message) => {
                        self.on_records_failed(message);
                        self.draw(&mut tui)?;
                    }
                    other => {
                        let next = if self.show_records {
                            self.records.update(other.clone())?
                        } else {
                            None
                        };
                        if let Some(next) = next {
                            action_tx.send(next).ok();
                        }
                        if let Some(next) = self.form.update(other)? {
                            action_tx.send(next).ok();
                        }
                    }
                }
            }

            if self.should_quit {
                tui.stop();
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Failed records fetch, possibly arriving after the user already
    /// closed the view. Closes and reports; never reopens or refetches.
    fn on_records_failed(&mut self, message: String) {
        self.show_records = false;
        self.form.update(Action::Error(message)).ok();
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let mut result = Ok(());
        tui.draw(|f| {
            let area = f.area();
            result = if self.show_records {
                self.records.draw(f, area)
            } else {
                self.form.draw(f, area)
            };
        })?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use forms::NoticeKind;
    use pretty_assertions::assert_eq;

    fn contact_app() -> App {
        let screen = catalog::contact_screen().unwrap();
        App::new(screen, SubmitConfig::default())
    }

    #[test]
    fn fetch_failure_closes_records_and_surfaces_message() {
        let mut app = contact_app();
        app.show_records = true;

        app.on_records_failed("list fetch failed with status 500".into());
        assert!(!app.show_records);
        let notice = app.form.state().notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "list fetch failed with status 500");
    }

    #[test]
    fn late_fetch_failure_never_reopens_records() {
        // The user closed the view while the request was in flight; the
        // stale continuation must leave it closed.
        let mut app = contact_app();
        app.show_records = false;

        app.on_records_failed("backend unreachable".into());
        assert!(!app.show_records);
    }
}
