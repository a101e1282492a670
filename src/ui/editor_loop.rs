//! Event loop for the full-screen sheet editor.
//!
//! The loop owns the [`App`] outright. Terminal input, finished enrichment
//! batches, autocomplete results and sync reports all arrive on channels and
//! are turned into [`AppAction`]s; the [`AppCommand`]s that come back are
//! handed to the background services.

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::enrich::{EnrichMessage, EnrichmentService};
use crate::api::RulesService;
use crate::character::sync::{SyncHandle, SyncStatus};
use crate::character::RosterError;
use crate::cli::CliContext;
use crate::core::app::{apply_action, App, AppAction, AppCommand, AppOptions};
use crate::ui::keybindings::{map_key_event, map_paste};
use crate::ui::lifecycle::{restore_terminal, setup_terminal};
use crate::ui::renderer::ui;

/// How often the loop wakes up with nothing to do, to expire the status line.
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Background services the editor's commands are carried out by.
struct CommandRunner {
    sync: SyncHandle,
    enricher: EnrichmentService,
    suggest_tx: mpsc::UnboundedSender<AppAction>,
}

impl CommandRunner {
    fn execute(&self, command: AppCommand) {
        match command {
            AppCommand::Persist(roster) => self.sync.submit(roster),
            AppCommand::Enrich {
                requests,
                cancel_token,
                batch_id,
            } => {
                debug!(batch_id, requests = requests.len(), "starting enrichment batch");
                self.enricher.spawn_batch(requests, cancel_token, batch_id);
            }
            AppCommand::Suggest {
                prefix,
                kind,
                limit,
            } => {
                let rules = Arc::clone(self.enricher.rules());
                let tx = self.suggest_tx.clone();
                tokio::spawn(async move {
                    let items = rules.suggest(&prefix, kind, limit).await;
                    let _ = tx.send(AppAction::SuggestionsLoaded { prefix, items });
                });
            }
            AppCommand::Quit => {}
        }
    }

    fn execute_all(&self, commands: impl IntoIterator<Item = AppCommand>) {
        for command in commands {
            self.execute(command);
        }
    }
}

/// Translate one terminal event. Key releases and repeats are ignored.
fn translate_event(app: &App, event: Event) -> Option<AppAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key_event(app, &key),
        Event::Paste(text) => map_paste(app, text),
        _ => None,
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Build the editor state for `ctx`, opening `name` if one was given.
fn bootstrap_app(ctx: &CliContext, name: Option<String>) -> Result<App, Box<dyn Error>> {
    let roster = ctx.load_roster()?;
    let mut options = AppOptions::from_config(&ctx.config, ctx.offline);
    if let Some(name) = name {
        if !roster.contains(&name) {
            return Err(RosterError::NotFound(name).into());
        }
        options.default_character = Some(name);
    }
    Ok(App::new(roster, options))
}

pub async fn run_editor(ctx: &CliContext, name: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut app = bootstrap_app(ctx, name)?;

    let rules = Arc::new(RulesService::from_config(&ctx.config, ctx.offline));
    let (enricher, mut enrich_rx) = EnrichmentService::new(rules);
    let (sync, mut sync_rx) =
        SyncHandle::spawn(Arc::new(ctx.store.clone()), ctx.config.sync_debounce());
    let (suggest_tx, mut suggest_rx) = mpsc::unbounded_channel();
    let runner = CommandRunner {
        sync,
        enricher,
        suggest_tx,
    };
    info!(
        characters = app.roster.len(),
        path = %ctx.store.path().display(),
        "editor started"
    );
    runner.execute_all(app.enrichment_command());

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let event_reader_handle = spawn_event_reader(event_tx);

    let mut request_redraw = true;
    let result: Result<(), Box<dyn Error>> = loop {
        if request_redraw {
            if let Err(err) = terminal.draw(|f| ui(f, &app)) {
                break Err(err.into());
            }
            request_redraw = false;
        }
        if app.should_quit {
            break Ok(());
        }

        let action = tokio::select! {
            Some(event) = event_rx.recv() => {
                if matches!(event, Event::Resize(..)) {
                    request_redraw = true;
                }
                translate_event(&app, event)
            }
            Some((message, batch_id)) = enrich_rx.recv() => match message {
                EnrichMessage::Tooltips(tooltips) => {
                    Some(AppAction::TooltipsLoaded { batch_id, tooltips })
                }
            },
            Some(action) = suggest_rx.recv() => Some(action),
            Some(status) = sync_rx.recv() => Some(AppAction::SyncReported(status)),
            _ = tokio::time::sleep(IDLE_TICK) => {
                if app.ui.expire_status(Instant::now()) {
                    request_redraw = true;
                }
                None
            }
        };

        if let Some(action) = action {
            runner.execute_all(apply_action(&mut app, action));
            request_redraw = true;
        }
    };

    event_reader_handle.abort();
    let CommandRunner { sync, .. } = runner;
    sync.shutdown().await;
    restore_terminal(&mut terminal)?;

    // Shutdown writes whatever is still pending; report it if that failed.
    while let Ok(status) = sync_rx.try_recv() {
        if let SyncStatus::Failed(message) = status {
            eprintln!("⚠️  Could not save the roster: {message}");
        }
    }
    info!("editor closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LookupKind;
    use crate::character::record::EquipmentSlot;
    use crate::character::RosterStore;
    use crate::core::config::Config;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> CliContext {
        CliContext {
            config: Config::default(),
            store: RosterStore::in_dir(dir.path()),
            offline: true,
        }
    }

    fn spawn_runner(
        store: RosterStore,
    ) -> (
        CommandRunner,
        mpsc::UnboundedReceiver<AppAction>,
        mpsc::UnboundedReceiver<SyncStatus>,
    ) {
        let (enricher, _enrich_rx) = EnrichmentService::new(Arc::new(RulesService::offline()));
        let (sync, sync_rx) = SyncHandle::spawn(Arc::new(store), Duration::from_millis(20));
        let (suggest_tx, suggest_rx) = mpsc::unbounded_channel();
        (
            CommandRunner {
                sync,
                enricher,
                suggest_tx,
            },
            suggest_rx,
            sync_rx,
        )
    }

    #[test]
    fn key_releases_are_ignored() {
        let dir = TempDir::new().unwrap();
        let app = bootstrap_app(&context(&dir), None).unwrap();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(translate_event(&app, Event::Key(release)).is_none());
        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(
            translate_event(&app, Event::Key(press)),
            Some(AppAction::Quit)
        ));
    }

    #[test]
    fn bootstrap_rejects_unknown_character() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut roster = ctx.load_roster().unwrap();
        roster.create("Tess").unwrap();
        roster.create("Brom").unwrap();
        ctx.store.save(&roster).unwrap();

        let app = bootstrap_app(&ctx, Some("tess".to_string())).unwrap();
        assert_eq!(app.roster.active_name(), Some("Tess"));
        assert!(bootstrap_app(&ctx, Some("Nobody".to_string())).is_err());
    }

    #[tokio::test]
    async fn persist_commands_reach_the_store() {
        let dir = TempDir::new().unwrap();
        let store = RosterStore::in_dir(dir.path());
        let (runner, _suggest_rx, mut sync_rx) = spawn_runner(store.clone());

        let mut app = bootstrap_app(&context(&dir), None).unwrap();
        app.roster
            .create("Tess")
            .unwrap()
            .equip(EquipmentSlot::Cloak, "Cloak of Protection");
        runner.execute(app.persist_command());

        assert_eq!(
            sync_rx.recv().await,
            Some(SyncStatus::Saved { characters: 1 })
        );
        runner.sync.shutdown().await;
        let saved = store.load().unwrap();
        assert_eq!(
            saved.get("Tess").unwrap().equipped(EquipmentSlot::Cloak),
            Some("Cloak of Protection")
        );
    }

    #[tokio::test]
    async fn suggestions_come_back_as_actions() {
        let dir = TempDir::new().unwrap();
        let (runner, mut suggest_rx, _sync_rx) = spawn_runner(RosterStore::in_dir(dir.path()));
        runner.execute(AppCommand::Suggest {
            prefix: "Sh".to_string(),
            kind: LookupKind::Item,
            limit: 5,
        });
        match suggest_rx.recv().await {
            Some(AppAction::SuggestionsLoaded { prefix, items }) => {
                assert_eq!(prefix, "Sh");
                assert!(items.is_empty());
            }
            other => panic!("expected suggestions, got {other:?}"),
        }
        runner.sync.shutdown().await;
    }
}
