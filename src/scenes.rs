//! # Scene Management System
//!
//! Drives the per-frame tick: read input, advance the session, feed the
//! display, and persist the session on a timer, after mutations and on quit.

use crate::game::{persist, AutosaveClock, GameEvent, GameSession, SaveStore};
use crate::{InputHandler, IslesError, IslesResult, MacroquadDisplay, PlayerInput};
use log::{debug, info, warn};
use macroquad::prelude::*;

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Actions for one frame. A window close request queues a quit after the
/// frame's other actions, so it saves exactly like the quit key.
fn frame_actions(mut actions: Vec<PlayerInput>, close_requested: bool) -> Vec<PlayerInput> {
    if close_requested && !actions.contains(&PlayerInput::Quit) {
        actions.push(PlayerInput::Quit);
    }
    actions
}

/// The main scene manager that owns the session and its collaborators.
pub struct SceneManager {
    session: GameSession,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    store: Option<Box<dyn SaveStore>>,
    autosave: AutosaveClock,
}

impl SceneManager {
    /// Creates a scene manager. Without a store the session is never saved.
    pub fn new(
        session: GameSession,
        input_handler: InputHandler,
        store: Option<Box<dyn SaveStore>>,
        autosave_secs: f32,
    ) -> Self {
        let mut session = session;
        let mut display = MacroquadDisplay::new();
        display.apply_commands(session.replay_entities());
        // The replayed state is already applied; drop the queued duplicates.
        session.drain_entity_commands();
        display.add_message(format!("Welcome to {}!", session.island().name));

        Self {
            session,
            display,
            input_handler,
            store,
            autosave: AutosaveClock::new(autosave_secs),
        }
    }

    /// Read access to the session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Runs the main loop until the player quits, then saves one last time.
    pub async fn run(&mut self) -> IslesResult<()> {
        // Window close requests go through `update` so the final save runs.
        prevent_quit();
        loop {
            let flow = self.update(get_frame_time());
            self.display.render(&self.session);
            if flow == Flow::Quit {
                break;
            }
            next_frame().await;
        }

        info!("Game loop ended");
        self.save()
    }

    fn update(&mut self, dt: f32) -> Flow {
        let touch = self.display.ui.poll();

        let intent = self.input_handler.move_intent(touch.move_vector);
        self.session.move_player(intent, dt);

        let actions = frame_actions(self.input_handler.actions(&touch.pressed), is_quit_requested());
        for action in actions {
            if self.handle_action(action) == Flow::Quit {
                return Flow::Quit;
            }
        }

        for event in self.session.drain_events() {
            self.report(event);
        }
        self.display.apply_commands(self.session.drain_entity_commands());

        let dirty = self.session.take_dirty();
        if self.autosave.tick(dt, dirty) {
            if let Err(error) = self.save() {
                warn!("Autosave failed: {}", error);
            }
        }
        Flow::Continue
    }

    fn handle_action(&mut self, action: PlayerInput) -> Flow {
        debug!("Action: {:?}", action);
        let result = match action {
            PlayerInput::Quit => {
                info!("Player quit the game");
                return Flow::Quit;
            }
            PlayerInput::Help => {
                self.display.show_help = !self.display.show_help;
                Ok(())
            }
            PlayerInput::Interact => self.session.interact().map(|_| ()),
            PlayerInput::Craft => self.session.craft().map(|_| ()),
            PlayerInput::Travel => self.session.travel().map(|_| ()),
            PlayerInput::Talk => self.session.talk_to_npc().map(|_| ()),
            PlayerInput::NextRecipe => {
                self.session.select_next_recipe();
                Ok(())
            }
            PlayerInput::PreviousRecipe => {
                self.session.select_previous_recipe();
                Ok(())
            }
            PlayerInput::ZoomIn => {
                self.session.adjust_zoom(1);
                Ok(())
            }
            PlayerInput::ZoomOut => {
                self.session.adjust_zoom(-1);
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            // Already on the status line.
            Err(IslesError::Rule(_)) => {}
            Err(error) => {
                warn!("Action {:?} failed: {}", action, error);
                self.display.add_message(format!("Something went wrong: {}", error));
            }
        }
        Flow::Continue
    }

    fn report(&mut self, event: GameEvent) {
        debug!("Event: {:?}", event);
        let message = match event {
            GameEvent::Harvested { kind } => format!("Collected {}.", kind),
            GameEvent::Crafted { item } => format!("Crafted a {}!", item.label()),
            GameEvent::Sailed { to, .. } => {
                format!("Sailed to {}.", self.session.islands()[to].name)
            }
            GameEvent::QuestAdvanced { .. } => self.session.status().to_string(),
            GameEvent::Message { text } => text,
            // Shown in the HUD.
            GameEvent::RecipeSelected { .. } => return,
        };
        self.display.add_message(message);
    }

    fn save(&mut self) -> IslesResult<()> {
        match self.store.as_mut() {
            Some(store) => persist(&self.session, store.as_mut()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_request_queues_quit_last() {
        let actions = frame_actions(vec![PlayerInput::Craft], true);
        assert_eq!(actions, vec![PlayerInput::Craft, PlayerInput::Quit]);
    }

    #[test]
    fn test_close_request_does_not_duplicate_quit() {
        let actions = frame_actions(vec![PlayerInput::Quit], true);
        assert_eq!(actions, vec![PlayerInput::Quit]);
    }

    #[test]
    fn test_no_close_request_keeps_actions() {
        assert!(frame_actions(Vec::new(), false).is_empty());
        assert_eq!(
            frame_actions(vec![PlayerInput::Travel], false),
            vec![PlayerInput::Travel]
        );
    }
}
