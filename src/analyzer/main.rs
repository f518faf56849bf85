use crate::analyzer::core::{init, is_stale, transition, Effect, Event, Phase, State};
use crate::analyzer::render::view;
use crate::analyzer::run_effect::RunEffect;
use crate::config::Config;
use crate::display::interface::Display;
use crate::image_classifier::manager::ModelManager;
use crate::image_source::interface::ImageSource;
use crate::library::logger::interface::Logger;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Owns the state and is the only place it changes. Effects run on their own
/// threads and report back through the event channel.
pub struct Analyzer {
    logger: Arc<dyn Logger + Send + Sync>,
    display: Arc<Mutex<dyn Display + Send>>,
    run_effect: RunEffect,
    event_receiver: Receiver<Event>,
}

impl Analyzer {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        model_manager: Arc<ModelManager>,
        display: Arc<Mutex<dyn Display + Send>>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("analyzer");
        let run_effect = RunEffect::new(
            config,
            Arc::clone(&logger),
            image_source,
            model_manager,
            event_sender,
        );

        Self {
            logger,
            display,
            run_effect,
            event_receiver,
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }

    fn render(&self, state: &State) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.display.lock().show(&view(state))
    }

    /// Runs until the image source is exhausted and the last request has
    /// been displayed. Returns the final state.
    pub fn run(&self) -> Result<State, Box<dyn Error + Send + Sync>> {
        self.display.lock().init()?;

        let (mut state, effects) = init();
        self.render(&state)?;
        self.spawn_effects(effects);

        while !state.is_settled() {
            let event = self.event_receiver.recv()?;

            if is_stale(&state, &event) {
                let _ = self.logger.info(&format!(
                    "Dropping stale result for request {:?}, latest is {}",
                    event.request_id(),
                    state.latest_request_id
                ));
                continue;
            }

            let _ = self.logger.info(&format!(
                "\nold state:\n\t{:?}\n\nevent:\n\t{:?}",
                state, event
            ));
            let previous_phase = state.phase.clone();
            let (new_state, effects) = transition(state, event);
            let _ = self.logger.info(&format!(
                "\nnew state:\n\t{:?}\n\neffects:\n\t{:?}",
                new_state, effects
            ));
            state = new_state;

            if state.phase != previous_phase {
                if let Phase::Displaying {
                    request_id,
                    outcome: Err(error),
                } = &state.phase
                {
                    let _ = self.logger.error(&format!(
                        "Request {} failed [{}]: {}",
                        request_id,
                        error.error_code(),
                        error
                    ));
                }
            }

            self.render(&state)?;
            self.spawn_effects(effects);
        }

        let _ = self.logger.info("No more images, stopping");
        Ok(state)
    }
}
