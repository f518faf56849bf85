use crate::display::interface::{Display, Screen};
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;

/// Remembers every screen it was asked to show.
#[derive(Clone, Default)]
pub struct DisplayFake {
    screens: Arc<Mutex<Vec<Screen>>>,
}

impl DisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.screens.lock().clone()
    }

    pub fn last(&self) -> Option<Screen> {
        self.screens.lock().last().cloned()
    }
}

impl Display for DisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.screens.lock().push(screen.clone());
        Ok(())
    }
}
