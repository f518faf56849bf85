use crate::display::interface::{Display, Screen};
use std::error::Error;
use std::io::Write;

const WIDTH: usize = 60;

pub struct DisplayConsole {
    last_frame: Option<String>,
}

impl DisplayConsole {
    pub fn new() -> Self {
        Self { last_frame: None }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + word.chars().count() + 1 > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn frame(screen: &Screen) -> String {
    let mut rows = vec![screen.title.to_string(), String::new()];
    if let Some(notice) = screen.notice {
        rows.extend(wrap(&format!("! {}", notice), WIDTH));
        rows.push(String::new());
    }
    if let Some(preview) = &screen.preview {
        let (width, height) = preview.image().dimensions();
        rows.push(format!("[preview {}x{}]", width, height));
        rows.push(String::new());
    }
    rows.extend(wrap(&screen.status, WIDTH));
    rows.push(String::new());
    rows.extend(wrap(screen.instructions, WIDTH));

    let mut out = format!("┌{}┐\n", "─".repeat(WIDTH + 2));
    for row in rows {
        let padding = WIDTH.saturating_sub(row.chars().count());
        out.push_str(&format!("│ {}{} │\n", row, " ".repeat(padding)));
    }
    out.push_str(&format!("└{}┘", "─".repeat(WIDTH + 2)));
    out
}

impl Display for DisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        let rendered = frame(screen);
        if self.last_frame.as_deref() == Some(rendered.as_str()) {
            return Ok(());
        }
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered)?;
        stdout.flush()?;
        self.last_frame = Some(rendered);
        Ok(())
    }
}
