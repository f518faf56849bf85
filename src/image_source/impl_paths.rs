use crate::image_source::interface::{ImageSelection, ImageSource};
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Picks images from file paths: first the ones given up front, then one per
/// line on stdin. An empty line is a dismissed picker.
pub struct ImageSourcePaths {
    paths: Vec<PathBuf>,
    read_stdin: bool,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourcePaths {
    pub fn new(
        paths: Vec<PathBuf>,
        read_stdin: bool,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            paths,
            read_stdin,
            logger: logger.with_namespace("image_source"),
        }
    }
}

fn selection_from_line(line: &str) -> ImageSelection {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ImageSelection::Cancelled
    } else {
        ImageSelection::from_path(&PathBuf::from(trimmed))
    }
}

impl ImageSource for ImageSourcePaths {
    fn selections(&self) -> Receiver<ImageSelection> {
        let (tx, rx) = channel();
        let paths = self.paths.clone();
        let read_stdin = self.read_stdin;
        let logger = Arc::clone(&self.logger);

        std::thread::spawn(move || {
            for path in paths {
                let _ = logger.info(&format!("Selected {}", path.display()));
                if tx.send(ImageSelection::from_path(&path)).is_err() {
                    return;
                }
            }

            if !read_stdin {
                return;
            }

            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(selection_from_line(&line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = logger.error(&format!("Failed to read stdin: {}", e));
                        return;
                    }
                }
            }

            let _ = logger.info("No more images to select");
        });

        rx
    }
}
