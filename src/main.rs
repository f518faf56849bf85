use analyzer::main::Analyzer;
use clap::{Parser, ValueEnum};
use config::{timezone_from_hours, Config, DisplayKind, InputSize, Normalization};
use display::impl_console::DisplayConsole;
use display::impl_gui::{run_window, DisplayGui};
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::manager::{ClassifierLoader, ModelManager, SharedClassifier};
use image_classifier::model_config::ModelConfig;
use image_source::impl_channel::ImageSourceChannel;
use image_source::impl_paths::ImageSourcePaths;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use parking_lot::Mutex;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

mod analyzer;
mod config;
mod display;
mod error;
mod image_classifier;
mod image_source;
mod library;
mod preprocessor;
mod result_formatter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DisplayArg {
    Console,
    Gui,
}

#[derive(Parser)]
#[command(name = "skin-lesion-analyzer")]
#[command(about = "Classify a photo of a skin lesion with an on-device model")]
struct Args {
    /// Images to classify, in order. More paths can be typed on stdin.
    images: Vec<PathBuf>,

    /// ONNX classifier. Without one a deterministic stand-in model is used.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Label file, one label per line, in model output order.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Model input size as WIDTHxHEIGHT; must match the model.
    #[arg(long, default_value_t = config::INPUT_SIZE)]
    input_size: InputSize,

    /// Per-channel mean subtracted after scaling pixels to [0, 1].
    #[arg(long, num_args = 3, value_delimiter = ',', default_values_t = [0.0, 0.0, 0.0])]
    mean: Vec<f32>,

    /// Per-channel divisor applied after the mean.
    #[arg(long, num_args = 3, value_delimiter = ',', default_values_t = [1.0, 1.0, 1.0])]
    std: Vec<f32>,

    #[arg(long, value_enum, default_value_t = DisplayArg::Console)]
    display: DisplayArg,

    /// Do not read image paths from stdin.
    #[arg(long)]
    no_stdin: bool,

    /// Offset from UTC used for log timestamps.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_hours: i32,
}

fn channels(values: &[f32], name: &str) -> Result<[f32; 3], Box<dyn Error + Send + Sync>> {
    match values {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(format!("--{} needs exactly 3 values", name).into()),
    }
}

impl Args {
    fn into_config(self) -> Result<Config, Box<dyn Error + Send + Sync>> {
        let std_dev = channels(&self.std, "std")?;
        if std_dev.iter().any(|s| *s == 0.0) {
            return Err("--std values must be non-zero".into());
        }

        Ok(Config {
            input_size: self.input_size,
            normalization: Normalization {
                mean: channels(&self.mean, "mean")?,
                std: std_dev,
            },
            model_path: self.model,
            labels_path: self.labels,
            display: match self.display {
                DisplayArg::Console => DisplayKind::Console,
                DisplayArg::Gui => DisplayKind::Gui,
            },
            image_paths: self.images,
            read_stdin: !self.no_stdin,
            logger_timezone: timezone_from_hours(self.utc_offset_hours)
                .ok_or_else(|| format!("invalid UTC offset {}", self.utc_offset_hours))?,
        })
    }
}

fn classifier_loader(config: &Config, logger: Arc<dyn Logger + Send + Sync>) -> ClassifierLoader {
    let config = config.clone();
    Box::new(move || -> Result<SharedClassifier, error::AnalyzeError> {
        match &config.model_path {
            Some(path) => {
                let model_config = ModelConfig::from_config(&config, path.clone())?;
                Ok(Arc::new(ImageClassifierTractOnnx::new(
                    model_config,
                    Arc::clone(&logger),
                )?))
            }
            None => {
                let labels = match &config.labels_path {
                    Some(path) => image_classifier::labels::load_labels(path)?,
                    None => image_classifier::labels::default_labels(),
                };
                let _ = logger.info("No model given, using the stand-in classifier");
                Ok(Arc::new(ImageClassifierFake::new(config.input_size, labels)))
            }
        }
    })
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Args::parse().into_config()?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let model_manager = Arc::new(ModelManager::new(
        classifier_loader(&config, Arc::clone(&logger)),
        Arc::clone(&logger),
    ));
    if let Err(e) = model_manager.init() {
        let _ = logger.error(&format!("Continuing without a model: {}", e));
    }

    match config.display {
        DisplayKind::Console => {
            let image_source = Arc::new(ImageSourcePaths::new(
                config.image_paths.clone(),
                config.read_stdin,
                Arc::clone(&logger),
            ));
            let analyzer = Analyzer::new(
                config,
                Arc::clone(&logger),
                image_source,
                Arc::clone(&model_manager),
                Arc::new(Mutex::new(DisplayConsole::new())),
            );
            analyzer.run()?;
        }
        DisplayKind::Gui => {
            let (image_source, selections) = ImageSourceChannel::new();
            let display = DisplayGui::new();
            let window = display.window(selections);
            for path in &config.image_paths {
                window.select(path.clone());
            }
            let analyzer = Analyzer::new(
                config,
                Arc::clone(&logger),
                Arc::new(image_source),
                Arc::clone(&model_manager),
                Arc::new(Mutex::new(display)),
            );

            let worker_logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                if let Err(e) = analyzer.run() {
                    let _ = worker_logger.error(&format!("Analyzer stopped: {}", e));
                }
            });

            // eframe needs the main thread.
            run_window(window)?;
        }
    }

    model_manager.teardown();
    Ok(())
}
