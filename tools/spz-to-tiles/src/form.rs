//! Toolkit independent state of the converter window.
//!
//! The conversion runs on a worker thread. Report lines and the final outcome
//! travel back over a channel and are picked up by [`Form::poll`],
//! which the window calls once per frame.

use spz_tiles::{
    resolve_content_name, CancelToken, CommandRunner, ConversionRequest, Converter, Environment,
    LogLine, DEFAULT_CONTENT_NAME,
};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Message from the worker thread.
#[derive(Debug)]
pub enum FormEvent {
    Line(LogLine),
    Finished { success: bool },
}

/// Modal message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    Info { title: String, message: String },
    Error { title: String, message: String },
}

impl Dialog {
    fn error(message: &str) -> Self {
        Dialog::Error {
            title: "Error".to_owned(),
            message: message.to_owned(),
        }
    }
}

struct Job {
    events: Receiver<FormEvent>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

pub struct Form<E, R> {
    converter: Arc<Converter<E, R>>,
    pub input: String,
    pub output_dir: String,
    pub content_name: String,
    log: Vec<LogLine>,
    job: Option<Job>,
}

impl<E, R> Form<E, R>
where
    E: Environment + Send + Sync + 'static,
    R: CommandRunner + Send + Sync + 'static,
{
    pub fn new(converter: Converter<E, R>) -> Self {
        Self {
            converter: Arc::new(converter),
            input: String::new(),
            output_dir: String::new(),
            content_name: DEFAULT_CONTENT_NAME.to_owned(),
            log: Vec::new(),
            job: None,
        }
    }

    pub fn log(&self) -> &[LogLine] {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Validates the fields and starts one conversion in the background.
    ///
    /// Blank paths are rejected with an error dialog,
    /// a blank content name is replaced by the default.
    pub fn submit(&mut self) -> Result<(), Dialog> {
        if self.is_running() {
            return Err(Dialog::error("A conversion is already running"));
        }
        let input = self.input.trim();
        if input.is_empty() {
            return Err(Dialog::error("Please select an input SPZ file"));
        }
        let output_dir = self.output_dir.trim();
        if output_dir.is_empty() {
            return Err(Dialog::error("Please select an output directory"));
        }
        self.content_name = resolve_content_name(Some(self.content_name.as_str()));

        let request = ConversionRequest::new(input, output_dir, Some(self.content_name.as_str()));
        self.log.clear();

        let (sender, events) = channel();
        let cancel = CancelToken::new();
        let converter = Arc::clone(&self.converter);
        let token = cancel.clone();
        let handle = thread::spawn(move || {
            // Send errors only mean the window is gone
            let report = converter.convert_with(&request, &token, |line| {
                let _ = sender.send(FormEvent::Line(line.clone()));
            });
            let _ = sender.send(FormEvent::Finished {
                success: report.succeeded(),
            });
        });

        self.job = Some(Job {
            events,
            cancel,
            handle: Some(handle),
        });
        Ok(())
    }

    /// Kills the running conversion, if any.
    pub fn cancel(&self) {
        if let Some(job) = &self.job {
            job.cancel.cancel();
        }
    }

    /// Drains pending worker messages.
    /// Returns the outcome dialog once the running conversion has finished.
    pub fn poll(&mut self) -> Option<Dialog> {
        let job = self.job.as_mut()?;
        let mut success = None;
        loop {
            match job.events.try_recv() {
                Ok(FormEvent::Line(line)) => self.log.push(line),
                Ok(FormEvent::Finished { success: s }) => {
                    success = Some(s);
                    break;
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        if let Some(handle) = job.handle.take() {
            if handle.join().is_err() {
                log::error!("Conversion worker panicked");
            }
        }
        self.job = None;

        Some(match success {
            Some(true) => Dialog::Info {
                title: "Success".to_owned(),
                message: "Conversion completed successfully!".to_owned(),
            },
            _ => Dialog::error("Conversion failed. Check the log for details."),
        })
    }
}
