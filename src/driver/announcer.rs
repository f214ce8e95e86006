use tracing::info;

/// Speech output for SPEAK.
pub trait Announcer {
    fn announce(&mut self, text: &str);
}

/// Announces through the log at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, text: &str) {
        info!("speak: {}", text);
    }
}

/// Keeps every announcement, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingAnnouncer {
    pub spoken: Vec<String>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }
}

impl<F: FnMut(&str)> Announcer for F {
    fn announce(&mut self, text: &str) {
        self(text)
    }
}
