use io_manager::prelude::*;
use std::sync::{Arc, Mutex};

/// One call received by `MockProgressReporter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported {
    Message(String),
    Step {
        current: usize,
        total: usize,
        phase: Option<String>,
    },
    Error(String),
    Completion(String),
}

impl Reported {
    /// Renders the event the way the console reporter words it
    pub fn render(&self) -> String {
        match self {
            Reported::Message(m) => m.clone(),
            Reported::Step {
                current,
                total,
                phase: Some(phase),
            } => format!("Progress: {}/{} - {}", current, total, phase),
            Reported::Step {
                current,
                total,
                phase: None,
            } => format!("Progress: {}/{}", current, total),
            Reported::Error(m) => format!("Error: {}", m),
            Reported::Completion(m) => format!("Completed: {}", m),
        }
    }
}

/// Mock ProgressReporter recording every call for later assertions
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    events: Arc<Mutex<Vec<Reported>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Reported) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Reported> {
        self.events.lock().unwrap().clone()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.events().iter().map(Reported::render).collect()
    }

    pub fn message_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Copy phases reported so far, in order
    pub fn copy_phases(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Step {
                    phase: Some(phase), ..
                } => Some(phase),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(Reported::Message(message.to_string()));
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(Reported::Step {
            current,
            total,
            phase: message.map(str::to_string),
        });
    }

    fn report_error(&self, message: &str) {
        self.push(Reported::Error(message.to_string()));
    }

    fn report_completion(&self, message: &str) {
        self.push(Reported::Completion(message.to_string()));
    }
}
