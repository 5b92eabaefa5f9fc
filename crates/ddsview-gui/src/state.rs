/// Messages kept in the status log; older ones are dropped first.
pub const MAX_LOG_MESSAGES: usize = 500;

/// Host-side UI state that the inspector does not own.
#[derive(Default)]
pub struct UIState {
    /// Log messages shown in the status panel.
    pub log_messages: Vec<String>,
    pub show_about: bool,
    pub show_keys: bool,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            let excess = self.log_messages.len() - MAX_LOG_MESSAGES;
            self.log_messages.drain(..excess);
        }
    }
}
