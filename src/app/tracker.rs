use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

#[derive(Debug)]
struct RunningCommand {
    id: CommandId,
    name: String,
    started_at: Instant,
}

#[derive(Debug, Clone)]
pub struct CompletedCommand {
    pub name: String,
    pub success: bool,
    pub duration: Duration,
}

/// Bookkeeping for spawned commands, shown in the header.
#[derive(Debug, Default)]
pub struct CommandTracker {
    running: Vec<RunningCommand>,
    history: VecDeque<CompletedCommand>,
    next_id: u64,
}

impl CommandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, name: String) -> CommandId {
        let id = CommandId(self.next_id);
        self.next_id += 1;
        self.running.push(RunningCommand {
            id,
            name,
            started_at: Instant::now(),
        });
        id
    }

    /// Move a command to the history. Unknown ids are ignored.
    pub fn complete(&mut self, id: CommandId, success: bool) -> Option<&CompletedCommand> {
        let pos = self.running.iter().position(|c| c.id == id)?;
        let cmd = self.running.remove(pos);
        self.history.push_front(CompletedCommand {
            name: cmd.name,
            success,
            duration: cmd.started_at.elapsed(),
        });
        self.history.truncate(MAX_HISTORY);
        self.history.front()
    }

    #[cfg(test)]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Header labels of running commands, oldest first, with elapsed time.
    pub fn running_labels(&self) -> Vec<String> {
        self.running
            .iter()
            .map(|c| format!("{} {}", c.name, format_duration(c.started_at.elapsed())))
            .collect()
    }

    #[cfg(test)]
    pub fn history(&self) -> impl Iterator<Item = &CompletedCommand> {
        self.history.iter()
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        format!("{}m{:02}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_complete() {
        let mut tracker = CommandTracker::new();
        let first = tracker.start("Loading instances".to_string());
        let second = tracker.start("Copying id".to_string());
        assert_ne!(first, second);
        assert_eq!(tracker.running_count(), 2);

        let done = tracker.complete(first, false).unwrap();
        assert_eq!(done.name, "Loading instances");
        assert!(!done.success);
        assert_eq!(tracker.running_count(), 1);
        assert!(tracker.running_labels()[0].starts_with("Copying id "));

        // Completing twice is harmless
        assert!(tracker.complete(first, true).is_none());
        assert_eq!(tracker.history().count(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut tracker = CommandTracker::new();
        for i in 0..(MAX_HISTORY + 5) {
            let id = tracker.start(format!("cmd {i}"));
            tracker.complete(id, true);
        }
        assert_eq!(tracker.history().count(), MAX_HISTORY);
        assert_eq!(tracker.history().next().map(|c| c.name.as_str()), Some("cmd 14"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1200)), "1.2s");
        assert_eq!(format_duration(Duration::from_secs(75)), "1m15s");
    }
}
