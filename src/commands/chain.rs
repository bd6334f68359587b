use async_trait::async_trait;
use color_eyre::Result;

use crate::commands::Command;

/// Runs commands one after another, stopping at the first failure.
pub struct Chain {
    name: String,
    commands: Vec<Box<dyn Command>>,
}

impl Chain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, command: impl Command) -> Self {
        self.commands.push(Box::new(command));
        self
    }
}

#[async_trait]
impl Command for Chain {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        for command in self.commands {
            command.execute().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use color_eyre::eyre::eyre;

    use super::*;
    use crate::commands::Task;

    fn record(log: &Arc<Mutex<Vec<u8>>>, value: u8) -> Task {
        let log = Arc::clone(log);
        Task::new(format!("step {value}"), async move {
            log.lock().unwrap().push(value);
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_chain_runs_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new("steps")
            .then(record(&log, 1))
            .then(record(&log, 2))
            .then(record(&log, 3));

        Box::new(chain).execute().await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_chain_stops_at_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new("steps")
            .then(record(&log, 1))
            .then(Task::new("fail", async { Err(eyre!("nope")) }))
            .then(record(&log, 3));

        assert!(Box::new(chain).execute().await.is_err());
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }
}
