use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use futures::future::join_all;

use crate::commands::Command;

/// Runs commands concurrently. Every command runs to completion; the batch
/// fails if any of them failed.
pub struct Batch {
    name: String,
    commands: Vec<Box<dyn Command>>,
}

impl Batch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, command: impl Command) -> Self {
        self.commands.push(Box::new(command));
        self
    }
}

#[async_trait]
impl Command for Batch {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        let names: Vec<String> = self.commands.iter().map(|c| c.name()).collect();
        let results = join_all(self.commands.into_iter().map(|command| command.execute())).await;

        let failed: Vec<String> = names
            .into_iter()
            .zip(results)
            .filter_map(|(name, result)| result.err().map(|e| format!("{name}: {e}")))
            .collect();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(eyre!(failed.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::commands::Task;

    #[tokio::test]
    async fn test_batch_runs_everything_despite_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let ok = {
            let log = Arc::clone(&log);
            Task::new("ok", async move {
                log.lock().unwrap().push("ok");
                Ok(())
            })
        };
        let batch = Batch::new("both")
            .with(Task::new("broken", async { Err(eyre!("nope")) }))
            .with(ok);

        let err = Box::new(batch).execute().await.unwrap_err();
        assert_eq!(err.to_string(), "broken: nope");
        assert_eq!(*log.lock().unwrap(), vec!["ok"]);
    }
}
