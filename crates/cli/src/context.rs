//! Application context - wires everything together

use crate::deploy::DeploymentConfig;
use crate::script::{Step, StepOutput};
use multisig_approval::{ApprovalEngine, ApprovalResult, TokenVault};
use multisig_events::{run_subscriber, EventBus, JournalSubscriber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Application context - engine, vault and event journal
pub struct AppContext {
    pub engine: ApprovalEngine,
    pub vault: Arc<TokenVault>,
    bus: Arc<EventBus>,
    journal_task: JoinHandle<usize>,
    journal_path: PathBuf,
}

impl AppContext {
    /// Deploy a fresh engine and start journaling its events.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn new(
        data_path: impl AsRef<Path>,
        deployment: &DeploymentConfig,
    ) -> Result<Self, anyhow::Error> {
        let journal_path = data_path.as_ref().join("journal");
        std::fs::create_dir_all(&journal_path)?;

        let vault = Arc::new(TokenVault::new());
        for holding in &deployment.holdings {
            vault.deposit(holding.token, holding.amount)?;
        }

        // Subscribe before the engine exists so no event is missed
        let bus = Arc::new(EventBus::default());
        let journal = Arc::new(JournalSubscriber::new(&journal_path)?);
        let journal_task = tokio::spawn(run_subscriber(bus.subscribe(), journal));

        let engine = ApprovalEngine::from_config(&deployment.multisig, vault.clone(), bus.clone())?;

        Ok(Self {
            engine,
            vault,
            bus,
            journal_task,
            journal_path,
        })
    }

    /// Run one script step against the engine
    pub fn execute(&self, step: &Step) -> ApprovalResult<StepOutput> {
        match step {
            Step::Transfer {
                caller,
                amount,
                recipient,
                token,
            } => self
                .engine
                .propose_transfer(caller, *amount, *recipient, *token)
                .map(StepOutput::Proposed),
            Step::Approve { caller, id } => self
                .engine
                .approve_transfer(caller, *id)
                .map(StepOutput::Approved),
            Step::UpdateQuorum { caller, quorum } => self
                .engine
                .propose_quorum_update(caller, *quorum)
                .map(StepOutput::Proposed),
            Step::ApproveQuorum { caller, id } => self
                .engine
                .approve_quorum_update(caller, *id)
                .map(StepOutput::Approved),
            Step::Show { id } => self
                .engine
                .get_tx(*id)
                .map(|tx| StepOutput::Record(Box::new(tx))),
        }
    }

    /// Get journal path
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Tear down the engine and wait for the journal to drain.
    ///
    /// Returns the number of events journaled during this run.
    pub async fn shutdown(self) -> Result<usize, anyhow::Error> {
        let Self {
            engine,
            bus,
            journal_task,
            ..
        } = self;

        // Dropping every sender closes the channel
        drop(engine);
        drop(bus);

        Ok(journal_task.await?)
    }
}
