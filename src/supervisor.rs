use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, trace};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::channel::dispatch;
use crate::readiness::{self, Readiness, ReadinessNotifier};
use crate::{
    Config, ConsensusEngine, Error, Group, LocalChannel, Message, NodeId, NodeState, Result,
    Status,
};

/// Controls one engine running under a [`Supervisor`].
///
/// Message handling, `start` and `stop` all go through one lock per engine,
/// so an engine sees its input one message at a time. The lock is never held
/// while sending.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: NodeId,
    group: Group,
    status: Status,
    engine: Arc<Mutex<ConsensusEngine>>,
    state_tx: Arc<watch::Sender<NodeState>>,
    state_rx: watch::Receiver<NodeState>,
    readiness: Readiness,
    channel: LocalChannel,
}

impl NodeHandle {
    fn new(engine: ConsensusEngine, readiness: Readiness, channel: LocalChannel) -> Self {
        let (state_tx, state_rx) = watch::channel(engine.state());
        Self {
            id: engine.id(),
            group: engine.group(),
            status: engine.status(),
            engine: Arc::new(Mutex::new(engine)),
            state_tx: Arc::new(state_tx),
            state_rx,
            readiness,
            channel,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Waits for the whole group to be reachable, then broadcasts the
    /// initial proposal. Faulty and killed engines do nothing.
    pub async fn start(&self) -> Result<()> {
        self.readiness.wait().await?;
        self.with_engine(ConsensusEngine::start);
        Ok(())
    }

    pub fn stop(&self) {
        self.with_engine(ConsensusEngine::stop);
    }

    pub fn state(&self) -> NodeState {
        *self.state_rx.borrow()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Resolves with the final state once the engine decides.
    pub async fn wait_decided(&self) -> Result<NodeState> {
        let mut rx = self.state_rx.clone();
        let state = rx
            .wait_for(NodeState::is_decided)
            .await
            .map_err(|_| Error::ChannelClosed(self.id))?;
        Ok(*state)
    }

    /// Handles one inbound wire message. Anything that fails to decode is
    /// dropped.
    pub fn receive(&self, bytes: &[u8]) {
        match Message::decode(bytes) {
            Ok(msg) => self.with_engine(|engine| engine.handle_message(msg)),
            Err(err) => trace!("[NODE-{}] dropping malformed message: {err}", self.id),
        }
    }

    fn with_engine(&self, f: impl FnOnce(&mut ConsensusEngine)) {
        let outgoings = {
            let mut engine = self.lock();
            f(&mut *engine);
            // published under the lock so snapshots never go backwards
            let state = engine.state();
            self.state_tx.send_if_modified(|current| {
                let changed = *current != state;
                *current = state;
                changed
            });
            engine.take_outgoings()
        };
        dispatch(&self.channel, self.id, self.group, outgoings);
    }

    fn lock(&self) -> MutexGuard<'_, ConsensusEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs a whole group in-process, one tokio task per member.
#[derive(Debug)]
pub struct Supervisor {
    group: Group,
    nodes: Vec<NodeHandle>,
    tasks: Vec<JoinHandle<()>>,
}

impl Supervisor {
    /// Spawns every member of `config`. Must be called within a tokio runtime.
    pub fn launch(config: &Config) -> Result<Self> {
        let group = config.validate()?;
        let engines = config.engines()?;
        let (notifier, readiness) = readiness::gate(group.size());

        let (senders, receivers): (Vec<_>, Vec<_>) =
            group.members().map(|_| unbounded_channel::<Vec<u8>>()).unzip();
        let channel = LocalChannel::new(senders);

        let mut nodes = Vec::with_capacity(group.size());
        let mut tasks = Vec::with_capacity(group.size());
        for (engine, inbound) in engines.into_iter().zip(receivers) {
            let node = NodeHandle::new(engine, readiness.clone(), channel.clone());
            tasks.push(tokio::spawn(run(node.clone(), inbound, notifier.clone())));
            nodes.push(node);
        }

        info!(
            "[SUPERVISOR] launched {} nodes tolerating {} faults",
            group.size(),
            group.faults()
        );
        Ok(Self {
            group,
            nodes,
            tasks,
        })
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeHandle> {
        self.nodes.get(id).ok_or(Error::UnknownPeer(id))
    }

    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    pub async fn start_all(&self) -> Result<()> {
        for node in &self.nodes {
            node.start().await?;
        }
        Ok(())
    }

    pub fn states(&self) -> Vec<NodeState> {
        self.nodes.iter().map(NodeHandle::state).collect()
    }

    /// Waits until every live, running member has decided.
    pub async fn wait_all_decided(&self, timeout: Duration) -> Result<Vec<NodeState>> {
        let waiting = async {
            for node in &self.nodes {
                if node.status().is_live() && !node.state().killed {
                    node.wait_decided().await?;
                }
            }
            Ok::<_, Error>(())
        };
        tokio::time::timeout(timeout, waiting)
            .await
            .map_err(|_| Error::Timeout)??;
        Ok(self.states())
    }

    pub fn shutdown(self) {
        info!("[SUPERVISOR] shutting down {} nodes", self.nodes.len());
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn run(
    node: NodeHandle,
    mut inbound: UnboundedReceiver<Vec<u8>>,
    ready: ReadinessNotifier,
) {
    ready.mark_ready(node.id());
    while let Some(bytes) = inbound.recv().await {
        node.receive(&bytes);
    }
    debug!("[NODE-{}] inbound queue closed", node.id());
}
