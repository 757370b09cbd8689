use log::{debug, info, trace};

use crate::{
    Broadcaster, Coin, Estimate, Group, Kind, Message, NodeId, NodeState, Outgoing, Round,
    RoundLog, Status, Value,
};

// State transition of a correct engine
//
// +--------------+  n-f proposals  +---------------+
// | Proposing(k) | --------------> | vote(k) sent  |
// +--------------+                 +---------------+
//        ^                                 |
//        |        n-f votes, no value      |  n-f votes, f+1 agree
//        +------------ k + 1 --------------+--------------------> Decided(x)
//
// Killed and faulty engines accept every message and never transition.

/// One process's view of the protocol.
///
/// The engine does no I/O: handlers record what they want sent in a
/// [`Broadcaster`] and the caller drains it with [`take_outgoings`].
///
/// [`take_outgoings`]: ConsensusEngine::take_outgoings
#[derive(Debug)]
pub struct ConsensusEngine {
    id: NodeId,
    group: Group,
    faulty: bool,
    started: bool,
    state: NodeState,
    proposals: RoundLog,
    votes: RoundLog,
    coin: Box<dyn Coin>,
    broadcaster: Broadcaster,
}

impl ConsensusEngine {
    pub fn new(
        id: NodeId,
        group: Group,
        initial: Value,
        faulty: bool,
        coin: impl Coin + 'static,
    ) -> Self {
        let state = if faulty {
            NodeState::faulty()
        } else {
            NodeState::correct(initial)
        };
        Self {
            id,
            group,
            faulty,
            started: false,
            state,
            proposals: RoundLog::new(),
            votes: RoundLog::new(),
            coin: Box::new(coin),
            broadcaster: Broadcaster::new(id),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn status(&self) -> Status {
        if self.faulty {
            Status::Faulty
        } else {
            Status::Live
        }
    }

    pub fn is_decided(&self) -> bool {
        self.state.is_decided()
    }

    pub fn proposals(&self) -> &RoundLog {
        &self.proposals
    }

    pub fn votes(&self) -> &RoundLog {
        &self.votes
    }

    pub fn take_outgoings(&mut self) -> Vec<Outgoing> {
        self.broadcaster.take_outgoings()
    }

    /// Broadcasts the initial proposal. Only the first call has an effect.
    pub fn start(&mut self) {
        if !self.is_active() {
            trace!("[NODE-{}] not starting, engine is faulty or killed", self.id);
            return;
        }
        if std::mem::replace(&mut self.started, true) {
            trace!("[NODE-{}] already started", self.id);
            return;
        }
        if let (Some(k), Some(x)) = (self.state.k, self.state.x) {
            info!("[NODE-{}] starting in round {k} with {x:?}", self.id);
            self.broadcaster.broadcast(Message::propose(k, x));
        }
    }

    pub fn stop(&mut self) {
        if !self.state.killed {
            info!("[NODE-{}] stopped", self.id);
        }
        self.state.killed = true;
    }

    pub fn handle_message(&mut self, msg: Message) {
        match msg.kind {
            Kind::Propose => self.handle_propose(msg.round, msg.value),
            Kind::Vote => self.handle_vote(msg.round, msg.value),
        }
    }

    pub fn handle_propose(&mut self, k: Round, x: Estimate) {
        if !self.is_active() {
            trace!("[NODE-{}] ignoring proposal {x:?} for round {k}", self.id);
            return;
        }

        let received = self.proposals.record(k, x);
        debug!(
            "[NODE-{}] proposal {x:?} for round {k} ({received}/{})",
            self.id,
            self.group.quorum()
        );

        if received < self.group.quorum() || !self.proposals.fire(k) {
            return;
        }

        let tally = self.proposals.tally(k);
        let vote = if self.group.is_majority(tally.zeros) {
            Value::Zero
        } else if self.group.is_majority(tally.ones) {
            Value::One
        } else {
            let flip = self.coin.flip();
            debug!(
                "[NODE-{}] no majority in round {k} proposals {tally:?}, coin says {flip:?}",
                self.id
            );
            flip
        };

        self.broadcaster.broadcast(Message::vote(k, vote));
    }

    pub fn handle_vote(&mut self, k: Round, x: Estimate) {
        if !self.is_active() {
            trace!("[NODE-{}] ignoring vote {x:?} for round {k}", self.id);
            return;
        }

        let received = self.votes.record(k, x);
        debug!(
            "[NODE-{}] vote {x:?} for round {k} ({received}/{})",
            self.id,
            self.group.quorum()
        );

        self.conclude_rounds();
    }

    // Acts on the vote quorum of the current round. A quorum that formed for
    // a later round while we were still behind is picked up after advancing.
    fn conclude_rounds(&mut self) {
        while let Some(k) = self.state.k {
            if self.state.is_decided() {
                return;
            }
            if self.votes.len(k) < self.group.quorum() || !self.votes.fire(k) {
                return;
            }

            let tally = self.votes.tally(k);
            let super_quorum = self.group.super_quorum();
            if tally.zeros >= super_quorum {
                self.decide(k, Value::Zero);
            } else if tally.ones >= super_quorum {
                self.decide(k, Value::One);
            } else {
                let next = k + 1;
                let x = self.coin.flip();
                info!(
                    "[NODE-{}] no value reached {super_quorum} votes in round {k} {tally:?}, moving to round {next} with {x:?}",
                    self.id
                );
                self.state.k = Some(next);
                self.state.x = Some(x);
                self.broadcaster.broadcast(Message::propose(next, x));
            }
        }
    }

    fn decide(&mut self, k: Round, value: Value) {
        info!("[NODE-{}] decided {value:?} in round {k}", self.id);
        self.state.x = Some(value);
        self.state.decided = Some(true);
    }

    fn is_active(&self) -> bool {
        !self.faulty && !self.state.killed
    }
}
