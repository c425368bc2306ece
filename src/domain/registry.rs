use std::sync::Mutex;

/// Default bound on the number of registered agents.
pub const MAX_AGENTS: usize = 50;

#[derive(Debug, Clone)]
pub struct RegisteredAgent<H> {
    pub name: String,
    pub reply: H,
}

/// Append-only registry of agents and their response destinations.
///
/// Entries are never removed: an agent finishing does not invalidate its
/// entry, and a duplicate join simply appends. The registry is bounded; a
/// join beyond the bound is ignored with a warning and existing agents are
/// unaffected. `H` is the transport's reply handle type.
#[derive(Debug)]
pub struct AgentRegistry<H> {
    max_agents: usize,
    inner: Mutex<Vec<RegisteredAgent<H>>>,
}

impl<H> AgentRegistry<H> {
    pub fn new(max_agents: usize) -> AgentRegistry<H> {
        AgentRegistry { max_agents, inner: Mutex::new(Vec::new()) }
    }

    /// Registers an agent.
    ///
    /// # Returns
    /// `false` when the registry is full and the join was ignored.
    pub fn register(&self, name: impl Into<String>, reply: H) -> bool {
        let mut agents = self.inner.lock().expect("Mutex poisoned");
        if agents.len() >= self.max_agents {
            return false;
        }
        agents.push(RegisteredAgent { name: name.into(), reply });
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
