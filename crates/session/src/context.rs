use taskdeck_api::Identity;
use taskdeck_api_client::AuthChange;
use taskdeck_core::Profile;

/// Where the session stands. `Uninitialized` and `Initializing` both read as
/// loading; the split exists so bootstrap runs exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Authenticated {
        identity: Identity,
        profile: Option<Profile>,
    },
    Anonymous,
}

/// The session state machine.
///
/// All identity changes arrive as [`AuthChange`] reports carrying a strictly
/// increasing sequence number, and the context applies them last-writer-wins
/// by that number. A profile hydration result is stamped with the sequence of
/// the report that triggered it, so a slow fetch for a previous identity is
/// dropped instead of overwriting the current one.
#[derive(Debug)]
pub struct SessionContext {
    state: SessionState,
    last_seq: u64,
    auth_op_in_flight: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            last_seq: 0,
            auth_op_in_flight: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sequence number of the newest auth report applied so far.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match &self.state {
            SessionState::Authenticated { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }

    /// Loading covers the bootstrap window and any in-flight auth operation.
    pub fn is_loading(&self) -> bool {
        self.auth_op_in_flight
            || matches!(
                self.state,
                SessionState::Uninitialized | SessionState::Initializing
            )
    }

    /// Start the one-time bootstrap. Returns `true` only on the first call;
    /// later calls are no-ops so bootstrap work is never duplicated.
    pub fn begin_bootstrap(&mut self) -> bool {
        if self.state == SessionState::Uninitialized {
            self.state = SessionState::Initializing;
            true
        } else {
            false
        }
    }

    pub fn begin_auth_op(&mut self) {
        self.auth_op_in_flight = true;
    }

    pub fn finish_auth_op(&mut self) {
        self.auth_op_in_flight = false;
    }

    /// Apply an auth-state report. Reports older than the newest one already
    /// applied are ignored; a fresh identity starts with no profile until
    /// hydration lands.
    pub fn apply_auth_change(&mut self, change: &AuthChange) {
        if change.seq < self.last_seq {
            return;
        }
        self.last_seq = change.seq;
        self.state = match &change.identity {
            Some(identity) => SessionState::Authenticated {
                identity: identity.clone(),
                profile: None,
            },
            None => SessionState::Anonymous,
        };
    }

    /// Apply a profile hydration result stamped with the sequence of the
    /// report that requested it. Stale results are dropped; a failed fetch
    /// (`None`) keeps the identity with no profile.
    pub fn apply_profile(&mut self, seq: u64, fetched: Option<Profile>) {
        if seq < self.last_seq {
            return;
        }
        if let SessionState::Authenticated { profile, .. } = &mut self.state {
            *profile = fetched;
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
