/// The state of one connection attempt inside a race.
///
/// `Pending -> Dialing -> {Succeeded, Failed, Canceled}`. An attempt
/// cancelled before it starts goes straight from `Pending` to `Canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptState {
    /// Spawned, not yet polled.
    #[default]
    Pending,

    /// The connect call is in flight.
    Dialing,

    /// Produced a connection (which may still lose the race).
    Succeeded,

    /// The connect call returned an error.
    Failed,

    /// The shared cancellation signal fired before the connect finished.
    Canceled,
}

impl AttemptState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: AttemptState) -> bool {
        use AttemptState::*;
        matches!(
            (self, next),
            (Pending, Dialing) | (Pending, Canceled) | (Dialing, Succeeded | Failed | Canceled)
        )
    }

    /// Returns true once the attempt can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// The state of one dial call.
///
/// `Splitting -> Resolving -> Racing -> {CompletedSuccess, CompletedFailure}`.
/// Any state may jump straight to `CompletedFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialState {
    /// Parsing the network kind and splitting `host:port`.
    #[default]
    Splitting,

    /// Waiting on name resolution.
    Resolving,

    /// Connection attempts are in flight.
    Racing,

    /// A connection was handed to the caller.
    CompletedSuccess,

    /// An error was handed to the caller.
    CompletedFailure,
}

impl DialState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: DialState) -> bool {
        use DialState::*;
        match (self, next) {
            (Splitting, Resolving) | (Resolving, Racing) | (Racing, CompletedSuccess) => true,
            (Splitting | Resolving | Racing, CompletedFailure) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CompletedSuccess | Self::CompletedFailure)
    }
}
