use std::fmt;

/// Phases of an assignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Init,
    ResolvePlayers,
    AllocateImages,
    Persist,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::ResolvePlayers => "resolve players",
            Self::AllocateImages => "allocate images",
            Self::Persist => "persist",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress update sent during an assignment run.
///
/// Purely observational; fractions only ever increase within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignProgress {
    /// A new step of the run has started
    Phase {
        state: RunState,
        /// Human-readable description of the step
        message: String,
        fraction: f32,
    },

    /// A player has been handled during allocation
    Player {
        /// 1-based position in export order
        index: usize,
        total: usize,
        player_id: String,
        fraction: f32,
    },

    /// The run finished (possibly with skipped players)
    Completed,

    /// The run was aborted
    Failed { message: String },
}

impl AssignProgress {
    pub fn phase(state: RunState, message: impl Into<String>, fraction: f32) -> Self {
        Self::Phase {
            state,
            message: message.into(),
            fraction,
        }
    }

    pub fn player(index: usize, total: usize, player_id: impl Into<String>) -> Self {
        Self::Player {
            index,
            total,
            player_id: player_id.into(),
            fraction: allocation_fraction(index, total),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns the overall progress (0.0 to 1.0) if this update carries one.
    pub fn fraction(&self) -> Option<f32> {
        match self {
            Self::Phase { fraction, .. } | Self::Player { fraction, .. } => Some(*fraction),
            Self::Completed => Some(1.0),
            Self::Failed { .. } => None,
        }
    }
}

/// Allocation spans 0.5..=0.9 of the run.
fn allocation_fraction(index: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.9;
    }
    0.5 + (index as f32 / total as f32) * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_fraction_range() {
        assert_eq!(AssignProgress::player(0, 10, "x").fraction(), Some(0.5));
        let last = AssignProgress::player(10, 10, "x").fraction().unwrap();
        assert!((last - 0.9).abs() < 1e-6);
        assert_eq!(AssignProgress::player(1, 0, "x").fraction(), Some(0.9));
        assert_eq!(AssignProgress::failed("x").fraction(), None);
    }
}
