//! Three ordered acknowledgments guarding the destructive path.
//!
//! Each stage accepts exactly one input. Anything that does not match moves
//! the sequence to `Aborted`; there is no retry.

use crate::utils::crypto::generate_token;

pub const CONFIRM_PHRASE: &str = "CONFIRM";
pub const DESTROY_PHRASE: &str = "DESTROY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitPhrase,
    AwaitToken,
    AwaitFinalPhrase,
    DryRunComplete,
    BackupPending,
    Aborted,
}

impl Stage {
    /// 1-based position for the three input stages.
    pub fn number(&self) -> Option<usize> {
        match self {
            Self::AwaitPhrase => Some(1),
            Self::AwaitToken => Some(2),
            Self::AwaitFinalPhrase => Some(3),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.number().is_none()
    }
}

#[derive(Debug)]
pub struct Confirmation {
    stage: Stage,
    token: String,
    dry_run: bool,
}

impl Confirmation {
    pub fn new(dry_run: bool) -> Self {
        Self::with_token(generate_token(), dry_run)
    }

    pub fn with_token(token: String, dry_run: bool) -> Self {
        Self {
            stage: Stage::AwaitPhrase,
            token,
            dry_run,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[cfg(test)]
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Flips dry-run while a stage is awaiting input. Returns whether it applied.
    pub fn toggle_dry_run(&mut self) -> bool {
        if self.stage.is_terminal() {
            return false;
        }
        self.dry_run = !self.dry_run;
        true
    }

    pub fn submit(&mut self, input: &str) -> Stage {
        let input = input.trim();
        self.stage = match self.stage {
            Stage::AwaitPhrase if input.eq_ignore_ascii_case(CONFIRM_PHRASE) => Stage::AwaitToken,
            Stage::AwaitToken if input == self.token => Stage::AwaitFinalPhrase,
            Stage::AwaitFinalPhrase if input.eq_ignore_ascii_case(DESTROY_PHRASE) => {
                if self.dry_run {
                    Stage::DryRunComplete
                } else {
                    Stage::BackupPending
                }
            }
            _ => Stage::Aborted,
        };
        self.stage
    }

    pub fn prompt(&self) -> String {
        match self.stage {
            Stage::AwaitPhrase => format!("Type '{}' to proceed", CONFIRM_PHRASE),
            Stage::AwaitToken => format!("Type token: {}", self.token),
            Stage::AwaitFinalPhrase => format!("Type '{}' to proceed", DESTROY_PHRASE),
            _ => String::new(),
        }
    }
}
