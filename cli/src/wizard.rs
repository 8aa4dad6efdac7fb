//! Step machine behind `oeh-cli rate`.
//!
//! The wizard only holds input; network calls happen in the command loop,
//! which advances the wizard once the server accepted a step.

use serde::Serialize;

const CODE_LEN: usize = 5;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Email,
    Code,
    Effort,
    Difficulty,
    Review,
    Submitted,
}

impl Step {
    fn previous(self) -> Self {
        match self {
            Self::Email | Self::Code => Self::Email,
            Self::Effort => Self::Code,
            Self::Difficulty => Self::Effort,
            Self::Review => Self::Difficulty,
            Self::Submitted => Self::Submitted,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Bitte gib eine gültige E-Mail-Adresse ein")]
    InvalidEmail,
    #[error("Der Code besteht aus 5 Zeichen (A-Z ohne I/O, 2-9)")]
    InvalidCode,
    #[error("Bewertungen müssen zwischen 1 und 5 liegen")]
    RatingOutOfRange,
    #[error("expected step {expected:?}, wizard is at {actual:?}")]
    WrongStep { expected: Step, actual: Step },
}

/// Body of `POST /api/lva/submit-rating`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmitRating {
    pub email: String,
    pub code: String,
    pub lva_id: i64,
    pub effort_rating: i32,
    pub difficulty_rating: i32,
}

#[derive(Clone, Debug)]
pub struct RatingWizard {
    lva_id: i64,
    step: Step,
    email: String,
    code: String,
    effort: i32,
    difficulty: i32,
}

impl RatingWizard {
    #[must_use]
    pub fn new(lva_id: i64) -> Self {
        Self { lva_id, step: Step::Email, email: String::new(), code: String::new(), effort: 0, difficulty: 0 }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn lva_id(&self) -> i64 {
        self.lva_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// # Errors
    ///
    /// `InvalidEmail` unless the address has exactly one `@` with text on
    /// both sides.
    pub fn enter_email(&mut self, email: &str) -> Result<(), WizardError> {
        self.expect(Step::Email)?;
        let email = email.trim().to_lowercase();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
        if !valid {
            return Err(WizardError::InvalidEmail);
        }
        self.email = email;
        self.step = Step::Code;
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidCode` for anything but five characters of the code alphabet.
    pub fn enter_code(&mut self, code: &str) -> Result<(), WizardError> {
        self.expect(Step::Code)?;
        let code = code.trim().to_ascii_uppercase();
        if code.len() != CODE_LEN || !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(WizardError::InvalidCode);
        }
        self.code = code;
        self.step = Step::Effort;
        Ok(())
    }

    /// # Errors
    ///
    /// `RatingOutOfRange` outside `1..=5`.
    pub fn rate_effort(&mut self, value: i32) -> Result<(), WizardError> {
        self.expect(Step::Effort)?;
        self.effort = checked_rating(value)?;
        self.step = Step::Difficulty;
        Ok(())
    }

    /// # Errors
    ///
    /// `RatingOutOfRange` outside `1..=5`.
    pub fn rate_difficulty(&mut self, value: i32) -> Result<(), WizardError> {
        self.expect(Step::Difficulty)?;
        self.difficulty = checked_rating(value)?;
        self.step = Step::Review;
        Ok(())
    }

    /// One step back. Stays at `Email`, and a submitted rating is final.
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    /// The request body, available only while reviewing.
    #[must_use]
    pub fn payload(&self) -> Option<SubmitRating> {
        (self.step == Step::Review).then(|| SubmitRating {
            email: self.email.clone(),
            code: self.code.clone(),
            lva_id: self.lva_id,
            effort_rating: self.effort,
            difficulty_rating: self.difficulty,
        })
    }

    /// # Errors
    ///
    /// `WrongStep` unless the wizard is in `Review`.
    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        self.expect(Step::Review)?;
        self.step = Step::Submitted;
        Ok(())
    }

    fn expect(&self, expected: Step) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep { expected, actual: self.step })
        }
    }
}

fn checked_rating(value: i32) -> Result<i32, WizardError> {
    if (1..=5).contains(&value) { Ok(value) } else { Err(WizardError::RatingOutOfRange) }
}

#[cfg(test)]
#[path = "wizard_test.rs"]
mod tests;
