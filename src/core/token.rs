//! Strategy tokens: consumable attack-mode quotas

use std::{fmt::Display, str::FromStr};

use anyhow::{ensure, Result};

use super::mode::AttackMode;

/// An ordered string of attack modes Red spends as a unit (or progressively)
/// during one round's kill phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrategyToken(String);

impl StrategyToken {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        ensure!(!s.is_empty(), "strategy token must not be empty");
        ensure!(
            s.chars().all(|c| c == '0' || c == '1'),
            "strategy token must be binary: {:?}", s
        );
        Ok(Self(s))
    }

    /// Number of attacks this token pays for.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token's attack modes in order.
    pub fn modes(&self) -> Vec<AttackMode> {
        self.0
            .chars()
            .map(|c| AttackMode::from_char(c).unwrap())
            .collect()
    }
}

impl FromStr for StrategyToken {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for StrategyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
