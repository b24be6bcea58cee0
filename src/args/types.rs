use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskSet {
    Crud,
    Smoke,
    Batch,
}

impl TaskSet {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskSet::Crud => "crud",
            TaskSet::Smoke => "smoke",
            TaskSet::Batch => "batch",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Users,
    Clients,
    Roles,
    Groups,
    ClientScopes,
}

impl ResourceKind {
    #[must_use]
    pub const fn all() -> [ResourceKind; 5] {
        [
            ResourceKind::Users,
            ResourceKind::Clients,
            ResourceKind::Roles,
            ResourceKind::Groups,
            ResourceKind::ClientScopes,
        ]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Clients => "clients",
            ResourceKind::Roles => "roles",
            ResourceKind::Groups => "groups",
            ResourceKind::ClientScopes => "client-scopes",
        }
    }
}

/// Inter-iteration pause range in whole seconds, uniformly sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min_secs: u64,
    max_secs: u64,
}

impl ThinkTime {
    /// Build a think-time range.
    ///
    /// # Errors
    ///
    /// Returns an error when the minimum exceeds the maximum.
    pub const fn new(min_secs: u64, max_secs: u64) -> Result<Self, ValidationError> {
        if min_secs > max_secs {
            return Err(ValidationError::ThinkTimeReversed);
        }
        Ok(Self { min_secs, max_secs })
    }

    #[must_use]
    pub const fn min_secs(self) -> u64 {
        self.min_secs
    }

    #[must_use]
    pub const fn max_secs(self) -> u64 {
        self.max_secs
    }

    /// Sample a pause from the range. A `0-0` range disables the pause.
    pub fn sample<R: rand::Rng>(self, rng: &mut R) -> Duration {
        if self.max_secs == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }
}

impl std::str::FromStr for ThinkTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min_str, max_str) =
            s.split_once('-')
                .ok_or_else(|| ValidationError::InvalidThinkTime {
                    value: s.to_owned(),
                })?;
        let min_secs: u64 =
            min_str
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidThinkTime {
                    value: s.to_owned(),
                })?;
        let max_secs: u64 =
            max_str
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidThinkTime {
                    value: s.to_owned(),
                })?;
        ThinkTime::new(min_secs, max_secs)
    }
}

impl std::fmt::Display for ThinkTime {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}-{}", self.min_secs, self.max_secs)
    }
}

impl<'de> Deserialize<'de> for ThinkTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse::<ThinkTime>().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ThinkTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}
