//! Backend names and dialects.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How a backend spells field-qualified terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Accepts `"text"[CODE]` as written.
    TagNative,
    /// Accepts field tags but spells publication-date ranges as
    /// `PUB_YEAR:(YYYY TO YYYY)`.
    YearRange,
    /// Has no field qualification; tags are removed.
    TagStripping,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagNative => write!(f, "tag-native"),
            Self::YearRange => write!(f, "year-range"),
            Self::TagStripping => write!(f, "tag-stripping"),
        }
    }
}

/// A literature search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// PubMed / MEDLINE.
    PubMed,
    /// Europe PMC.
    EuropePmc,
    /// The Cochrane Library.
    Cochrane,
}

impl Backend {
    /// All backends, in display order.
    pub const ALL: [Self; 3] = [Self::PubMed, Self::EuropePmc, Self::Cochrane];

    /// The canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::PubMed => "pubmed",
            Self::EuropePmc => "europepmc",
            Self::Cochrane => "cochrane",
        }
    }

    /// Other accepted names.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::PubMed => &[],
            Self::EuropePmc => &["europe_pmc", "epmc"],
            Self::Cochrane => &[],
        }
    }

    /// The field-tag dialect this backend speaks.
    pub fn dialect(self) -> Dialect {
        match self {
            Self::PubMed => Dialect::TagNative,
            Self::EuropePmc => Dialect::YearRange,
            Self::Cochrane => Dialect::TagStripping,
        }
    }

    /// A one-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::PubMed => "NCBI PubMed; field tags pass through unchanged",
            Self::EuropePmc => "Europe PMC; [pdat] year ranges become PUB_YEAR:(a TO b)",
            Self::Cochrane => "Cochrane Library; field tags are removed",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.name() == lower || b.aliases().contains(&lower.as_str()))
            .ok_or_else(|| format!("unknown backend: {s}"))
    }
}

/// A requested compilation target, which may name no known backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A known backend.
    Known(Backend),
    /// A name no backend answers to.
    Unknown(String),
}

impl Target {
    /// Resolves a backend name. Unknown names are kept rather than rejected.
    pub fn resolve(name: &str) -> Self {
        name.parse()
            .map_or_else(|_| Self::Unknown(name.to_string()), Self::Known)
    }
}

impl From<Backend> for Target {
    fn from(backend: Backend) -> Self {
        Self::Known(backend)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(backend) => write!(f, "{backend}"),
            Self::Unknown(name) => write!(f, "{name}"),
        }
    }
}
