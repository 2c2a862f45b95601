//! Run targets: the repositories to scan and the project board to fill

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A repository in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(Error::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An organization project board in `org/number` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub org: String,
    pub number: u64,
}

impl ProjectRef {
    /// Web URL of the project board, used in progress logs
    pub fn url(&self) -> String {
        format!("https://github.com/orgs/{}/projects/{}", self.org, self.number)
    }
}

impl FromStr for ProjectRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidProject(s.to_string());

        match s.trim().split('/').collect::<Vec<_>>().as_slice() {
            [org, number] if !org.is_empty() => Ok(Self {
                org: (*org).to_string(),
                number: number.parse().map_err(|_| invalid())?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.number)
    }
}

/// Parsed targets for a single run
///
/// Immutable once built; a new one is parsed at the start of every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Repositories in the order they were configured
    pub repos: Vec<RepoRef>,
    /// Board that matching issues are added to
    pub project: ProjectRef,
}

impl RunConfig {
    /// Parse the raw comma-separated repository list and `org/number` project string
    ///
    /// Blank entries in the repository list are ignored. Any malformed entry
    /// rejects the whole configuration so that no run starts half-configured.
    pub fn parse(repos: Option<&str>, project: Option<&str>) -> Result<Self> {
        let repos = repos
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(RepoRef::from_str)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .filter(|repos| !repos.is_empty())
            .ok_or(Error::MissingRepos)?;

        let project = project
            .filter(|p| !p.trim().is_empty())
            .ok_or(Error::MissingProject)?
            .parse()?;

        Ok(Self { repos, project })
    }
}
