//! Identities, versions and urls of linked specifications.
use std::fmt;
use std::str;

use apollo_compiler::Name;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SpecError {
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SpecError {
    fn url(reason: impl fmt::Display) -> Self {
        SpecError::ParseError(format!("invalid `@link` specification url: {reason}"))
    }
}

/// A linked specification, independently of its version: the url it lives under plus its
/// name, for instance `https://specs.apollo.dev` and `federation`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Identity {
    pub domain: String,
    pub name: Name,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl str::FromStr for Version {
    type Err = SpecError;

    /// Reads `MAJOR.MINOR`, ignoring any further numeric components such as a patch number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |part: &str, which: &str| {
            part.parse::<u32>().map_err(|_| {
                SpecError::ParseError(format!("invalid {which} version number '{part}'"))
            })
        };
        let mut parts = s.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().ok_or_else(|| {
            SpecError::ParseError("version number is missing a dot (.)".to_string())
        })?;
        let version = Version {
            major: number(major, "major")?,
            minor: number(minor, "minor")?,
        };
        for patch in parts {
            number(patch, "patch")?;
        }
        Ok(version)
    }
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }

    /// Whether an element introduced in `required` is available in this version.
    ///
    ///     # use schema_builder::link::spec::Version;
    ///     assert!(Version::new(2, 6).satisfies(&Version::new(2, 5)));
    ///     assert!(!Version::new(2, 4).satisfies(&Version::new(2, 5)));
    ///     assert!(!Version::new(3, 0).satisfies(&Version::new(2, 5)));
    pub fn satisfies(&self, required: &Version) -> bool {
        self.major == required.major && self.minor >= required.minor
    }
}

/// One version of a specification, as written in the `url` argument of `@link`: the identity
/// followed by a `vMAJOR.MINOR` path segment.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Url {
    pub identity: Identity,
    pub version: Version,
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/v{}", self.identity, self.version)
    }
}

impl str::FromStr for Url {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = url::Url::parse(s).map_err(SpecError::url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SpecError::url("only http(s) urls are supported"));
        }
        let host = url.host_str().ok_or_else(|| SpecError::url("missing host"))?;
        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let version = segments
            .pop()
            .and_then(|segment| segment.strip_prefix('v'))
            .ok_or_else(|| SpecError::url("the last path segment must be a version starting with 'v'"))?
            .parse::<Version>()?;
        let name = segments
            .pop()
            .ok_or_else(|| SpecError::url("missing specification name"))?;
        let name = Name::new(name).map_err(|e| {
            SpecError::ParseError(format!("invalid `@link` specification name: {e}"))
        })?;

        let mut domain = format!("{}://{host}", url.scheme());
        for segment in segments {
            domain.push('/');
            domain.push_str(segment);
        }
        Ok(Url {
            identity: Identity { domain, name },
            version,
        })
    }
}
