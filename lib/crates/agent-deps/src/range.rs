//! Version range satisfaction on top of the `semver` crate.
//!
//! `semver` parses comparators but has no notion of two requirements
//! overlapping, so each requirement is lowered to a version interval here.
//! Inputs follow npm conventions where they differ from Cargo's: a bare
//! version is exact, comparators may be space separated, and `||` and
//! hyphen ranges are accepted.
//!
//! Pre-release versions follow the usual opt-in rule: `2.0.0-beta.1` only
//! satisfies a requirement that has a comparator on `2.0.0` carrying a
//! pre-release tag, even when it falls inside the interval.

use std::cmp::Ordering;

use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};

use crate::error::RangeError;

/// A parsed range: a union of alternatives, one per `||` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<Alternative>,
}

/// One comparator set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Alternative {
    interval: Interval,
    /// `major.minor.patch` releases whose pre-releases this set admits.
    prerelease_opt_in: Vec<Version>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: Version,
    inclusive: bool,
}

/// `upper == None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    lower: Bound,
    upper: Option<Bound>,
}

impl VersionRange {
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let mut alternatives = Vec::new();
        for alternative in input.split("||") {
            let normalized = normalize(alternative);
            let req = VersionReq::parse(&normalized).map_err(|source| RangeError::Syntax {
                input: input.to_string(),
                source,
            })?;

            let mut interval = Some(Interval::unbounded());
            let mut prerelease_opt_in = Vec::new();
            for comparator in &req.comparators {
                let bounds = comparator_interval(comparator).ok_or_else(|| {
                    RangeError::Unsupported {
                        input: input.to_string(),
                    }
                })?;
                interval = interval.and_then(|current| current.intersect(&bounds));
                if comparator.patch.is_some() && !comparator.pre.is_empty() {
                    let release = Version::new(
                        comparator.major,
                        comparator.minor.unwrap_or(0),
                        comparator.patch.unwrap_or(0),
                    );
                    if !prerelease_opt_in.contains(&release) {
                        prerelease_opt_in.push(release);
                    }
                }
            }

            let Some(interval) = interval else { continue };
            if admits_any(&interval, &prerelease_opt_in) {
                alternatives.push(Alternative {
                    interval,
                    prerelease_opt_in,
                });
            }
        }
        Ok(Self { alternatives })
    }

    /// Returns `true` if some version satisfies both ranges.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.alternatives
            .iter()
            .any(|a| other.alternatives.iter().any(|b| a.overlaps(b)))
    }

    /// Returns `true` if no version can satisfy the range.
    #[must_use]
    pub fn is_unsatisfiable(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl Alternative {
    /// A common version exists: a release inside both intervals, or a
    /// pre-release both sets opt into.
    fn overlaps(&self, other: &Self) -> bool {
        let Some(overlap) = self.interval.intersect(&other.interval) else {
            return false;
        };
        let shared: Vec<Version> = self
            .prerelease_opt_in
            .iter()
            .filter(|release| other.prerelease_opt_in.contains(release))
            .cloned()
            .collect();
        admits_any(&overlap, &shared)
    }
}

/// Whether `interval` holds a release, or a pre-release of one of `opt_in`.
fn admits_any(interval: &Interval, opt_in: &[Version]) -> bool {
    interval.contains(&interval.first_release())
        || opt_in.iter().any(|release| {
            prerelease_window(release)
                .is_some_and(|window| interval.intersect(&window).is_some())
        })
}

/// Every pre-release of `release`: from `X.Y.Z-0` up to, not including, `X.Y.Z`.
fn prerelease_window(release: &Version) -> Option<Interval> {
    let lowest = Version {
        pre: Prerelease::new("0").ok()?,
        ..release.clone()
    };
    Some(Interval::between(lowest, true, release.clone(), false))
}

/// Rewrites one npm-style alternative into `semver::VersionReq` syntax.
fn normalize(alternative: &str) -> String {
    let alternative = alternative.trim();
    if let Some((low, high)) = alternative.split_once(" - ") {
        return format!(">={}, <={}", strip_v(low.trim()), strip_v(high.trim()));
    }

    // `>= 1.0.0` splits into an operator-only token; glue it to its operand.
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for raw in alternative.split(|c: char| c == ',' || c.is_whitespace()) {
        if raw.is_empty() {
            continue;
        }
        if raw.chars().all(is_op_char) {
            pending_op.push_str(raw);
            continue;
        }
        let token = format!("{}{raw}", std::mem::take(&mut pending_op));
        tokens.push(normalize_token(&token));
    }

    if tokens.len() > 1 {
        tokens.retain(|t| t != "*");
    }
    if tokens.is_empty() {
        return "*".to_string();
    }
    tokens.join(", ")
}

fn normalize_token(token: &str) -> String {
    let split = token.find(|c: char| !is_op_char(c)).unwrap_or(token.len());
    let (op, operand) = token.split_at(split);
    let operand: Vec<&str> = strip_v(operand)
        .split('.')
        .map(|part| if part == "x" || part == "X" { "*" } else { part })
        .collect();
    let operand = operand.join(".");

    let is_wildcard = operand.contains('*');
    if op.is_empty() && !is_wildcard && operand.starts_with(|c: char| c.is_ascii_digit()) {
        format!("={operand}")
    } else {
        format!("{op}{operand}")
    }
}

fn is_op_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

fn strip_v(version: &str) -> &str {
    match version.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => version,
    }
}

/// Lowers one comparator to the interval of versions it admits.
///
/// Missing minor/patch components widen the interval to the whole prefix,
/// matching Cargo's reading of partial versions.
fn comparator_interval(c: &Comparator) -> Option<Interval> {
    let floor = Version {
        major: c.major,
        minor: c.minor.unwrap_or(0),
        patch: c.patch.unwrap_or(0),
        pre: if c.patch.is_some() {
            c.pre.clone()
        } else {
            Prerelease::EMPTY
        },
        build: BuildMetadata::EMPTY,
    };
    // First version past the stated prefix: `1` -> 2.0.0, `1.2` -> 1.3.0.
    let past_prefix = match (c.minor, c.patch) {
        (None, _) => Version::new(c.major.saturating_add(1), 0, 0),
        (Some(minor), None) => Version::new(c.major, minor.saturating_add(1), 0),
        (Some(_), Some(_)) => floor.clone(),
    };
    let fully_specified = c.patch.is_some();

    let interval = match c.op {
        Op::Exact | Op::Wildcard if fully_specified => {
            Interval::between(floor.clone(), true, floor, true)
        }
        Op::Exact | Op::Wildcard => Interval::between(floor, true, past_prefix, false),
        Op::Greater if fully_specified => Interval::at_least(floor, false),
        Op::Greater => Interval::at_least(past_prefix, true),
        Op::GreaterEq => Interval::at_least(floor, true),
        Op::Less => Interval::below(floor, false),
        Op::LessEq if fully_specified => Interval::below(floor, true),
        Op::LessEq => Interval::below(past_prefix, false),
        Op::Tilde => {
            let ceiling = match c.minor {
                None => Version::new(c.major.saturating_add(1), 0, 0),
                Some(minor) => Version::new(c.major, minor.saturating_add(1), 0),
            };
            Interval::between(floor, true, ceiling, false)
        }
        Op::Caret => {
            let ceiling = match (c.major, c.minor, c.patch) {
                (0, Some(0), Some(patch)) => Version::new(0, 0, patch.saturating_add(1)),
                (0, Some(minor), _) => Version::new(0, minor.saturating_add(1), 0),
                (major, _, _) => Version::new(major.saturating_add(1), 0, 0),
            };
            Interval::between(floor, true, ceiling, false)
        }
        _ => return None,
    };
    Some(interval)
}

impl Interval {
    fn unbounded() -> Self {
        Self::at_least(Version::new(0, 0, 0), true)
    }

    fn between(low: Version, low_inclusive: bool, high: Version, high_inclusive: bool) -> Self {
        Self {
            lower: Bound {
                version: low,
                inclusive: low_inclusive,
            },
            upper: Some(Bound {
                version: high,
                inclusive: high_inclusive,
            }),
        }
    }

    fn at_least(low: Version, inclusive: bool) -> Self {
        Self {
            lower: Bound {
                version: low,
                inclusive,
            },
            upper: None,
        }
    }

    fn below(high: Version, inclusive: bool) -> Self {
        Self::between(Version::new(0, 0, 0), true, high, inclusive)
    }

    /// Smallest release version at or above the lower bound.
    fn first_release(&self) -> Version {
        let low = &self.lower.version;
        if low.pre.is_empty() && !self.lower.inclusive {
            Version::new(low.major, low.minor, low.patch.saturating_add(1))
        } else {
            Version::new(low.major, low.minor, low.patch)
        }
    }

    fn is_empty(&self) -> bool {
        match &self.upper {
            None => false,
            Some(upper) => match self.lower.version.cmp(&upper.version) {
                Ordering::Less => false,
                Ordering::Equal => !(self.lower.inclusive && upper.inclusive),
                Ordering::Greater => true,
            },
        }
    }

    fn contains(&self, version: &Version) -> bool {
        let above_lower = match version.cmp(&self.lower.version) {
            Ordering::Greater => true,
            Ordering::Equal => self.lower.inclusive,
            Ordering::Less => false,
        };
        let below_upper = self
            .upper
            .as_ref()
            .is_none_or(|upper| match version.cmp(&upper.version) {
                Ordering::Less => true,
                Ordering::Equal => upper.inclusive,
                Ordering::Greater => false,
            });
        above_lower && below_upper
    }

    /// Overlap of two intervals, or `None` when they are disjoint.
    fn intersect(&self, other: &Self) -> Option<Self> {
        let lower = match self.lower.version.cmp(&other.lower.version) {
            Ordering::Greater => self.lower.clone(),
            Ordering::Less => other.lower.clone(),
            Ordering::Equal => Bound {
                version: self.lower.version.clone(),
                inclusive: self.lower.inclusive && other.lower.inclusive,
            },
        };
        let upper = match (&self.upper, &other.upper) {
            (None, None) => None,
            (Some(bound), None) | (None, Some(bound)) => Some(bound.clone()),
            (Some(a), Some(b)) => Some(match a.version.cmp(&b.version) {
                Ordering::Less => a.clone(),
                Ordering::Greater => b.clone(),
                Ordering::Equal => Bound {
                    version: a.version.clone(),
                    inclusive: a.inclusive && b.inclusive,
                },
            }),
        };
        let merged = Self { lower, upper };
        (!merged.is_empty()).then_some(merged)
    }
}
