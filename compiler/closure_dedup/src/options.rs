//! Deduplication options.
//!
//! Options come from the compiler's hidden `-XD` switches. Only switches
//! owned by this pass are interpreted; everything else passes through
//! untouched.
//!
//! | Switch | Effect |
//! |--------|--------|
//! | `deduplicateLambdas=false` | every lambda gets its own method |
//! | `dedup.capturePolicy=positional\|identity` | capture comparison policy |
//! | `dedup.maxDepth=N` | recursion budget for walks |
//! | `debug.dumpLambdaToMethodDeduplication` | note every folded lambda |
//! | `debug.dumpLambdaToMethodStats` | note every generated method |
//! | `dedup.trace` | record every comparison outcome |

use bitflags::bitflags;

/// Default recursion budget for a single hash or comparison walk.
pub const DEFAULT_MAX_DEPTH: usize = 100_000;

/// How captured variables in the same capture position are compared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapturePolicy {
    /// Same capture index and identical capture type. The captured variables
    /// themselves may differ: each call site passes its own values.
    #[default]
    Positional,
    /// Additionally require the same captured variable.
    Identity,
}

bitflags! {
    /// Debug output switches.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DedupFlags: u8 {
        /// Emit a note for every lambda folded into an existing method.
        const DUMP_DEDUPLICATION = 1 << 0;
        /// Emit a note for every generated implementation method.
        const DUMP_STATS = 1 << 1;
        /// Record the outcome of every differ invocation on the plan.
        const TRACE_COMPARISONS = 1 << 2;
    }
}

/// Malformed value for a recognized switch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid value `{value}` for `{key}`: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Configuration of one deduplication run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupOptions {
    /// When `false`, every lambda becomes its own class.
    pub deduplicate: bool,
    pub capture_policy: CapturePolicy,
    /// Maximum tree depth a walk may reach before reporting
    /// [`DedupError::DepthExceeded`](crate::DedupError::DepthExceeded).
    pub max_depth: usize,
    pub flags: DedupFlags,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            deduplicate: true,
            capture_policy: CapturePolicy::Positional,
            max_depth: DEFAULT_MAX_DEPTH,
            flags: DedupFlags::empty(),
        }
    }
}

impl DedupOptions {
    #[must_use]
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    #[must_use]
    pub fn with_capture_policy(mut self, policy: CapturePolicy) -> Self {
        self.capture_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DedupFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Build options from `-XD`-style switches (`key` or `key=value`, with
    /// or without the `-XD` prefix).
    pub fn from_flags<I, S>(switches: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for switch in switches {
            let switch = switch.as_ref();
            let switch = switch.strip_prefix("-XD").unwrap_or(switch);
            let (key, value) = match switch.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (switch, None),
            };
            match key {
                "deduplicateLambdas" => {
                    options.deduplicate = parse_bool("deduplicateLambdas", value)?;
                }
                "dedup.capturePolicy" => {
                    options.capture_policy = match value {
                        Some("positional") => CapturePolicy::Positional,
                        Some("identity") => CapturePolicy::Identity,
                        other => {
                            return Err(OptionsError::InvalidValue {
                                key: "dedup.capturePolicy",
                                value: other.unwrap_or_default().to_owned(),
                                expected: "`positional` or `identity`",
                            })
                        }
                    };
                }
                "dedup.maxDepth" => {
                    let raw = value.unwrap_or_default();
                    options.max_depth = raw
                        .parse::<usize>()
                        .ok()
                        .filter(|depth| *depth > 0)
                        .ok_or_else(|| OptionsError::InvalidValue {
                            key: "dedup.maxDepth",
                            value: raw.to_owned(),
                            expected: "a positive integer",
                        })?;
                }
                "debug.dumpLambdaToMethodDeduplication" => {
                    let on = parse_bool("debug.dumpLambdaToMethodDeduplication", value)?;
                    options.flags.set(DedupFlags::DUMP_DEDUPLICATION, on);
                }
                "debug.dumpLambdaToMethodStats" => {
                    let on = parse_bool("debug.dumpLambdaToMethodStats", value)?;
                    options.flags.set(DedupFlags::DUMP_STATS, on);
                }
                "dedup.trace" => {
                    let on = parse_bool("dedup.trace", value)?;
                    options.flags.set(DedupFlags::TRACE_COMPARISONS, on);
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

/// A bare switch means `true`.
fn parse_bool(key: &'static str, value: Option<&str>) -> Result<bool, OptionsError> {
    match value {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(OptionsError::InvalidValue {
            key,
            value: other.to_owned(),
            expected: "`true` or `false`",
        }),
    }
}
