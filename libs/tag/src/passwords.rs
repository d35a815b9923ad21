//! Password key convention and the process-wide configuration snapshot.
//!
//! Rewriting a tag needs per-format security parameters. Configuration files
//! spell them as string keys following the `"<FormatName>.<passwordType>"`
//! convention (`"DE290.access"`, `"BR.secret"`, ...); building a snapshot
//! parses each key into a typed [`PasswordKey`] once, so later lookups
//! cannot misspell a format or kind.
//!
//! Resolution never fails: a key that is not configured resolves to a
//! conspicuous placeholder value, and building a snapshot reports problems
//! as [`SnapshotWarning`] values instead of rejecting the configuration.
//! Readers keep running either way; the warnings exist so an operator can
//! see that tags written with placeholder passwords are not protected.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::formats::TagFormat;

/// Marker substring identifying an unconfigured placeholder password.
pub const PLACEHOLDER_MARKER: &str = "CHANGE-ME";

/// The kind of security parameter a format consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordKind {
    Access,
    Kill,
    Secret,
}

impl PasswordKind {
    /// The value an unconfigured key resolves to. Contains
    /// [`PLACEHOLDER_MARKER`] and names the kind, so a placeholder that ends
    /// up on a written tag is recognizable in the field.
    pub const fn placeholder(self) -> &'static str {
        match self {
            PasswordKind::Access => "CHANGE-ME-IN-YAML-ACCESS",
            PasswordKind::Kill => "CHANGE-ME-IN-YAML-KILL",
            PasswordKind::Secret => "CHANGE-ME-IN-YAML-SECRET",
        }
    }

    /// The spelling used in configuration keys.
    pub const fn name(self) -> &'static str {
        match self {
            PasswordKind::Access => "access",
            PasswordKind::Kill => "kill",
            PasswordKind::Secret => "secret",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "access" => Some(PasswordKind::Access),
            "kill" => Some(PasswordKind::Kill),
            "secret" => Some(PasswordKind::Secret),
            _ => None,
        }
    }
}

impl fmt::Display for PasswordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed password lookup key: a format identifier plus a password kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PasswordKey {
    pub format: TagFormat,
    pub kind: PasswordKind,
}

impl PasswordKey {
    pub const fn new(format: TagFormat, kind: PasswordKind) -> Self {
        Self { format, kind }
    }

    /// Parse the external `"<FormatName>.<passwordType>"` spelling.
    pub fn parse(key: &str) -> Option<Self> {
        let (format_name, kind_name) = key.split_once('.')?;
        Some(Self {
            format: TagFormat::from_name(format_name)?,
            kind: PasswordKind::from_name(kind_name)?,
        })
    }

    /// Whether any decoder ever consults this key.
    ///
    /// The numeric variants resolve through their owner format, so e.g.
    /// `DE290F.access` parses but is never read. Only the barcode format has
    /// a secret password, and it has nothing else.
    pub fn is_consulted(self) -> bool {
        if self.format.password_owner() != self.format {
            return false;
        }
        match self.format {
            TagFormat::Br => self.kind == PasswordKind::Secret,
            _ => matches!(self.kind, PasswordKind::Access | PasswordKind::Kill),
        }
    }
}

impl fmt::Display for PasswordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.format, self.kind)
    }
}

/// Advisory findings from building a snapshot. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotWarning {
    /// The key did not follow the `<FormatName>.<passwordType>` convention
    /// or named an unknown format or kind. The entry was skipped.
    UnknownKey { key: String },
    /// The key parsed but no decoder ever reads it. The entry was skipped.
    UnconsultedKey { key: PasswordKey },
    /// The value still contains [`PLACEHOLDER_MARKER`]. The entry was kept.
    PlaceholderValue { key: PasswordKey },
}

/// Immutable password configuration.
///
/// Built once from the external string map and only ever replaced as a
/// whole, so every lookup against one snapshot sees a single consistent
/// configuration.
#[derive(Clone)]
pub struct PasswordSnapshot {
    entries: HashMap<PasswordKey, String>,
    default_format: TagFormat,
}

impl PasswordSnapshot {
    /// Build a snapshot from the external string-keyed map.
    ///
    /// Pure: findings are returned, not logged. Building never fails;
    /// unusable entries are skipped and reported.
    pub fn from_string_map(
        passwords: &HashMap<String, String>,
        default_format: TagFormat,
    ) -> (Self, Vec<SnapshotWarning>) {
        let mut entries = HashMap::with_capacity(passwords.len());
        let mut warnings = Vec::new();
        for (raw_key, value) in passwords {
            let Some(key) = PasswordKey::parse(raw_key) else {
                warnings.push(SnapshotWarning::UnknownKey {
                    key: raw_key.clone(),
                });
                continue;
            };
            if !key.is_consulted() {
                warnings.push(SnapshotWarning::UnconsultedKey { key });
                continue;
            }
            if value.contains(PLACEHOLDER_MARKER) {
                // Flagged but kept: a placeholder is a configured value,
                // just not a safe one.
                warnings.push(SnapshotWarning::PlaceholderValue { key });
            }
            entries.insert(key, value.clone());
        }
        let snapshot = Self {
            entries,
            default_format,
        };
        (snapshot, warnings)
    }

    /// Resolve the password a format's decoder should use for `kind`.
    ///
    /// The lookup goes through [`TagFormat::password_owner`]; a missing key
    /// resolves to the kind's placeholder, never to an absent value.
    pub fn resolve(&self, format: TagFormat, kind: PasswordKind) -> String {
        let key = PasswordKey::new(format.password_owner(), kind);
        match self.entries.get(&key) {
            Some(value) => value.clone(),
            None => kind.placeholder().to_string(),
        }
    }

    /// The format newly written tags should use.
    pub fn default_format(&self) -> TagFormat {
        self.default_format
    }

    /// Number of configured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PasswordSnapshot {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            default_format: TagFormat::De290,
        }
    }
}

// Password values stay out of Debug output; only the shape is shown.
impl fmt::Debug for PasswordSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordSnapshot")
            .field("entries", &self.entries.len())
            .field("default_format", &self.default_format)
            .finish()
    }
}

/// Shared handle to the current [`PasswordSnapshot`].
///
/// Clones share the same slot. [`PasswordStore::snapshot`] hands out the
/// current `Arc`; installing replaces the whole snapshot in one swap, so a
/// decoder holding a snapshot keeps a consistent view while new calls see
/// the new configuration.
#[derive(Debug, Clone, Default)]
pub struct PasswordStore {
    current: Arc<RwLock<Arc<PasswordSnapshot>>>,
}

impl PasswordStore {
    /// A store holding an empty snapshot: every key resolves to its
    /// placeholder and the default format is DE290.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<PasswordSnapshot> {
        self.current.read().clone()
    }

    /// Install a prebuilt snapshot.
    pub fn install(&self, snapshot: PasswordSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    /// Build a snapshot from the external string map, log its findings and
    /// install it. Returns the findings for callers that surface them
    /// elsewhere.
    pub fn install_from_map(
        &self,
        passwords: &HashMap<String, String>,
        default_format: TagFormat,
    ) -> Vec<SnapshotWarning> {
        let (snapshot, warnings) = PasswordSnapshot::from_string_map(passwords, default_format);
        for warning in &warnings {
            match warning {
                SnapshotWarning::UnknownKey { key } => {
                    warn!(key = %key, "Ignoring password entry with unrecognized key");
                }
                SnapshotWarning::UnconsultedKey { key } => {
                    warn!(
                        key = %key,
                        owner = %key.format.password_owner(),
                        "Password key is never consulted; configure the owner format instead"
                    );
                }
                SnapshotWarning::PlaceholderValue { key } => {
                    warn!(
                        key = %key,
                        "SECURITY: password still has a placeholder value, tags are not protected"
                    );
                }
            }
        }
        info!(
            entries = snapshot.len(),
            default_format = %snapshot.default_format(),
            "Installed password configuration"
        );
        self.install(snapshot);
        warnings
    }
}
