//! Backend identification from instance version strings.
//!
//! Servers report a free-form version such as `"4.2.0"` or
//! `"2.7.2 (compatible; Pleroma 2.4.50+akkoma)"`. The outer version is a
//! compatibility claim against the reference implementation; the
//! parenthesized clause names the actual software, its own version, and an
//! optional build tag after `+`. Anything that doesn't match the grammar
//! degrades to a sentinel identity so every capability check falls back to
//! its most conservative default.

use std::cmp::Ordering;

use serde_json::Value;

/// Canonical software names as they appear in version strings.
pub mod software {
    pub const MASTODON: &str = "Mastodon";
    pub const PLEROMA: &str = "Pleroma";
    pub const AKKOMA: &str = "Akkoma";
    pub const GOTOSOCIAL: &str = "GoToSocial";
    pub const MITRA: &str = "Mitra";
    pub const FRIENDICA: &str = "Friendica";
    pub const PIXELFED: &str = "Pixelfed";
    pub const FIREFISH: &str = "Firefish";
    pub const ICESHRIMP: &str = "Iceshrimp";
    pub const ICESHRIMP_NET: &str = "Iceshrimp.NET";
    pub const SHARKEY: &str = "Sharkey";
    pub const HOMETOWN: &str = "Hometown";
    pub const GLITCH: &str = "Glitch";
    pub const TOKI: &str = "Toki";
    pub const DITTO: &str = "Ditto";
    pub const PL: &str = "Pl";
}

/// Structured identity of the server software behind an instance.
///
/// Derived from the instance version string (plus structural hints in the
/// raw payload), immutable, and recomputed whenever a new instance snapshot
/// is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendIdentity {
    /// Actual software name, `None` when the version string is unparseable.
    pub software: Option<String>,
    /// Build tag appended after `+` in the inner version, e.g. `akkoma`.
    pub build: Option<String>,
    /// The software's own version.
    pub version: String,
    /// The outer compatibility-claim version (reference API level).
    pub compat_version: String,
}

impl Default for BackendIdentity {
    fn default() -> Self {
        Self::unknown()
    }
}

impl BackendIdentity {
    /// Sentinel identity: unknown software, version `0.0.0`. Every
    /// version-gated capability evaluates to its conservative default.
    pub fn unknown() -> Self {
        BackendIdentity {
            software: None,
            build: None,
            version: "0.0.0".into(),
            compat_version: "0.0.0".into(),
        }
    }

    /// Parse a raw version string.
    pub fn parse(raw: &str) -> Self {
        parse_version_string(raw)
    }

    /// Identify the backend from a version string plus the raw instance
    /// payload. Runs the pre-normalization pass for servers whose version
    /// strings misreport their software before handing off to the grammar.
    pub fn from_instance(version: &str, raw: &Value) -> Self {
        let rewritten = pre_normalize(version, raw);
        parse_version_string(&rewritten)
    }

    /// True when the identified software equals `name`.
    pub fn is(&self, name: &str) -> bool {
        self.software.as_deref() == Some(name)
    }

    /// True when the software is `name` at version `min` or later.
    pub fn gte(&self, name: &str, min: &str) -> bool {
        self.is(name) && cmp_versions(&self.version, min) != Ordering::Less
    }

    /// True when the software is `name` at a version strictly before `max`.
    pub fn lt(&self, name: &str, max: &str) -> bool {
        self.is(name) && cmp_versions(&self.version, max) == Ordering::Less
    }

    /// True when the build tag equals `tag`.
    pub fn build_is(&self, tag: &str) -> bool {
        self.build.as_deref() == Some(tag)
    }
}

/// Rewrite known non-conformant version strings before parsing.
///
/// This is deliberately outside the grammar: detection relies on structural
/// signals in the raw instance payload rather than the string itself.
fn pre_normalize(version: &str, raw: &Value) -> String {
    // Ditto reuses the reference version string verbatim but marks itself
    // with a top-level `ditto` configuration block.
    if raw.get("ditto").is_some_and(Value::is_object) && !version.contains("(compatible;") {
        return format!("{version} (compatible; Ditto {version})");
    }

    // GoToSocial appends a git describe after the version, outside any
    // compatibility clause: "0.17.3 git-9fc2b87". Collapse it into the
    // conformant shape.
    if let Some((head, tail)) = version.split_once(' ') {
        if tail.starts_with("git-") && !version.contains('(') {
            return format!("{head} (compatible; GoToSocial {head})");
        }
    }

    version.to_string()
}

fn looks_like_version(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse `<outer>[ (compatible; <Name> <inner[+build]>)]` into a
/// [`BackendIdentity`]. Inputs outside the grammar return the sentinel.
fn parse_version_string(raw: &str) -> BackendIdentity {
    let raw = raw.trim();

    let Some(open) = raw.find("(compatible;") else {
        // Bare version: a compatibility claim by the reference software
        // about itself.
        if !looks_like_version(raw) || raw.contains(' ') {
            return BackendIdentity::unknown();
        }
        return BackendIdentity {
            software: Some(software::MASTODON.into()),
            build: None,
            version: raw.to_string(),
            compat_version: raw.to_string(),
        };
    };

    let outer = raw[..open].trim();
    let inner = raw[open + "(compatible;".len()..]
        .trim_end_matches(')')
        .trim();

    let Some((name, inner_version)) = inner.rsplit_once(' ') else {
        return BackendIdentity::unknown();
    };
    if !looks_like_version(outer) || !looks_like_version(inner_version) || name.is_empty() {
        return BackendIdentity::unknown();
    }

    let (version, build) = match inner_version.split_once('+') {
        Some((v, b)) if !b.is_empty() => (v.to_string(), Some(b.to_string())),
        _ => (inner_version.to_string(), None),
    };

    BackendIdentity {
        software: Some(name.to_string()),
        build,
        version,
        compat_version: outer.to_string(),
    }
}

/// Order two dot-separated versions numerically.
///
/// Missing fields count as zero; anything after the first `-` or `+` is
/// ignored, and non-numeric fields compare as zero. `"4.10.0"` sorts after
/// `"4.9.9"`, `"2024.03"` after `"2023.12"`.
pub fn cmp_versions(a: &str, b: &str) -> Ordering {
    fn core(v: &str) -> Vec<u64> {
        let end = v.find(['-', '+', ' ']).unwrap_or(v.len());
        v[..end]
            .split('.')
            .map(|part| part.parse::<u64>().unwrap_or(0))
            .collect()
    }

    let (a, b) = (core(a), core(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let (x, y) = (a.get(i).copied().unwrap_or(0), b.get(i).copied().unwrap_or(0));
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}
