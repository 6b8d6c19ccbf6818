//! Composition of `defines.mk` and `libconfig.h`.
//!
//! Both artifacts are built as lists of typed [`Line`] records from a
//! [`Profile`] and the [`ResolvedEnv`], then rendered by a single
//! formatter. Nothing here touches the filesystem.

use std::fmt;

use crate::core::env::ResolvedEnv;
use crate::core::platform::PLATFORM_KEYS;
use crate::core::profile::{Profile, HDF5_INC, HDF5_LIB, HDF_HEADERS, NOHDF_VAR};

/// Environment keys passed through to `defines.mk` when present.
pub const PASSTHROUGH_KEYS: &[&str] = &[
    "CXX",
    "AR",
    "HDF5_INC",
    "HDF5_LIB",
    "PBBAM_INC",
    "PBBAM_LIB",
    "HTSLIB_INC",
    "HTSLIB_LIB",
    "BOOST_INC",
    "ZLIB_LIB",
    "GCC_LIB",
    "GTEST_INC",
    "GTEST_SRCDIR",
];

/// Passthrough keys that GNU make already defaults; downstream makefiles
/// must not be able to override them.
const TOOL_KEYS: &[&str] = &["AR", "CXX"];

const PREFIX: &str = "PREFIX";

/// Make assignment flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assign {
    /// `?=`, the including makefile may override it
    Conditional,
    /// `:=`
    Immediate,
    /// `+=`
    Append,
}

impl Assign {
    fn operator(self) -> &'static str {
        match self {
            Assign::Conditional => "?=",
            Assign::Immediate => ":=",
            Assign::Append => "+=",
        }
    }
}

/// One make assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub assign: Assign,
    pub key: String,
    pub value: String,
}

impl Line {
    pub fn new(assign: Assign, key: impl Into<String>, value: impl Into<String>) -> Self {
        Line {
            assign,
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {} {}",
            self.key,
            self.assign.operator(),
            self.value
        )
    }
}

/// Render lines as makefile text, one per line.
pub fn render(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// The two generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub defines_mk: String,
    pub libconfig_h: String,
}

/// Compose both artifacts.
pub fn compose(profile: Profile, env: &ResolvedEnv) -> Artifacts {
    Artifacts {
        defines_mk: render(&defines_lines(profile, env)),
        libconfig_h: compose_libconfig(profile.uses_pbbam()),
    }
}

/// The feature header: defines `USE_PBBAM` or nothing.
pub fn compose_libconfig(pbbam: bool) -> String {
    if pbbam {
        "#define USE_PBBAM\n".to_string()
    } else {
        "\n".to_string()
    }
}

/// All `defines.mk` lines, block by block.
pub fn defines_lines(profile: Profile, env: &ResolvedEnv) -> Vec<Line> {
    let mut lines = profile_block(profile, env);
    lines.extend(platform_block(env));
    lines.extend(explicit_hdf5_block(profile, env));
    lines.extend(common_block(env));
    lines.extend(passthrough_block(profile, env));
    lines
}

/// Library locations for the profile, plus the vendored header flags when
/// compiling against fetched headers.
fn profile_block(profile: Profile, env: &ResolvedEnv) -> Vec<Line> {
    let mut lines = Vec::new();

    if profile.needs_vendored_headers() {
        if let Some(headers) = env.get(HDF_HEADERS) {
            lines.push(Line::new(Assign::Immediate, HDF_HEADERS, headers));
            lines.push(Line::new(
                Assign::Append,
                "CPPFLAGS",
                "-I${HDF_HEADERS}/src -I${HDF_HEADERS}/c++/src",
            ));
            lines.push(Line::new(
                Assign::Append,
                "CPPFLAGS",
                "-I../pbdata -I../hdf -I../alignment",
            ));
        }
    }

    let mut keys: Vec<&str> = profile.defaults().iter().map(|(k, _)| *k).collect();
    if profile == Profile::Pbbam && env.contains(NOHDF_VAR) {
        keys.push(NOHDF_VAR);
    }
    lines.extend(conditional_lines(keys, env));
    lines
}

fn platform_block(env: &ResolvedEnv) -> Vec<Line> {
    conditional_lines(PLATFORM_KEYS.iter().copied(), env)
}

/// `HDF5_INC`/`HDF5_LIB` as exact values; sibling makefiles test them
/// literally.
fn explicit_hdf5_block(profile: Profile, env: &ResolvedEnv) -> Vec<Line> {
    if profile != Profile::ExplicitHdf5 {
        return Vec::new();
    }
    [HDF5_INC, HDF5_LIB]
        .into_iter()
        .filter_map(|key| env.get(key).map(|v| Line::new(Assign::Immediate, key, v)))
        .collect()
}

fn common_block(env: &ResolvedEnv) -> Vec<Line> {
    let Some(prefix) = env.get(PREFIX) else {
        return Vec::new();
    };
    vec![
        Line::new(Assign::Conditional, "PREFIX_INC", format!("{prefix}/include")),
        Line::new(Assign::Conditional, "PREFIX_LIB", format!("{prefix}/lib")),
        Line::new(Assign::Append, "INCLUDES", "${PREFIX_INC}"),
        Line::new(Assign::Append, "LIBS", "${PREFIX_LIB}"),
    ]
}

fn passthrough_block(profile: Profile, env: &ResolvedEnv) -> Vec<Line> {
    let excluded = |key: &str| match profile {
        Profile::NoHdf5 => key.starts_with("HDF5_"),
        Profile::ExplicitHdf5 => key == HDF5_INC || key == HDF5_LIB,
        Profile::Pbbam | Profile::VendoredHdf5Headers => false,
    };

    let mut overridable: Vec<&str> = Vec::new();
    let mut tools: Vec<&str> = Vec::new();
    for key in PASSTHROUGH_KEYS.iter().copied() {
        if !env.contains(key) || excluded(key) {
            continue;
        }
        if TOOL_KEYS.contains(&key) {
            tools.push(key);
        } else {
            overridable.push(key);
        }
    }
    tools.sort_unstable();

    let mut lines = conditional_lines(overridable, env);
    lines.extend(
        tools
            .into_iter()
            .filter_map(|key| env.get(key).map(|v| Line::new(Assign::Immediate, key, v))),
    );
    lines
}

/// `key ?= value` for each present key, sorted by key.
fn conditional_lines<'a>(keys: impl IntoIterator<Item = &'a str>, env: &ResolvedEnv) -> Vec<Line> {
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();
    keys.into_iter()
        .filter_map(|key| env.get(key).map(|v| Line::new(Assign::Conditional, key, v)))
        .collect()
}
