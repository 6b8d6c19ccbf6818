//! Configuration profile selection.
//!
//! Exactly one [`Profile`] is chosen per invocation from four flags of the
//! resolved environment:
//!
//! | `NOPBBAM` | `NOHDF` | `HDF5_LIB` | profile                      |
//! |-----------|---------|------------|------------------------------|
//! | absent    | any     | any        | [`Profile::Pbbam`]           |
//! | present   | present | any        | [`Profile::NoHdf5`]          |
//! | present   | absent  | present    | [`Profile::ExplicitHdf5`]    |
//! | present   | absent  | absent     | [`Profile::VendoredHdf5Headers`] |
//!
//! The explicit profile additionally requires an include directory, given
//! as `HDF5_INC` or the legacy `HDF5_INCLUDE`.

use std::fmt;

use crate::core::env::ResolvedEnv;
use crate::core::error::ConfigureError;

pub const NOPBBAM: &str = "NOPBBAM";
pub const NOHDF: &str = "NOHDF";
pub const HDF5_LIB: &str = "HDF5_LIB";
pub const HDF5_INC: &str = "HDF5_INC";
/// Legacy spelling of [`HDF5_INC`].
pub const HDF5_INCLUDE: &str = "HDF5_INCLUDE";
/// Make-relative path to the fetched HDF5 headers.
pub const HDF_HEADERS: &str = "HDF_HEADERS";
pub const NOHDF_VAR: &str = "nohdf";

/// Mutually exclusive build configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// PacBio internal build: pbbam plus a full HDF5 install.
    Pbbam,
    /// No pbbam; HDF5 located through explicit `HDF5_INC`/`HDF5_LIB`.
    ExplicitHdf5,
    /// No pbbam and no HDF5 install; compile against fetched headers.
    VendoredHdf5Headers,
    /// No pbbam and no HDF5 at all; the `hdf/` library is skipped.
    NoHdf5,
}

impl Profile {
    /// Whether `USE_PBBAM` is defined for the native build.
    pub fn uses_pbbam(self) -> bool {
        matches!(self, Profile::Pbbam)
    }

    /// Whether this profile needs the vendored header directory.
    pub fn needs_vendored_headers(self) -> bool {
        matches!(self, Profile::VendoredHdf5Headers)
    }

    /// Library location defaults for this profile, filled only where unset.
    pub fn defaults(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Profile::Pbbam => &[
                ("LIBPBDATA_INC", "../pbdata"),
                ("LIBPBIHDF_INC", "../hdf"),
                ("LIBBLASR_INC", "../alignment"),
                ("LIBPBDATA_LIB", "../pbdata/"),
                ("LIBPBIHDF_LIB", "../hdf/"),
                ("LIBBLASR_LIB", "../alignment/"),
            ],
            Profile::ExplicitHdf5 => &[
                ("LIBPBDATA_INC", "../pbdata"),
                ("LIBPBIHDF_INC", "../hdf"),
                ("LIBBLASR_INC", "../alignment"),
                ("LIBPBDATA_LIB", "../pbdata/"),
                ("LIBPBIHDF_LIB", "../hdf/libpbihdf.a"),
                ("LIBBLASR_LIB", "../alignment/"),
            ],
            Profile::VendoredHdf5Headers => &[
                ("LIBPBDATA_LIB", "../pbdata/"),
                ("LIBPBIHDF_LIB", "../hdf/"),
                ("LIBBLASR_LIB", "../alignment/"),
            ],
            Profile::NoHdf5 => &[
                ("LIBPBDATA_INC", "../pbdata"),
                ("LIBPBIHDF_INC", "../hdf"),
                ("LIBBLASR_INC", "../alignment"),
                ("LIBPBDATA_LIB", "../pbdata/"),
                ("LIBPBIHDF_LIB", "../hdf/"),
                ("LIBBLASR_LIB", "../alignment/"),
                (NOHDF_VAR, "1"),
            ],
        }
    }

    /// Fill this profile's defaults into `env`.
    pub fn apply_defaults(self, env: &mut ResolvedEnv) {
        for (key, value) in self.defaults() {
            env.fill(*key, *value);
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Pbbam => write!(f, "pbbam"),
            Profile::ExplicitHdf5 => write!(f, "nopbbam (explicit HDF5)"),
            Profile::VendoredHdf5Headers => write!(f, "nopbbam (vendored HDF5 headers)"),
            Profile::NoHdf5 => write!(f, "nopbbam nohdf"),
        }
    }
}

/// Result of [`select_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub profile: Profile,
    /// Non-fatal problems noticed while selecting (already logged).
    pub warnings: Vec<String>,
}

/// Choose the profile for `env`.
///
/// For [`Profile::ExplicitHdf5`] the include alias is canonicalized: if only
/// `HDF5_INCLUDE` is given its value is copied into `HDF5_INC`.
pub fn select_profile(env: &mut ResolvedEnv) -> Result<Selection, ConfigureError> {
    let mut warnings = Vec::new();

    let profile = if !env.contains(NOPBBAM) {
        Profile::Pbbam
    } else if env.contains(NOHDF) {
        Profile::NoHdf5
    } else if env.contains(HDF5_LIB) {
        resolve_hdf5_include(env, &mut warnings)?;
        Profile::ExplicitHdf5
    } else {
        Profile::VendoredHdf5Headers
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!("selected profile: {}", profile);

    Ok(Selection { profile, warnings })
}

fn resolve_hdf5_include(
    env: &mut ResolvedEnv,
    warnings: &mut Vec<String>,
) -> Result<(), ConfigureError> {
    let inc = env.get(HDF5_INC).map(str::to_string);
    let legacy = env.get(HDF5_INCLUDE).map(str::to_string);

    match (inc, legacy) {
        (Some(inc), Some(legacy)) => {
            warnings.push(format!(
                "both {HDF5_INC}={inc} and {HDF5_INCLUDE}={legacy} are set; using {HDF5_INC}"
            ));
        }
        (Some(_), None) => {}
        (None, Some(legacy)) => env.set(HDF5_INC, legacy),
        (None, None) => {
            return Err(ConfigureError::MissingKey {
                key: HDF5_INC.to_string(),
                hint: format!("{HDF5_LIB} is set, so {HDF5_INC} (or {HDF5_INCLUDE}) must be set too"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ResolvedEnv {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_default_is_pbbam() {
        let mut e = ResolvedEnv::new();
        let sel = select_profile(&mut e).unwrap();
        assert_eq!(sel.profile, Profile::Pbbam);
        assert!(sel.profile.uses_pbbam());
        assert!(sel.warnings.is_empty());
    }

    #[test]
    fn test_nopbbam_nohdf() {
        let mut e = env(&[(NOPBBAM, "1"), (NOHDF, "1"), (HDF5_LIB, "/x/lib")]);
        assert_eq!(select_profile(&mut e).unwrap().profile, Profile::NoHdf5);
    }

    #[test]
    fn test_legacy_include_alias() {
        let mut e = env(&[
            (NOPBBAM, "1"),
            (HDF5_LIB, "/x/lib"),
            (HDF5_INCLUDE, "/x/include"),
        ]);
        let sel = select_profile(&mut e).unwrap();
        assert_eq!(sel.profile, Profile::ExplicitHdf5);
        assert!(sel.warnings.is_empty());
        assert_eq!(e.get(HDF5_INC), Some("/x/include"));
    }

    #[test]
    fn test_both_include_spellings_warn_and_prefer_canonical() {
        let mut e = env(&[
            (NOPBBAM, "1"),
            (HDF5_LIB, "/x/lib"),
            (HDF5_INC, "/a"),
            (HDF5_INCLUDE, "/b"),
        ]);
        let sel = select_profile(&mut e).unwrap();
        assert_eq!(sel.profile, Profile::ExplicitHdf5);
        assert_eq!(sel.warnings.len(), 1);
        assert!(sel.warnings[0].contains("HDF5_INCLUDE"));
        assert_eq!(e.get(HDF5_INC), Some("/a"));
    }

    #[test]
    fn test_missing_include_is_fatal() {
        let mut e = env(&[(NOPBBAM, "1"), (HDF5_LIB, "/x/lib")]);
        let err = select_profile(&mut e).unwrap_err();
        assert!(matches!(err, ConfigureError::MissingKey { ref key, .. } if key == HDF5_INC));
    }

    #[test]
    fn test_no_hdf5_lib_uses_vendored_headers() {
        let mut e = env(&[(NOPBBAM, "1"), (HDF5_INC, "/x/include")]);
        let sel = select_profile(&mut e).unwrap();
        assert_eq!(sel.profile, Profile::VendoredHdf5Headers);
        assert!(sel.profile.needs_vendored_headers());
    }

    #[test]
    fn test_exactly_one_profile_for_every_flag_combination() {
        for bits in 0u8..16 {
            let nopbbam = bits & 1 != 0;
            let nohdf = bits & 2 != 0;
            let lib = bits & 4 != 0;
            let inc = bits & 8 != 0;

            let mut e = ResolvedEnv::new();
            if nopbbam {
                e.set(NOPBBAM, "1");
            }
            if nohdf {
                e.set(NOHDF, "1");
            }
            if lib {
                e.set(HDF5_LIB, "/lib");
            }
            if inc {
                e.set(HDF5_INC, "/inc");
            }

            let expected = match (nopbbam, nohdf, lib, inc) {
                (false, ..) => Some(Profile::Pbbam),
                (true, true, ..) => Some(Profile::NoHdf5),
                (true, false, true, true) => Some(Profile::ExplicitHdf5),
                (true, false, true, false) => None,
                (true, false, false, _) => Some(Profile::VendoredHdf5Headers),
            };

            let got = select_profile(&mut e).ok().map(|s| s.profile);
            assert_eq!(got, expected, "flags {bits:04b}");
        }
    }

    #[test]
    fn test_profile_defaults_fill_only_absent() {
        let mut e = env(&[("LIBPBDATA_LIB", "/opt/pbdata/")]);
        Profile::NoHdf5.apply_defaults(&mut e);
        assert_eq!(e.get("LIBPBDATA_LIB"), Some("/opt/pbdata/"));
        assert_eq!(e.get("LIBBLASR_INC"), Some("../alignment"));
        assert_eq!(e.get(NOHDF_VAR), Some("1"));

        let mut e = ResolvedEnv::new();
        Profile::Pbbam.apply_defaults(&mut e);
        assert!(!e.contains(NOHDF_VAR));

        let mut e = ResolvedEnv::new();
        Profile::ExplicitHdf5.apply_defaults(&mut e);
        assert_eq!(e.get("LIBPBIHDF_LIB"), Some("../hdf/libpbihdf.a"));
    }
}
