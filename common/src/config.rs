//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default location for the configuration file of `contrail`.
//! This is a configuration struct neutral loading engine, storing only the base directory and
//! with `load()` read the proper file or fall back to the defaults.
//!
//! This encapsulates the configuration file, available with `.inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::makepath;

/// Config filename
const CONFIG: &str = "config.hcl";

/// Main name for the directory base
const TAG: &str = "contrail";

/// Every configuration file carries a version number we check on load.
///
pub trait Versioned {
    /// Version expected by the code
    const VERSION: usize;

    /// Version read from the file
    fn version(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config file {0:?}")]
    Missing(PathBuf),
    #[error("Can not read {path:?}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Invalid config file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("Bad file version {found} in {path:?}, expected {expected}")]
    BadFileVersion {
        path: PathBuf,
        found: usize,
        expected: usize,
    },
}

/// Configuration for the CLI tool, holds the parameters of the pipeline.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + Default + DeserializeOwned + Versioned> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Where we actually read it from, `None` means defaults
    source: Option<PathBuf>,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + Default + DeserializeOwned + Versioned,
{
    #[tracing::instrument]
    fn new(tag: &str) -> Self {
        let basedir: PathBuf = match BaseDirs::new() {
            Some(base) => {
                #[cfg(unix)]
                let base = base.home_dir().join(".config");

                #[cfg(windows)]
                let base = base.data_local_dir().to_path_buf();

                debug!("base = {base:?}");
                makepath!(base, tag)
            }
            None => {
                warn!("No home directory, using current one");
                makepath!(".", tag)
            }
        };
        ConfigFile {
            basedir,
            source: None,
            inner: T::default(),
        }
    }

    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the path of the default config file
    ///
    pub fn default_file(&self) -> PathBuf {
        self.config_path().join(CONFIG)
    }

    /// File the configuration was read from, if any
    ///
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI, which must exist
    /// - default file in basedir (base on $HOME or $LOCALAPPDATA), defaults if not there
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<ConfigFile<T>, ConfigError> {
        let mut cfg = ConfigFile::<T>::new(TAG);

        let fname = match fname {
            Some(fname) if fname.exists() => fname.to_path_buf(),
            Some(fname) => return Err(ConfigError::Missing(fname.to_path_buf())),
            None => {
                let def = cfg.default_file();
                if !def.exists() {
                    debug!("no {def:?}, using defaults");
                    return Ok(cfg);
                }
                def
            }
        };

        trace!("Loading config file {fname:?}");

        let data = fs::read_to_string(&fname).map_err(|e| ConfigError::Read {
            path: fname.clone(),
            reason: e.to_string(),
        })?;
        cfg.inner = Self::parse(&fname, &data)?;
        cfg.source = Some(fname);
        Ok(cfg)
    }

    /// Decode and check the version
    ///
    fn parse(fname: &Path, data: &str) -> Result<T, ConfigError> {
        let data: T = hcl::from_str(data).map_err(|e| ConfigError::Parse {
            path: fname.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion {
                path: fname.to_path_buf(),
                found: data.version(),
                expected: T::VERSION,
            });
        }
        Ok(data)
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;
    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Foo {
        version: usize,
        name: String,
        #[serde(default)]
        count: Option<u32>,
    }

    impl Default for Foo {
        fn default() -> Self {
            Foo {
                version: Self::VERSION,
                name: "default".to_string(),
                count: None,
            }
        }
    }

    impl Versioned for Foo {
        const VERSION: usize = 1;

        fn version(&self) -> usize {
            self.version
        }
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        f
    }

    #[test]
    fn test_config_load_file() -> eyre::Result<()> {
        let f = write_config("version = 1\nname = \"foo\"\ncount = 3\n");

        let cfg = ConfigFile::<Foo>::load(Some(f.path()))?;
        let inner = cfg.inner();
        assert_eq!(1, inner.version());
        assert_eq!("foo", inner.name);
        assert_eq!(Some(3), inner.count);
        assert_eq!(Some(f.path()), cfg.source());
        Ok(())
    }

    #[test]
    fn test_config_load_missing_explicit() {
        let cfg = ConfigFile::<Foo>::load(Some(Path::new("/nonexistent/contrail.hcl")));
        assert!(matches!(cfg, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_config_bad_version() {
        let f = write_config("version = 2\nname = \"foo\"\n");

        let cfg = ConfigFile::<Foo>::load(Some(f.path()));
        assert!(matches!(
            cfg,
            Err(ConfigError::BadFileVersion {
                found: 2,
                expected: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_config_bad_syntax() {
        let f = write_config("version = = 1\n");

        let cfg = ConfigFile::<Foo>::load(Some(f.path()));
        assert!(matches!(cfg, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_default_file_name() {
        let cfg = ConfigFile::<Foo>::new(TAG);

        assert!(cfg.default_file().ends_with("contrail/config.hcl"));
        assert_eq!("default", cfg.inner().name);
        assert!(cfg.source().is_none());
    }
}
