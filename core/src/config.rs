use crate::args::CmdArgs;
use crate::config::toml_source::TomlSource;
use clap::Parser;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use thiserror::Error;

mod toml_source;

pub enum ESource {
    Toml(TomlSource),
}

impl ESource {
    /// File the source was loaded from; `None` when running on defaults.
    pub fn origin(&self) -> Option<&str> {
        match self { ESource::Toml(s) => { s.origin() } }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open file [{file}]: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse file [{file}]: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("malformed config section [{section}]: {source}")]
    Section {
        section: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("main config already initialised")]
    AlreadyInitialised,
}

static MAIN_CONFIG: OnceLock<ESource> = OnceLock::new();

lazy_static! {
    static ref EMPTY_CONFIG: ESource = ESource::Toml(TomlSource::empty());
}

/// Parses the command line and loads the config file it points to.
///
/// A config file that does not exist is not an error: every section has
/// defaults, so the process runs with an empty source instead.
pub fn init_main_config() -> Result<&'static ESource, ConfigError> {
    let args = CmdArgs::parse();
    let source = load_source(&args.config)?;
    MAIN_CONFIG
        .set(source)
        .map_err(|_| ConfigError::AlreadyInitialised)?;
    Ok(main_config())
}

pub fn load_source(file_path: &str) -> Result<ESource, ConfigError> {
    let source = toml_source::new_toml_source(file_path)?.unwrap_or_else(TomlSource::empty);
    Ok(ESource::Toml(source))
}

pub fn main_config() -> &'static ESource {
    MAIN_CONFIG.get().unwrap_or(&*EMPTY_CONFIG)
}

/// Deserializes the table found at `path`. `Ok(None)` means the table is absent.
pub fn read_struct<T: DeserializeOwned>(
    source: &ESource,
    path: &[String],
) -> Result<Option<T>, ConfigError> {
    match source { ESource::Toml(s) => { toml_source::read(s, path) } }
}

pub fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Http {
        host: String,
        #[serde(default)]
        port: u16,
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Activities {
        enforce_capacity: bool,
    }

    #[test]
    fn reads_nested_sections() {
        let file = write_config(
            r#"
            [http]
            host = "127.0.0.1"
            port = 9000

            [activities]
            enforce_capacity = true

            [outer.inner]
            enforce_capacity = false
            "#,
        );
        let source = load_source(file.path().to_str().unwrap()).unwrap();

        let http: Option<Http> = read_struct(&source, &path(&["http"])).unwrap();
        assert_eq!(
            http,
            Some(Http {
                host: "127.0.0.1".to_string(),
                port: 9000
            })
        );
        let activities: Option<Activities> =
            read_struct(&source, &path(&["activities"])).unwrap();
        assert_eq!(activities, Some(Activities { enforce_capacity: true }));
        let inner: Option<Activities> =
            read_struct(&source, &path(&["outer", "inner"])).unwrap();
        assert_eq!(inner, Some(Activities { enforce_capacity: false }));

        // a scalar is not a section
        let scalar: Option<Activities> =
            read_struct(&source, &path(&["http", "port"])).unwrap();
        assert_eq!(scalar, None);
    }

    #[test]
    fn origin_names_the_loaded_file() {
        let file = write_config("[http]\n");
        let file_path = file.path().to_str().unwrap();
        let source = load_source(file_path).unwrap();
        assert_eq!(source.origin(), Some(file_path));
    }

    #[test]
    fn reads_struct_from_section() {
        let file = write_config("[http]\nhost = \"localhost\"\n");
        let source = load_source(file.path().to_str().unwrap()).unwrap();

        let http: Option<Http> = read_struct(&source, &path(&["http"])).unwrap();
        assert_eq!(
            http,
            Some(Http {
                host: "localhost".to_string(),
                port: 0
            })
        );

        let absent: Option<Http> = read_struct(&source, &path(&["nope"])).unwrap();
        assert_eq!(absent, None);
    }

    #[test]
    fn malformed_section_is_an_error() {
        let file = write_config("[http]\nport = \"not a number\"\n");
        let source = load_source(file.path().to_str().unwrap()).unwrap();

        let result: Result<Option<Http>, _> = read_struct(&source, &path(&["http"]));
        assert!(matches!(result, Err(ConfigError::Section { .. })));
    }

    #[test]
    fn missing_file_yields_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let source = load_source(missing.to_str().unwrap()).unwrap();

        assert_eq!(source.origin(), None);
        let http: Option<Http> = read_struct(&source, &path(&["http"])).unwrap();
        assert_eq!(http, None);
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let file = write_config("[http\nhost = ");
        let result = load_source(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
