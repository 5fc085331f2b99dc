use super::ConfigError;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use toml::Table;
use toml::Value;

/// Loads a TOML file. `Ok(None)` when the file does not exist.
pub(crate) fn new_toml_source(file_path: &str) -> Result<Option<TomlSource>, ConfigError> {
    let contents = match fs::read_to_string(file_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                file: file_path.to_string(),
                source: e,
            });
        }
    };
    let delegate = contents
        .parse::<Table>()
        .map_err(|e| ConfigError::Parse {
            file: file_path.to_string(),
            source: e,
        })?;
    Ok(Some(TomlSource {
        delegate,
        origin: Some(file_path.to_string()),
    }))
}

pub struct TomlSource {
    delegate: Table,
    origin: Option<String>,
}

impl TomlSource {
    pub(crate) fn empty() -> Self {
        Self {
            delegate: Table::new(),
            origin: None,
        }
    }

    pub(crate) fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    fn lookup(&self, path: &[String]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut field = self.delegate.get(first);
        for segment in rest {
            field = field?.as_table()?.get(segment.as_str());
        }
        field
    }
}

pub(crate) fn read<T: DeserializeOwned>(
    source: &TomlSource,
    path: &[String],
) -> Result<Option<T>, ConfigError> {
    let field = if path.is_empty() {
        Value::Table(source.delegate.clone())
    } else {
        match source.lookup(path) {
            Some(value @ Value::Table(_)) => value.clone(),
            _ => return Ok(None),
        }
    };
    field
        .try_into::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Section {
            section: path.join("."),
            source: e,
        })
}
