//! Command-line configuration.

use std::path::PathBuf;

use anyhow::{Result, bail};
use asset::{LoadOptions, MissingMaterials};

/// What to show when the model fails to parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnParseError {
    #[default]
    Abort,
    Placeholder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub obj_path: PathBuf,
    pub missing_materials: MissingMaterials,
    pub on_parse_error: OnParseError,
}

impl AppConfig {
    /// Accept: PATH | --obj=PATH, --missing-materials=fail|skip,
    /// --on-parse-error=abort|placeholder
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut obj_path: Option<PathBuf> = None;
        let mut missing_materials = MissingMaterials::default();
        let mut on_parse_error = OnParseError::default();

        for arg in args {
            let arg = arg.as_ref();
            if let Some(val) = arg.strip_prefix("--obj=") {
                obj_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--missing-materials=") {
                missing_materials = match val.to_ascii_lowercase().as_str() {
                    "fail" => MissingMaterials::Fail,
                    "skip" => MissingMaterials::Skip,
                    other => {
                        log::warn!("Unknown missing-materials policy '{}', using 'fail'.", other);
                        MissingMaterials::Fail
                    }
                };
            } else if let Some(val) = arg.strip_prefix("--on-parse-error=") {
                on_parse_error = match val.to_ascii_lowercase().as_str() {
                    "abort" => OnParseError::Abort,
                    "placeholder" => OnParseError::Placeholder,
                    other => {
                        log::warn!("Unknown on-parse-error policy '{}', using 'abort'.", other);
                        OnParseError::Abort
                    }
                };
            } else if arg.starts_with("--") {
                log::warn!("Ignoring unknown flag '{}'.", arg);
            } else if obj_path.is_none() {
                obj_path = Some(PathBuf::from(arg));
            } else {
                bail!("Unexpected extra argument '{}'", arg);
            }
        }

        let Some(obj_path) = obj_path else {
            bail!("Usage: objview <model.obj> [--missing-materials=fail|skip] [--on-parse-error=abort|placeholder]");
        };

        Ok(Self {
            obj_path,
            missing_materials,
            on_parse_error,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            missing_materials: self.missing_materials,
        }
    }
}
