use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Send log output to `<dir>/flappy-term.log`.
///
/// The terminal belongs to the renderer, so nothing may go to stderr. When
/// no directory is available logging is switched off entirely.
pub fn init(dir: Option<&Path>, filter: Option<&str>) -> Result<Option<PathBuf>> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.format_timestamp_millis();

    let path = match dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join("flappy-term.log");
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
            Some(path)
        }
        None => {
            builder.filter_level(LevelFilter::Off);
            None
        }
    };

    builder.try_init().context("installing logger")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_dir_is_reported() {
        // A regular file where the log directory should be.
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = init(Some(file.path()), None).unwrap_err();
        assert!(format!("{err:#}").contains("creating"));
    }
}
