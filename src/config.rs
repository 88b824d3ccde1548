use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::navigation::Navigation;

pub const CFG_FILE_NAME: &str = "content-check.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("src/content/post")
}

impl Default for Paths {
    fn default() -> Self {
        Paths { content_dir: default_content_dir() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_base_path() -> String {
    "/".to_string()
}

impl Default for Site {
    fn default() -> Self {
        Site { base_path: default_base_path() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub site: Site,
    pub log: Option<Log>,
    #[serde(default)]
    pub navigation: Navigation,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe()?;
        let exe_dir = cur_exe.parent().unwrap_or(Path::new("."));
        let rest = path.strip_prefix("${exe_dir}").unwrap_or(&path);
        Ok(exe_dir.join(rest))
    } else {
        Ok(path)
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths.content_dir = parse_path(cfg.paths.content_dir)?;
    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location)?);
        }
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content).map_err(|e| {
        io::Error::new(e.kind(), format!("{} ({})", e, cfg_path.display()))
    })
}

/// Looks for the configuration next to the executable, then in the current
/// directory, then in the user config directory.
pub fn find_config() -> Option<PathBuf> {
    let candidates = [
        env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)),
        env::current_dir().ok(),
        dirs::config_dir(),
    ];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Reads the configuration at `cfg_path`, or the first one found by
/// [`find_config`]. No configuration file at all means defaults.
pub fn open_config(cfg_path: Option<PathBuf>) -> io::Result<Config> {
    match cfg_path.or_else(find_config) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::test_data::SITE_CONFIG;

    use super::*;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(SITE_CONFIG).unwrap();
        assert_eq!(cfg.paths.content_dir, PathBuf::from("src/content/post"));
        assert_eq!(cfg.site.base_path, "/blog/");

        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert!(!log.log_to_console);
        assert!(log.location.is_none());

        assert_eq!(cfg.navigation.header.links.len(), 2);
        assert_eq!(cfg.navigation.footer.social_links[0].aria_label, "Github");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.paths.content_dir, PathBuf::from("src/content/post"));
        assert_eq!(cfg.site.base_path, "/");
        assert!(cfg.log.is_none());
        assert_eq!(cfg.navigation, Navigation::default());
    }

    #[test]
    fn test_exe_dir_prefix() {
        let cfg = parse_config("[paths]\ncontent_dir = \"${exe_dir}/posts\"\n").unwrap();
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(cfg.paths.content_dir, exe_dir.join("posts"));
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[log]\nlevel = \"Loud\"\nlog_to_console = true\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_config_names_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join(CFG_FILE_NAME);
        let err = read_config(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains(CFG_FILE_NAME));

        fs::write(&missing, SITE_CONFIG).unwrap();
        let cfg = open_config(Some(missing)).unwrap();
        assert_eq!(cfg.site.base_path, "/blog/");
    }
}
