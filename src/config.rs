use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub url: String,
    pub description: String,
    pub author: Option<String>,
}

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub posts_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Defaults {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_featured_tags")]
    pub featured_tags: Vec<String>,
}

fn default_page_size() -> u32 {
    12
}

fn default_featured_tags() -> Vec<String> {
    ["starred", "project", "figma", "yap", "misc1"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            page_size: default_page_size(),
            featured_tags: default_featured_tags(),
        }
    }
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct RssFeed {
    pub page_size: u32,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
    pub rss_feed: Option<RssFeed>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.to_str().unwrap(), e))),
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir),
        public_dir: parse_path(cfg.paths.public_dir),
        posts_dir: parse_path(cfg.paths.posts_dir),
    };

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_TOML: &str = r##"
[site]
title = "Tim's corner"
url = "https://example.net"
description = "A place for my random ramblings"

[paths]
template_dir = "res/templates"
public_dir = "res/public"
posts_dir = "res/posts"

[server]
address = "127.0.0.1"
port = 8080
"##;

    #[test]
    fn test_parse_with_defaults() {
        let cfg: Config = toml::from_str(CONFIG_TOML).unwrap();
        assert_eq!(cfg.site.title, "Tim's corner");
        assert_eq!(cfg.defaults.page_size, 12);
        assert_eq!(
            cfg.defaults.featured_tags,
            ["starred", "project", "figma", "yap", "misc1"]
        );
        assert!(cfg.log.is_none());
        assert!(cfg.rss_feed.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let toml_str = format!(
            "{}\n[defaults]\npage_size = 6\nfeatured_tags = [\"rust\"]\n\n[rss_feed]\npage_size = 20\n",
            CONFIG_TOML
        );
        let cfg: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(cfg.defaults.page_size, 6);
        assert_eq!(cfg.defaults.featured_tags, ["rust"]);
        assert_eq!(cfg.rss_feed.unwrap().page_size, 20);
    }
}
