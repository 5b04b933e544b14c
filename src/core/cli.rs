use std::path::PathBuf;

pub const USAGE: &str = "usage: igs [--config <path>] [--data <dir>] [--logs <dir>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Default for CliPaths {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            data_dir: PathBuf::from("data"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

impl CliPaths {
    pub fn from_env() -> Result<Self, String> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = String>,
    {
        let mut paths = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => paths.config_path = Self::next_path(&mut args, "--config")?,
                "--data" => paths.data_dir = Self::next_path(&mut args, "--data")?,
                "--logs" => paths.logs_dir = Self::next_path(&mut args, "--logs")?,
                _ => return Err(format!("Unknown argument: {arg}\n{USAGE}")),
            }
        }
        Ok(paths)
    }

    fn next_path<I>(args: &mut I, flag: &str) -> Result<PathBuf, String>
    where
        I: Iterator<Item = String>,
    {
        args.next()
            .filter(|v| !v.starts_with("--"))
            .map(PathBuf::from)
            .ok_or_else(|| format!("Missing value for {flag}"))
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join("documents")
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }

    pub fn schedules_dir(&self) -> PathBuf {
        self.data_dir.join("schedules")
    }
}
