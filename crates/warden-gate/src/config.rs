use std::path::Path;

use crate::Args;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use url::Url;

#[derive(Deserialize, Debug)]
pub(crate) struct ApplicationConfig {
    pub port: u16,
    pub jwks_url: Url,
    pub jwks_refresh_interval: Option<u64>,
    pub identity: IdentityConfig,
    pub grant: GrantConfig,
    pub gate: GateConfig,
}

#[derive(Deserialize, Debug)]
pub struct IdentityConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct GrantConfig {
    pub role: String,
}

#[derive(Deserialize, Debug)]
pub struct GateConfig {
    pub role: String,
}

pub(super) fn load_config(args: Args) -> anyhow::Result<ApplicationConfig> {
    let config_file_path = if let Some(path_override) = args.config {
        path_override
    } else {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("warden").unwrap();

        let user_config_dir = xdg_dirs.get_config_home();
        if !user_config_dir.exists() {
            std::fs::create_dir_all(&user_config_dir)?;
        }

        let mut config_file_path = user_config_dir.clone();
        config_file_path.push("gate_config.toml");

        if !config_file_path.exists() {
            write_default_config_file(&config_file_path)?;
        }

        config_file_path
    };

    let config: ApplicationConfig = Config::builder()
        .add_source(File::new(config_file_path.to_str().unwrap(), FileFormat::Toml))
        .set_default("grant.role", "agent")?
        .set_default("gate.role", "agent")?
        .set_override_option("port", args.port.map(|port| port.to_string()))?
        .set_override_option("jwks_url", args.jwks_url)?
        .set_override_option("identity.base_url", args.identity_url)?
        .set_override_option("grant.role", args.grant_role)?
        .set_override_option("gate.role", args.gate_role)?
        .build()?
        .try_deserialize()?;

    Ok(config)
}

fn write_default_config_file(path: &Path) -> anyhow::Result<()> {
    let default_config_content = include_str!("../static/default_config.toml");
    std::fs::write(path, default_config_content)?;
    Ok(())
}
