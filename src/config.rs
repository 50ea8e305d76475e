use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::PlannerError;

// Precedence: CLI > env > file > defaults.

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_GENERATOR_CMD: &str = "llm";
const DEFAULT_GENERATE_TIMEOUT_SEC: u64 = 120;

const ENV_PREFIX: &str = "PARTYPLAN_";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Whose plan to open. Only the interactive shell may run without one.
    pub user: Option<String>,
    pub data_dir: PathBuf,
    pub generator_cmd: String,
    /// Arguments placed before `--model` and the prompt.
    pub generator_args: Vec<String>,
    pub model: Option<String>,
    pub generate_timeout_sec: u64,
    /// File whose content replaces the built-in plan prompt; `{{DETAILS}}`
    /// marks where the party details go.
    pub prompt_template_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// TOML-deserializable config file representation. All fields optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    user: Option<String>,
    data_dir: Option<PathBuf>,
    generator_cmd: Option<String>,
    generator_args: Option<Vec<String>>,
    model: Option<String>,
    generate_timeout_sec: Option<u64>,
    prompt_template_path: Option<PathBuf>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

/// One source of settings; merged field by field.
#[derive(Debug, Default)]
struct ConfigLayer {
    user: Option<String>,
    data_dir: Option<PathBuf>,
    generator_cmd: Option<String>,
    generator_args: Option<Vec<String>>,
    model: Option<String>,
    generate_timeout_sec: Option<u64>,
    prompt_template_path: Option<PathBuf>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl From<FileConfig> for ConfigLayer {
    fn from(fc: FileConfig) -> Self {
        ConfigLayer {
            user: fc.user,
            data_dir: fc.data_dir,
            generator_cmd: fc.generator_cmd,
            generator_args: fc.generator_args,
            model: fc.model,
            generate_timeout_sec: fc.generate_timeout_sec,
            prompt_template_path: fc.prompt_template_path,
            log_level: fc.log_level,
            log_file: fc.log_file,
        }
    }
}

impl PlannerConfig {
    /// Load configuration with precedence: CLI > env > file > defaults.
    pub fn load(config_path: Option<&Path>, cli_args: &GlobalArgs) -> anyhow::Result<Self> {
        Self::load_with_env(config_path, cli_args, real_env_var)
    }

    /// Takes the env lookup as a function so tests need not touch the
    /// process environment.
    fn load_with_env(
        config_path: Option<&Path>,
        cli_args: &GlobalArgs,
        env_fn: fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file_layer = match config_path {
            Some(path) => load_file_layer(path)?,
            None => ConfigLayer::default(),
        };
        let env_layer = load_env_layer(env_fn)?;
        let cli_layer = cli_layer_from(cli_args);

        let merged = merge_layers(file_layer, env_layer, cli_layer);

        Ok(PlannerConfig {
            user: merged
                .user
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty()),
            data_dir: merged
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            generator_cmd: merged
                .generator_cmd
                .unwrap_or_else(|| DEFAULT_GENERATOR_CMD.to_owned()),
            generator_args: merged.generator_args.unwrap_or_default(),
            model: merged.model,
            generate_timeout_sec: merged
                .generate_timeout_sec
                .unwrap_or(DEFAULT_GENERATE_TIMEOUT_SEC),
            prompt_template_path: merged.prompt_template_path,
            log_level: merged.log_level,
            log_file: merged.log_file,
        })
    }

    /// The configured user, or an error naming every place it can come from.
    pub fn require_user(&self) -> anyhow::Result<&str> {
        self.user
            .as_deref()
            .ok_or_else(|| {
                anyhow::anyhow!("user is required (via --user, PARTYPLAN_USER, or config file)")
            })
    }

    /// Contents of the custom prompt template, if one is configured.
    pub fn load_prompt_template(&self) -> anyhow::Result<Option<String>> {
        match &self.prompt_template_path {
            Some(path) => fs::read_to_string(path).map(Some).map_err(|e| {
                anyhow::anyhow!("failed to read prompt template {}: {e}", path.display())
            }),
            None => Ok(None),
        }
    }
}

fn load_file_layer(path: &Path) -> anyhow::Result<ConfigLayer> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
    let fc: FileConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;
    Ok(fc.into())
}

fn real_env_var(suffix: &str) -> Option<String> {
    let key = format!("{ENV_PREFIX}{suffix}");
    env::var(&key).ok().filter(|v| !v.is_empty())
}

fn load_env_layer(env_fn: fn(&str) -> Option<String>) -> Result<ConfigLayer, PlannerError> {
    Ok(ConfigLayer {
        user: env_fn("USER"),
        data_dir: env_fn("DATA_DIR").map(PathBuf::from),
        generator_cmd: env_fn("GENERATOR_CMD"),
        generator_args: env_fn("GENERATOR_ARGS").as_deref().map(split_args),
        model: env_fn("MODEL"),
        generate_timeout_sec: parse_env_u64(env_fn, "GENERATE_TIMEOUT_SEC")?,
        prompt_template_path: env_fn("PROMPT_TEMPLATE_PATH").map(PathBuf::from),
        log_level: env_fn("LOG_LEVEL"),
        log_file: env_fn("LOG_FILE").map(PathBuf::from),
    })
}

/// Split a whitespace-separated argument string; no quoting is supported.
fn split_args(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_owned).collect()
}

fn parse_env_u64(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<u64>, PlannerError> {
    env_fn(suffix)
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .map_err(|e| PlannerError::ConfigEnvParseError {
                    var: format!("{ENV_PREFIX}{suffix}"),
                    detail: e.to_string(),
                })
        })
        .transpose()
}

fn cli_layer_from(args: &GlobalArgs) -> ConfigLayer {
    ConfigLayer {
        user: args.user.clone(),
        data_dir: args.data_dir.clone(),
        generator_cmd: args.generator_cmd.clone(),
        generator_args: args.generator_args.as_deref().map(split_args),
        model: args.model.clone(),
        generate_timeout_sec: args.generate_timeout_sec,
        prompt_template_path: args.prompt_template.clone(),
        log_level: args.log_level.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Merge three layers. For each field, pick CLI first, then env, then file.
fn merge_layers(file: ConfigLayer, env: ConfigLayer, cli: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
        user: cli.user.or(env.user).or(file.user),
        data_dir: cli.data_dir.or(env.data_dir).or(file.data_dir),
        generator_cmd: cli
            .generator_cmd
            .or(env.generator_cmd)
            .or(file.generator_cmd),
        generator_args: cli
            .generator_args
            .or(env.generator_args)
            .or(file.generator_args),
        model: cli.model.or(env.model).or(file.model),
        generate_timeout_sec: cli
            .generate_timeout_sec
            .or(env.generate_timeout_sec)
            .or(file.generate_timeout_sec),
        prompt_template_path: cli
            .prompt_template_path
            .or(env.prompt_template_path)
            .or(file.prompt_template_path),
        log_level: cli.log_level.or(env.log_level).or(file.log_level),
        log_file: cli.log_file.or(env.log_file).or(file.log_file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_suffix: &str) -> Option<String> {
        None
    }

    fn empty_cli() -> GlobalArgs {
        GlobalArgs {
            config: None,
            user: None,
            data_dir: None,
            generator_cmd: None,
            generator_args: None,
            model: None,
            generate_timeout_sec: None,
            prompt_template: None,
            log_level: None,
            log_file: None,
        }
    }

    #[test]
    fn defaults_applied_when_nothing_set() {
        let cfg = PlannerConfig::load_with_env(None, &empty_cli(), no_env).unwrap();

        assert_eq!(cfg.user, None);
        assert_eq!(cfg.data_dir, PathBuf::from("."));
        assert_eq!(cfg.generator_cmd, "llm");
        assert!(cfg.generator_args.is_empty());
        assert_eq!(cfg.model, None);
        assert_eq!(cfg.generate_timeout_sec, 120);
        assert_eq!(cfg.prompt_template_path, None);
        assert_eq!(cfg.log_level, None);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("partyplan.toml");
        fs::write(
            &cfg_path,
            r#"
user = "alice"
data_dir = "/var/party"
generator_cmd = "ollama"
generator_args = ["run", "llama3"]
model = "small"
generate_timeout_sec = 30
prompt_template_path = "tmpl.txt"
log_level = "debug"
log_file = "party.log"
"#,
        )
        .unwrap();

        let cfg = PlannerConfig::load_with_env(Some(&cfg_path), &empty_cli(), no_env).unwrap();

        assert_eq!(cfg.user.as_deref(), Some("alice"));
        assert_eq!(cfg.data_dir, PathBuf::from("/var/party"));
        assert_eq!(cfg.generator_cmd, "ollama");
        assert_eq!(cfg.generator_args, vec!["run", "llama3"]);
        assert_eq!(cfg.model.as_deref(), Some("small"));
        assert_eq!(cfg.generate_timeout_sec, 30);
        assert_eq!(cfg.prompt_template_path, Some(PathBuf::from("tmpl.txt")));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.log_file, Some(PathBuf::from("party.log")));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("partyplan.toml");
        fs::write(&cfg_path, "user = \"from-file\"\ngenerate_timeout_sec = 10\n").unwrap();

        fn fake_env(suffix: &str) -> Option<String> {
            match suffix {
                "USER" => Some("from-env".to_owned()),
                "GENERATOR_ARGS" => Some("run  llama3".to_owned()),
                _ => None,
            }
        }

        let cfg = PlannerConfig::load_with_env(Some(&cfg_path), &empty_cli(), fake_env).unwrap();
        assert_eq!(cfg.user.as_deref(), Some("from-env"));
        assert_eq!(cfg.generate_timeout_sec, 10, "file value survives");
        assert_eq!(cfg.generator_args, vec!["run", "llama3"]);
    }

    #[test]
    fn cli_overrides_env() {
        fn fake_env(suffix: &str) -> Option<String> {
            match suffix {
                "USER" => Some("from-env".to_owned()),
                "GENERATOR_CMD" => Some("env-llm".to_owned()),
                _ => None,
            }
        }

        let mut args = empty_cli();
        args.user = Some("from-cli".into());

        let cfg = PlannerConfig::load_with_env(None, &args, fake_env).unwrap();
        assert_eq!(cfg.user.as_deref(), Some("from-cli"), "CLI wins over env");
        assert_eq!(cfg.generator_cmd, "env-llm");
    }

    #[test]
    fn blank_user_counts_as_unset() {
        let mut args = empty_cli();
        args.user = Some("   ".into());

        let cfg = PlannerConfig::load_with_env(None, &args, no_env).unwrap();
        assert_eq!(cfg.user, None);
        let err = cfg.require_user().unwrap_err();
        assert!(format!("{err}").contains("user is required"), "unexpected: {err}");
    }

    #[test]
    fn invalid_env_number_returns_error() {
        fn fake_env(suffix: &str) -> Option<String> {
            (suffix == "GENERATE_TIMEOUT_SEC").then(|| "soon".to_owned())
        }

        let err = PlannerConfig::load_with_env(None, &empty_cli(), fake_env).unwrap_err();
        let msg = format!("{err}");
        assert!(
            msg.contains("PARTYPLAN_GENERATE_TIMEOUT_SEC"),
            "unexpected: {msg}"
        );
    }

    #[test]
    fn invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("partyplan.toml");
        fs::write(&cfg_path, "not valid {{{{ toml").unwrap();

        let err = PlannerConfig::load_with_env(Some(&cfg_path), &empty_cli(), no_env).unwrap_err();
        assert!(
            format!("{err}").contains("failed to parse config file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn unknown_toml_key_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("partyplan.toml");
        fs::write(&cfg_path, "user = \"a\"\nbogus_key = true\n").unwrap();

        let err = PlannerConfig::load_with_env(Some(&cfg_path), &empty_cli(), no_env).unwrap_err();
        assert!(
            format!("{err}").contains("failed to parse config file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn missing_config_file_returns_error() {
        let err = PlannerConfig::load_with_env(
            Some(Path::new("/no/such/partyplan.toml")),
            &empty_cli(),
            no_env,
        )
        .unwrap_err();
        assert!(
            format!("{err}").contains("failed to read config file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn prompt_template_is_read_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let tmpl = dir.path().join("tmpl.txt");
        fs::write(&tmpl, "Plan: {{DETAILS}}").unwrap();

        let mut args = empty_cli();
        args.prompt_template = Some(tmpl);
        let cfg = PlannerConfig::load_with_env(None, &args, no_env).unwrap();

        assert_eq!(
            cfg.load_prompt_template().unwrap().as_deref(),
            Some("Plan: {{DETAILS}}")
        );
    }

    #[test]
    fn missing_prompt_template_is_an_error() {
        let mut args = empty_cli();
        args.prompt_template = Some(PathBuf::from("/no/such/template.txt"));
        let cfg = PlannerConfig::load_with_env(None, &args, no_env).unwrap();

        assert!(cfg.load_prompt_template().is_err());
    }
}
