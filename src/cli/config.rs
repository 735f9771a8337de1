use std::path::{Path, PathBuf};

use licensing::render::terminal::{Style, Tone};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key to set (`base_url`, `output_dir`, `print_command`)
        key: String,

        /// Value to set. An empty `print_command` disables printing.
        value: String,
    },
}

impl Config {
    #[instrument(skip(effective))]
    pub fn run(self, config_path: &Path, effective: licensing::Config) -> anyhow::Result<()> {
        let style = Style::detect();

        match self.command {
            ConfigCommand::Show => {
                let origin = if config_path.exists() {
                    config_path.display().to_string()
                } else {
                    "defaults".to_string()
                };
                println!("Configuration ({}):", style.paint(&origin, Tone::Muted));
                println!("  base_url: {}", effective.base_url());
                println!("  output_dir: {}", effective.output_dir.display());
                match &effective.print_command {
                    Some(command) => println!("  print_command: {}", command.join(" ")),
                    None => println!(
                        "  print_command: {}",
                        style.paint("(none, documents are only written)", Tone::Muted)
                    ),
                }
            }
            ConfigCommand::Init { force } => {
                if config_path.exists() && !force {
                    anyhow::bail!(
                        "Configuration file {} already exists (use --force to overwrite)",
                        config_path.display()
                    );
                }
                effective
                    .save(config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!(
                    "{} Wrote {}",
                    style.paint("✓", Tone::Success),
                    config_path.display()
                );
            }
            ConfigCommand::Set { key, value } => {
                let mut config = super::load_config(config_path)?;
                apply(&mut config, &key, &value)?;
                config
                    .save(config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{} {key} updated", style.paint("✓", Tone::Success));
            }
        }

        Ok(())
    }
}

fn apply(config: &mut licensing::Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "base_url" => {
            licensing::HttpClient::new(value)?;
            config.set_base_url(value);
        }
        "output_dir" => config.output_dir = PathBuf::from(value),
        "print_command" => {
            let command: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            config.print_command = (!command.is_empty()).then_some(command);
        }
        _ => {
            anyhow::bail!(
                "Unknown configuration key: '{key}'\nSupported keys: base_url, output_dir, \
                 print_command"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("print_command", "lp -o media=A4", Some(&["lp", "-o", "media=A4"][..]); "split on whitespace")]
    #[test_case("print_command", "  ", None; "blank disables printing")]
    fn print_command_values(key: &str, value: &str, expected: Option<&[&str]>) {
        let mut config = licensing::Config::default();

        apply(&mut config, key, value).unwrap();

        let expected: Option<Vec<String>> =
            expected.map(|args| args.iter().map(ToString::to_string).collect());
        assert_eq!(config.print_command, expected);
    }

    #[test]
    fn base_url_must_be_absolute() {
        let mut config = licensing::Config::default();

        assert!(apply(&mut config, "base_url", "localhost").is_err());
        apply(&mut config, "base_url", "https://licensing.example/").unwrap();
        assert_eq!(config.base_url(), "https://licensing.example");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = licensing::Config::default();

        let error = apply(&mut config, "colour", "blue").unwrap_err();

        assert!(error.to_string().starts_with("Unknown configuration key: 'colour'"));
    }

    #[test]
    fn set_writes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".licensing.toml");
        let command = Config {
            command: ConfigCommand::Set {
                key: "output_dir".to_string(),
                value: "reports".to_string(),
            },
        };

        command.run(&path, licensing::Config::default()).unwrap();

        let saved = licensing::Config::load(&path).unwrap();
        assert_eq!(saved.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".licensing.toml");
        let init = |force| Config {
            command: ConfigCommand::Init { force },
        };

        init(false).run(&path, licensing::Config::default()).unwrap();
        assert!(init(false).run(&path, licensing::Config::default()).is_err());
        init(true).run(&path, licensing::Config::default()).unwrap();
    }
}
