use crate::domain::{ApiKey, CompressRequest, TinifyCommand};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

pub const BIN_NAME: &str = "tinify-img";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -f / --folder: 画像を探すフォルダ
    pub folder: Option<PathBuf>,
    /// -k / --key: Tinify の API キー（未指定なら TINIFY_API_KEY）
    pub key: Option<String>,
    /// -d / --days: 直近 n 日に更新された画像だけを処理する（小数可）
    pub days: Option<f64>,
    /// --dry_run: 圧縮は行わず、対象と残り回数だけを報告する
    pub dry_run: bool,
    /// -v / --verbose: ファイルごとの処理を DEBUG で出す
    pub verbose: bool,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Tinify all PNG and JPG in a folder")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("folder")
                .short('f')
                .long("folder")
                .value_name("folder")
                .help("Folder in which to look for images")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("key")
                .short('k')
                .long("key")
                .value_name("key")
                .help("API key for Tinify (default: $TINIFY_API_KEY)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("days")
                .short('d')
                .long("days")
                .value_name("days")
                .help("Only process the images that have been modified in the last n days")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("dry_run")
                .long("dry_run")
                .alias("dry-run")
                .help("No compression will be done")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every processed file (debug level)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        folder: matches.get_one::<PathBuf>("folder").cloned(),
        key: matches.get_one::<String>("key").cloned(),
        days: matches.get_one::<f64>("days").copied(),
        dry_run: matches.get_flag("dry_run"),
        verbose: matches.get_flag("verbose"),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[cfg(test)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
}

/// Config を TinifyCommand に変換する。
///
/// --key が無ければ env_key（TINIFY_API_KEY）を使う。--help 以外で folder / key が無ければ引数エラー。
pub fn config_to_command(config: Config, env_key: Option<String>) -> Result<TinifyCommand, Error> {
    if config.help {
        return Ok(TinifyCommand::Help);
    }

    let folder = config
        .folder
        .ok_or_else(|| Error::invalid_argument("the following argument is required: -f/--folder"))?;
    let key = config
        .key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env_key.filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            Error::invalid_argument(
                "the following argument is required: -k/--key (or set TINIFY_API_KEY)",
            )
        })?;
    if let Some(days) = config.days {
        if !days.is_finite() || days < 0.0 {
            return Err(Error::invalid_argument(format!(
                "-d/--days must be a non-negative number of days, got {}",
                days
            )));
        }
    }

    Ok(TinifyCommand::Compress(CompressRequest {
        folder,
        key: ApiKey::new(key),
        days: config.days,
        dry_run: config.dry_run,
    }))
}
