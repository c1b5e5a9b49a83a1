mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::TinifyCommand;
use ports::inbound::UseCaseRunner;
use wiring::{wire_tinify, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config, self.app.env_resolver.api_key())?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Debug, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = match cmd {
            TinifyCommand::Help => {
                print_help();
                Ok(0)
            }
            TinifyCommand::Compress(req) => {
                self.app.use_case.compress_folder(&req).map(|_| 0)
            }
        };

        // 実行時エラーはログに出して終了コードに変える（usage は main で扱う）
        let code = match result {
            Ok(code) => code,
            Err(e) if e.is_usage() => return Err(e),
            Err(e) => {
                let _ = self.app.logger.log(
                    &LogRecord::new(LogLevel::Error, e.to_string())
                        .layer("cli")
                        .kind("error"),
                );
                e.exit_code()
            }
        };
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Debug, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        Ok(code)
    }
}

fn cmd_name_for_log(cmd: &TinifyCommand) -> &'static str {
    match cmd {
        TinifyCommand::Help => "help",
        TinifyCommand::Compress(req) if req.dry_run => "compress (dry run)",
        TinifyCommand::Compress(_) => "compress",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("tinify-img: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_tinify(config.verbose)?;
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: tinify-img -f <folder> -k <key> [-d <days>] [--dry_run] [-v]");
}

fn print_help() {
    println!("Usage: tinify-img -f <folder> -k <key> [options]");
    println!("Tinify all PNG and JPG in a folder.");
    println!();
    println!("Options:");
    println!("  -h, --help                 Show this help message");
    println!("  -f, --folder <folder>      Folder in which to look for images (searched recursively)");
    println!("  -k, --key <key>            API key for Tinify. Default: $TINIFY_API_KEY");
    println!("  -d, --days <days>          Only process the images that have been modified in the last n days (fractions allowed)");
    println!("      --dry_run              No compression will be done");
    println!("  -v, --verbose              Log every processed file");
    println!("      --generate <shell>     Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Environment:");
    println!("  TINIFY_API_KEY        API key used when -k/--key is not given");
    println!("  TINIFY_API_ENDPOINT   Base URL of the compression service (default: https://api.tinify.com)");
    println!("  TINIFY_IMG_LOG_FILE   Also append every log record as JSON lines to this file");
    println!();
    println!("Exit status:");
    println!("  0   success, including \"nothing to do\" and runs with per-file errors");
    println!("  1   the API key could not be validated");
    println!("  64  invalid arguments");
    println!();
    println!("Examples:");
    println!("  tinify-img -f ./assets -k $KEY");
    println!("  tinify-img -f ./assets -d 1.5 --dry_run -v");
}
