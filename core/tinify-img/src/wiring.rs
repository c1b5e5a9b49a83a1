//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{
    Clock, EnvResolver, FileJsonLog, FileSystem, Log, StdClock, StdEnvResolver, StdFileSystem,
    StderrLog, TeeLog,
};
use common::error::Error;

use crate::adapter::TinifyClient;
use crate::ports::outbound::CompressionService;
use crate::usecase::TinifyUseCase;

/// main が使う組み立て済みの部品
pub struct App {
    pub use_case: TinifyUseCase,
    pub logger: Arc<dyn Log>,
    pub env_resolver: Arc<dyn EnvResolver>,
}

/// stderr への人間向けログ。TINIFY_IMG_LOG_FILE があれば JSONL ファイルにも書く
fn wire_logger(
    verbose: bool,
    fs: &Arc<dyn FileSystem>,
    env_resolver: &dyn EnvResolver,
) -> Arc<dyn Log> {
    let stderr: Arc<dyn Log> = Arc::new(StderrLog::new(verbose));
    match env_resolver.log_file() {
        Some(path) => Arc::new(TeeLog::new(vec![
            stderr,
            Arc::new(FileJsonLog::new(Arc::clone(fs), path)),
        ])),
        None => stderr,
    }
}

/// 配線: 標準アダプタと Tinify クライアントで App を組み立てる
pub fn wire_tinify(verbose: bool) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = wire_logger(verbose, &fs, env_resolver.as_ref());
    let service: Arc<dyn CompressionService> = Arc::new(TinifyClient::new(
        env_resolver.api_endpoint(),
        Arc::clone(&fs),
    )?);
    Ok(wire_with(
        service,
        fs,
        Arc::new(StdClock),
        logger,
        env_resolver,
    ))
}

/// 任意のアダプタで App を組み立てる（テストでは Stub を注入する）
pub fn wire_with(
    service: Arc<dyn CompressionService>,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Log>,
    env_resolver: Arc<dyn EnvResolver>,
) -> App {
    let use_case = TinifyUseCase::new(service, fs, clock, Arc::clone(&logger));
    App {
        use_case,
        logger,
        env_resolver,
    }
}
