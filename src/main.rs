use std::path::PathBuf;

use anyhow::Result;
use md_translate::utils::logging;
use md_translate::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置，命令行第一个参数优先于 INPUT_PATH
    let mut config = Config::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config.input_path = Some(PathBuf::from(path));
    }

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    let result = app.run().await;
    app.shutdown().await?;
    result?;

    Ok(())
}
