use md_translate::browser::launch_headless_browser;
use md_translate::infrastructure::JsExecutor;
use md_translate::services::{DeeplSettings, DeeplTranslator};
use md_translate::utils::logging;
use md_translate::{Config, Translator};

#[tokio::test]
#[ignore] // 需要本机浏览器和网络：cargo test -- --ignored
async fn test_deepl_translate_single_paragraph() {
    logging::init();

    let config = Config::default();
    let (_browser, page) = launch_headless_browser(&config.translator_url, None)
        .await
        .expect("启动浏览器失败");

    let translator = DeeplTranslator::new(JsExecutor::new(page), DeeplSettings::from_config(&config));
    let result = translator
        .translate("The file system module.")
        .await
        .expect("翻译失败");

    assert!(!result.trim().is_empty());
}
