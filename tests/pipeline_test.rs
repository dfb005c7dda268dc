use std::path::PathBuf;

use anyhow::{bail, Result};
use async_trait::async_trait;
use md_translate::segmenter::BATCH_SEPARATOR;
use md_translate::services::IdentityTranslator;
use md_translate::{
    parse_markdown, App, BatchOutcome, Config, NodeType, Segmenter, Translator, TranslatorKind,
};

/// 把文本包进方括号；包含 "FAIL" 的批次失败
struct BracketTranslator;

#[async_trait]
impl Translator for BracketTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        if text.contains("FAIL") {
            bail!("translator unavailable");
        }
        Ok(format!("[{}]", text))
    }

    fn name(&self) -> &str {
        "bracket"
    }
}

/// 每个测试一个独立目录
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("md_translate_{}_{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).expect("创建临时目录失败");
    dir
}

fn test_config(input: PathBuf) -> Config {
    Config {
        input_path: Some(input),
        translator: TranslatorKind::Identity,
        pause_ms: 0,
        ..Default::default()
    }
}

const DOCUMENT: &str = "# File system\n\nThe `fs` module enables\ninteracting with the file system.\n\n```js\nimport * as fs from 'node:fs';\n```\n\n* `path` {string}\n* `mode` {integer}\n\n<!-- YAML\nadded: v0.1.8\n-->\n\nFAIL this paragraph.\n";

#[tokio::test]
async fn test_end_to_end_with_failure_isolation() {
    let dir = scratch_dir("e2e");
    let input = dir.join("fs.md");
    std::fs::write(&input, DOCUMENT).unwrap();

    let app = App::with_translator(test_config(input.clone()), Box::new(BracketTranslator)).unwrap();
    let summary = app.run().await.unwrap();

    assert_eq!(summary.output_path, dir.join("ru.fs.md"));
    let written = std::fs::read_to_string(&summary.output_path).unwrap();
    assert_eq!(written, summary.report.text);

    assert_eq!(
        summary.report.outcomes,
        vec![
            BatchOutcome::Translated, // 标题 + 段落
            BatchOutcome::Skipped,    // 代码块
            BatchOutcome::Translated, // 列表
            BatchOutcome::Skipped,    // HTML 注释
            BatchOutcome::Failed,     // FAIL 段落
        ]
    );
    assert_eq!(
        written,
        "[# File system\n\nThe `fs` module enables interacting with the file system.]\n\n\
         ```js import * as fs from 'node:fs'; ```\n\n\
         [* `path` {string}\n* `mode` {integer}]\n\n\
         <!-- YAML added: v0.1.8 -->\n\n\
         FAIL this paragraph.\n\n"
    );
}

const REFERENCE_DOCUMENT: &str = "# Streams\n\nSee [the docs][d] and [the API][api] for more.\n\n    const s = fs.createReadStream(p);\n    s.pipe(process.stdout);\n\n* [`stream.Readable`][readable]\n* plain item\n\n[d]: https://example.com/docs\n[api]: https://example.com/api \"API\"\n\n## Events\n\nEmitted when done.\n\n[readable]: stream.md#streamreadable\n";

#[tokio::test]
async fn test_identity_run_keeps_every_source_line() {
    let dir = scratch_dir("coverage");
    let input = dir.join("stream.md");
    std::fs::write(&input, REFERENCE_DOCUMENT).unwrap();

    let app = App::with_translator(test_config(input), Box::new(IdentityTranslator)).unwrap();
    let summary = app.run().await.unwrap();
    let written = std::fs::read_to_string(&summary.output_path).unwrap();

    for line in REFERENCE_DOCUMENT.lines() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        assert!(written.contains(text), "译文缺少源行: {:?}\n---\n{}", text, written);
    }
    assert!(written.contains("    const s = fs.createReadStream(p);"));
}

#[tokio::test]
async fn test_type_links_applied_after_translation() {
    let dir = scratch_dir("links");
    let input = dir.join("fs.md");
    std::fs::write(&input, "* `path` {string}\n").unwrap();

    let config = Config {
        type_links: true,
        ..test_config(input)
    };
    let app = App::with_translator(config, Box::new(md_translate::services::IdentityTranslator)).unwrap();
    let summary = app.run().await.unwrap();

    let written = std::fs::read_to_string(&summary.output_path).unwrap();
    assert_eq!(
        written,
        "* `path` [`<string>`](https://developer.mozilla.org/docs/Web/JavaScript/Data_structures#String_type)\n\n"
    );
}

#[tokio::test]
async fn test_explicit_output_path() {
    let dir = scratch_dir("explicit");
    let input = dir.join("in.md");
    let output = dir.join("custom.md");
    std::fs::write(&input, "Hello.\n").unwrap();

    let config = Config {
        output_path: Some(output.clone()),
        ..test_config(input)
    };
    let app = App::with_translator(config, Box::new(BracketTranslator)).unwrap();
    app.run().await.unwrap();

    assert_eq!(std::fs::read_to_string(output).unwrap(), "[Hello.]\n\n");
}

#[test]
fn test_parse_then_segment_reference_shape() {
    let nodes = parse_markdown("# Title\n\nHello world.\n\n- a\n- b\n\n<div>raw</div>\n").unwrap();
    let segmenter = Segmenter::new([NodeType::Header, NodeType::Paragraph, NodeType::List], 2000);

    let batches = segmenter.segment(&nodes);

    // 顶层 `<div>` 被解析为 HTML 块，不在可翻译类型里
    assert_eq!(batches.len(), 2);
    assert!(batches[0].need_translate);
    assert_eq!(batches[0].data, "# Title\n\nHello world.\n\n- a\n- b");
    assert!(!batches[1].need_translate);
    assert_eq!(batches[1].data, "<div>raw</div>");
}

#[test]
fn test_segmenting_large_document_respects_ceiling() {
    let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n";
    let doc: String = (0..200).map(|i| format!("{}{}\n\n", paragraph, i)).collect();
    let nodes = parse_markdown(&doc).unwrap();
    let segmenter = Segmenter::new(NodeType::default_translatable(), 500);

    let batches = segmenter.segment(&nodes);

    let pieces: usize = batches
        .iter()
        .map(|b| b.data.split(BATCH_SEPARATOR).count())
        .sum();
    assert_eq!(pieces, nodes.len());
    assert!(batches.iter().all(|b| b.data.chars().count() < 500));
}
