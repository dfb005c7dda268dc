//! 类型链接替换
//!
//! Node.js 文档用 `{Buffer}`、`{integer}` 这样的花括号标注类型。
//! 译文写出前可选地把它们替换为指向 Node.js / MDN / TC39 文档的 Markdown 链接，
//! 包括译文里已经被翻译过的形式（如 `{строка}`）。

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use phf::phf_map;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::debug;

const MDN_DATA: &str = "https://developer.mozilla.org/docs/Web/JavaScript/Data_structures";
const MDN_GLOBAL: &str = "https://developer.mozilla.org/docs/Web/JavaScript/Reference/Global_Objects";

/// 内置替换表：花括号标注 → 链接目标
static BUILTIN_LINKS: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    // Node.js 内部
    "{AbortSignal}" => ("AbortSignal", "globals.md#abortsignal"),
    "{Buffer}" => ("Buffer", "buffer.md#buffer"),
    "{Buffer[]}" => ("Buffer[]", "buffer.md#buffer"),
    "{EventEmitter}" => ("EventEmitter", "events.md#eventemitter"),
    "{FileHandle}" => ("FileHandle", "fs.md#filehandle"),
    "{fs.ReadStream}" => ("fs.ReadStream", "fs.md#fsreadstream"),
    "{fs.WriteStream}" => ("fs.WriteStream", "fs.md#fswritestream"),
    "{Stream}" => ("Stream", "stream.md#stream"),
    "{stream.Readable}" => ("stream.Readable", "stream.md#streamreadable"),
    "{ReadableStream}" => ("ReadableStream", "webstreams.md#readablestream"),
    "{URL}" => ("URL", "url.md#the-whatwg-url-api"),
    // MDN 基本类型
    "{boolean}" => ("boolean", "@data#Boolean_type"),
    "{integer}" => ("integer", "@data#Number_type"),
    "{целое число}" => ("integer", "@data#Number_type"),
    "{number}" => ("number", "@data#Number_type"),
    "{null}" => ("null", "@data#Null_type"),
    "{string}" => ("string", "@data#String_type"),
    "{строка}" => ("string", "@data#String_type"),
    // MDN 全局对象
    "{AggregateError}" => ("AggregateError", "@global/AggregateError"),
    "{DataView}" => ("DataView", "@global/DataView"),
    "{DataView[]}" => ("DataView[]", "@global/DataView"),
    "{Date}" => ("Date", "@global/Date"),
    "{Error}" => ("Error", "@global/Error"),
    "{Ошибка}" => ("Error", "@global/Error"),
    "{Iterable}" => ("Iterable", "https://developer.mozilla.org/docs/Web/JavaScript/Reference/Iteration_protocols#The_iterable_protocol"),
    "{Function}" => ("Function", "@global/Function"),
    "{Функция}" => ("Function", "@global/Function"),
    "{Object}" => ("Object", "@global/Object"),
    "{Promise}" => ("Promise", "@global/Promise"),
    "{обещание}" => ("Promise", "@global/Promise"),
    "{TypedArray}" => ("TypedArray", "@global/TypedArray"),
    "{TypedArray[]}" => ("TypedArray[]", "@global/TypedArray"),
    // MDN Web API
    "{ArrayBufferView[]}" => ("ArrayBufferView[]", "https://developer.mozilla.org/docs/Web/API/ArrayBufferView"),
    // TC39
    "{AsyncIterable}" => ("AsyncIterable", "https://tc39.github.io/ecma262/#sec-asynciterable-interface"),
    "{AsyncIterator}" => ("AsyncIterator", "https://tc39.github.io/ecma262/#sec-asynciterator-interface"),
};

/// 额外替换规则文件
///
/// ```toml
/// [[replacement]]
/// from = "{Blob}"
/// to = "[`<Blob>`](buffer.md#class-blob)"
/// ```
#[derive(Debug, Deserialize)]
struct ReplacementFile {
    #[serde(default)]
    replacement: Vec<Replacement>,
}

/// 一条替换规则，按字面匹配
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// 单遍替换器
pub struct TypeLinker {
    pattern: Option<Regex>,
    targets: HashMap<String, String>,
}

impl TypeLinker {
    /// 只使用内置表
    pub fn builtin() -> Result<Self> {
        Self::with_extra(Vec::new())
    }

    /// 内置表加额外规则，额外规则覆盖同名内置项
    pub fn with_extra(extra: Vec<Replacement>) -> Result<Self> {
        let mut targets: HashMap<String, String> = BUILTIN_LINKS
            .entries()
            .map(|(from, (label, target))| (from.to_string(), render_link(label, target)))
            .collect();
        for rule in extra {
            targets.insert(rule.from, rule.to);
        }

        let mut keys: Vec<&str> = targets.keys().map(String::as_str).collect();
        keys.retain(|k| !k.is_empty());
        // 长的优先，避免 `{Buffer}` 抢先匹配 `{Buffer[]}` 的前缀之类的问题
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let pattern = if keys.is_empty() {
            None
        } else {
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).context("构建类型链接正则失败")?)
        };

        debug!("类型链接替换表共 {} 条", targets.len());
        Ok(Self { pattern, targets })
    }

    /// 从 TOML 文件加载额外规则
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取类型链接文件: {}", path.display()))?;
        let file: ReplacementFile = toml::from_str(&content)
            .with_context(|| format!("无法解析类型链接文件: {}", path.display()))?;
        Self::with_extra(file.replacement)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// 替换文档中所有已知的类型标注
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(text, |caps: &Captures| {
                    let key = &caps[0];
                    self.targets.get(key).cloned().unwrap_or_else(|| key.to_string())
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// `@data` / `@global` 展开为 MDN 地址
fn render_link(label: &str, target: &str) -> String {
    let url = if let Some(rest) = target.strip_prefix("@data") {
        format!("{}{}", MDN_DATA, rest)
    } else if let Some(rest) = target.strip_prefix("@global") {
        format!("{}{}", MDN_GLOBAL, rest)
    } else {
        target.to_string()
    };
    format!("[`<{}>`]({})", label, url)
}
