/// 批次
///
/// 一段连续节点的规范化文本，要么整体提交给翻译器，要么原样输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 是否需要翻译
    pub need_translate: bool,
    /// 拼接后的文本，节点之间以空行分隔
    pub data: String,
}

impl Batch {
    /// 需要翻译的批次
    pub fn translatable(data: impl Into<String>) -> Self {
        Self {
            need_translate: true,
            data: data.into(),
        }
    }

    /// 原样输出的批次
    pub fn passthrough(data: impl Into<String>) -> Self {
        Self {
            need_translate: false,
            data: data.into(),
        }
    }
}
