//! 链接处理上下文
//!
//! 封装"我正在处理第几个商家的哪个链接"这一信息

use std::fmt::Display;

/// 链接处理上下文
#[derive(Debug, Clone)]
pub struct LinkCtx {
    /// 商家详情页链接
    pub link: String,

    /// 在本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 链接总数
    pub total: usize,
}

impl LinkCtx {
    pub fn new(link: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            link: link.into(),
            index,
            total,
        }
    }
}

impl Display for LinkCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[商家 {}/{}]", self.index, self.total)
    }
}
