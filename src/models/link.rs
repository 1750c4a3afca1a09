use std::collections::HashSet;

/// 商家详情页链接（按字符串完全相等判重）
pub type Link = String;

/// 保持插入顺序的链接集合
///
/// 结果列表在滚动过程中会反复渲染同一批元素，重复插入是空操作。
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    order: Vec<Link>,
    seen: HashSet<Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入链接，返回是否为新链接
    pub fn insert(&mut self, link: impl Into<Link>) -> bool {
        let link = link.into();
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.order.push(link);
        true
    }

    /// 批量插入，返回新增数量
    pub fn extend<I, S>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<Link>,
    {
        links
            .into_iter()
            .map(|link| self.insert(link))
            .filter(|added| *added)
            .count()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[Link] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<Link> {
        self.order
    }
}

impl FromIterator<Link> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut set = LinkSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedups_by_exact_value() {
        let mut set = LinkSet::new();
        assert!(set.insert("https://maps.example/place/a"));
        assert!(set.insert("https://maps.example/place/b"));
        assert!(!set.insert("https://maps.example/place/a"));
        // 大小写不同视为不同链接
        assert!(set.insert("https://maps.example/place/A"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_preserves_discovery_order() {
        let set: LinkSet = ["c", "a", "c", "b", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(set.as_slice(), &["c", "a", "b"]);
    }

    #[test]
    fn test_extend_counts_only_new_links() {
        let mut set = LinkSet::new();
        assert_eq!(set.extend(["a", "b"]), 2);
        assert_eq!(set.extend(["b", "c", "a"]), 1);
        assert!(set.contains("c"));
    }
}
