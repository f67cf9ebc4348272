use std::fmt;

/// 括号包裹, 逗号分隔的子句列表
///
/// 只在元素之间插入分隔符, 渲染结果不会出现 `, )` 这样的尾随逗号。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClauseList {
    items: Vec<String>,
}

impl ClauseList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl fmt::Display) -> &mut Self {
        self.items.push(item.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: fmt::Display> FromIterator<T> for ClauseList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().map(|item| item.to_string()).collect() }
    }
}

impl<T: fmt::Display> Extend<T> for ClauseList {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(|item| item.to_string()));
    }
}

impl fmt::Display for ClauseList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.items.join(", "))
    }
}

/// 按顺序拼接的语句片段, 片段之间以单个空格连接
#[derive(Clone, Debug, Default)]
pub struct StatementBuilder {
    fragments: Vec<String>,
}

impl StatementBuilder {
    pub fn new(head: impl fmt::Display) -> Self {
        Self { fragments: vec![head.to_string()] }
    }

    pub fn push(mut self, fragment: impl fmt::Display) -> Self {
        let fragment = fragment.to_string();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
        self
    }

    pub fn push_if(self, condition: bool, fragment: impl fmt::Display) -> Self {
        if condition { self.push(fragment) } else { self }
    }

    pub fn build(self) -> String {
        self.fragments.join(" ")
    }
}

/// SQL 字符串字面量, 单引号转义
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
