use std::fmt;

use super::DomainError;

/// 经过校验的单级条目名称。
///
/// 不允许为空或纯空白，不允许 `.` 与 `..`，不允许包含 `/`、`\` 或 NUL。
/// 名称原样保留，不做裁剪。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(String);

impl EntryName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }

        if value == "." || value == ".." {
            return Err(DomainError::ReservedName(value));
        }

        if value.contains(['/', '\\', '\0']) {
            return Err(DomainError::IllegalCharacter(value));
        }

        Ok(Self(value))
    }

    /// 在名称后追加扩展名；名称已带该扩展名（忽略大小写）时保持不变。
    pub fn with_extension(self, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return self;
        }

        let suffix = format!(".{}", extension.to_lowercase());
        if self.0.to_lowercase().ends_with(&suffix) && self.0.len() > suffix.len() {
            self
        } else {
            Self(format!("{}.{}", self.0, extension))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for EntryName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
