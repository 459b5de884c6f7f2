//! filemgr 领域模型。
//!
//! 只包含不涉及 I/O 的值类型：目录条目、目录快照、条目名称校验、
//! 文件操作请求与结果、失败分类以及会话标识。

pub mod domain;
