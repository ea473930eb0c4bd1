//! 画像数据模型
//!
//! 远程集合中的单条画像记录，以及编辑会话使用的字段标识与字段输入值。

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// 画像
///
/// `id` 一经分配不可变，在集合内唯一。`age` 缺失时序列化会省略该字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// 画像唯一标识
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// 名称（集合内唯一，区分大小写）
    pub name: String,

    /// 邮箱（仅创建时可编辑）
    pub email: String,

    /// 年龄，取值范围 [0, 119]
    #[serde(
        default,
        deserialize_with = "deserialize_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u8>,
}

impl Profile {
    /// 创建画像
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            age: None,
        }
    }

    /// 设置年龄
    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    /// 空白草稿，使用新生成的临时 ID
    pub fn blank() -> Self {
        Self::new(next_profile_id(), "", "")
    }
}

/// 兼容旧记录中的数字 ID
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// 兼容旧表单提交的字符串年龄
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAge {
    Number(i64),
    Text(String),
}

fn deserialize_age<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Option::<RawAge>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawAge::Number(number)) => number,
        Some(RawAge::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid age: {}", text)))?
        }
    };
    u8::try_from(number)
        .map(Some)
        .map_err(|_| de::Error::custom(format!("age out of range: {}", number)))
}

/// 可编辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Name,
    Email,
    Age,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Age => "age",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "username" => Ok(ProfileField::Name),
            "email" => Ok(ProfileField::Email),
            "age" => Ok(ProfileField::Age),
            other => Err(format!("unknown profile field: {}", other)),
        }
    }
}

/// 表单输入值
///
/// 文本框输入为 `Text`，数字控件输入为 `Number`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl FieldValue {
    /// 文本表示
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

/// 生成新的临时画像 ID
///
/// 基于毫秒时间戳；同一毫秒内的连续调用会递增，保证进程内不重复。
pub fn next_profile_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_ISSUED_ID.load(Ordering::SeqCst);
    loop {
        let candidate = if now > last { now } else { last + 1 };
        match LAST_ISSUED_ID.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}
