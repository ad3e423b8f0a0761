//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`，在字符串读写
//! 之上提供 JSON 读写（经 `serde-json-wasm`）。

use serde::{Serialize, de::DeserializeOwned};

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// 键不存在或发生错误时返回 None
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }

    /// 读取并反序列化 JSON 值
    ///
    /// 键不存在或内容损坏时返回 None，损坏内容不会抛出。
    pub fn get_json<T: DeserializeOwned>(key: &str) -> Option<T> {
        serde_json_wasm::from_str(&Self::get(key)?).ok()
    }

    /// 序列化并写入 JSON 值，返回操作是否成功
    pub fn set_json<T: Serialize>(key: &str, value: &T) -> bool {
        match serde_json_wasm::to_string(value) {
            Ok(json) => Self::set(key, &json),
            Err(_) => false,
        }
    }
}
