//! 按年緩存的節氣表，同一 [`Calendar`](super::Calendar) 的各次查詢共用。

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::time_scales::{Tt, Ut};

use super::solar::{QI_COUNT, TERM_COUNT};

/// 已推算的節氣表，以公元年為鍵。
///
/// 表只取決於年份，一經寫入永不失效。多個線程同時未命中同一年時可能重複推算，
/// 只保留最先寫入者。
#[derive(Debug, Default)]
pub struct YearCache {
    pub(crate) mean_terms: YearMemo<[Tt; TERM_COUNT]>,
    pub(crate) qi: YearMemo<[Ut; QI_COUNT]>,
}

impl YearCache {
    pub fn new() -> Self {
        Self::default()
    }
    /// 所存各類年表的總數
    pub fn len(&self) -> usize {
        self.mean_terms.len() + self.qi.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub(crate) struct YearMemo<T> {
    name: &'static str,
    map: RwLock<HashMap<i32, T>>,
}

impl<T> Default for YearMemo<T> {
    fn default() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Copy> YearMemo<T> {
    /// 取得 `year` 年的表，未命中時以 `f` 推算。
    ///
    /// 執行 `f` 時不持鎖。
    pub(crate) fn get_or_try_insert_with<E>(
        &self,
        year: i32,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        // 鎖中毒時表內仍只有完整的項
        let cached = self
            .map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&year)
            .copied();
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = f()?;
        tracing::debug!(year, table = self.name, "computed year table");
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        Ok(*map.entry(year).or_insert(value))
    }

    pub(crate) fn len(&self) -> usize {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
