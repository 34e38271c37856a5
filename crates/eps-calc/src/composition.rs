//! 排數組合列舉
//!
//! 將整數 `total` 拆成 `parts` 個非負整數（有序，總和固定）。
//! 輸出為字典序：第一個元素變化最慢，例如 `total = 2, parts = 3`：
//!
//! ```text
//! [0,0,2] [0,1,1] [0,2,0] [1,0,1] [1,1,0] [2,0,0]
//! ```
//!
//! 組合總數為 `C(total + parts - 1, parts - 1)`，在列舉前先與上限比較。

use eps_core::{EpsError, Result};

/// 組合總數 `C(total + parts - 1, parts - 1)`，溢位時回傳 `u128::MAX`
pub fn composition_count(total: u32, parts: usize) -> u128 {
    if parts == 0 {
        return u128::from(total == 0);
    }

    let n = u128::from(total) + parts as u128 - 1;
    let r = (parts as u128 - 1).min(u128::from(total));

    let mut count: u128 = 1;
    for i in 1..=r {
        count = match count.checked_mul(n - r + i) {
            Some(product) => product / i,
            None => return u128::MAX,
        };
    }
    count
}

/// 排數組合迭代器（可 clone 後重新列舉）
#[derive(Debug, Clone)]
pub struct Compositions {
    current: Vec<u32>,
    finished: bool,
}

impl Compositions {
    /// 創建不設上限的迭代器
    pub fn new(total: u32, parts: usize) -> Self {
        let mut current = vec![0; parts];
        if let Some(last) = current.last_mut() {
            *last = total;
        }
        Self {
            current,
            finished: parts == 0,
        }
    }

    /// 創建迭代器，組合總數超過 `limit` 時直接失敗
    pub fn bounded(total: u32, parts: usize, limit: u64) -> Result<Self> {
        let attempted = composition_count(total, parts);
        if attempted > u128::from(limit) {
            return Err(EpsError::SearchSpaceExceeded { limit, attempted });
        }
        Ok(Self::new(total, parts))
    }

    /// 推進到下一個組合
    ///
    /// 從倒數第二位往前找第一個右側仍有剩餘的位置，加一，
    /// 右側歸零並把剩餘減一放到最後一位。
    fn advance(&mut self) {
        let len = self.current.len();
        let mut suffix: u32 = 0;

        for i in (0..len.saturating_sub(1)).rev() {
            suffix += self.current[i + 1];
            if suffix > 0 {
                self.current[i] += 1;
                for slot in &mut self.current[i + 1..] {
                    *slot = 0;
                }
                self.current[len - 1] = suffix - 1;
                return;
            }
        }

        self.finished = true;
    }
}

impl Iterator for Compositions {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.current.clone();
        self.advance();
        Some(item)
    }
}
